// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enforcement alert delivery.
//!
//! When `[mail]` is configured, alerts go out as short SMTP messages.
//! Without configuration the notifier degrades to a logged no-op: the
//! enforcement action still succeeds and the task records `log` as its
//! delivery channel.

use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use hearth_config::model::MailConfig;
use hearth_core::types::{EnforceAction, EnforceChannel, Task};
use hearth_core::HearthError;

struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// Sends enforcement alerts; a no-op when mail is unconfigured.
pub struct Notifier {
    mailer: Option<Mailer>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("enabled", &self.mailer.is_some())
            .finish()
    }
}

impl Notifier {
    /// Build the notifier from mail configuration. `smtp_host = None`
    /// yields a disabled notifier rather than an error.
    pub fn from_config(config: &MailConfig) -> Result<Self, HearthError> {
        let Some(host) = config.smtp_host.as_deref() else {
            return Ok(Self { mailer: None });
        };

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| HearthError::Config(format!("mail.from is not a valid address: {e}")))?;
        let to: Mailbox = config
            .to
            .parse()
            .map_err(|e| HearthError::Config(format!("mail.to is not a valid address: {e}")))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| HearthError::Config(format!("mail.smtp_host is unusable: {e}")))?
            .port(config.smtp_port)
            .build();

        Ok(Self {
            mailer: Some(Mailer {
                transport,
                from,
                to,
            }),
        })
    }

    /// A notifier that never sends; used in tests and by default.
    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    /// Whether a transport is configured.
    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    /// Deliver an alert, returning the channel it actually went through.
    ///
    /// Unconfigured: logs a warning and reports [`EnforceChannel::Log`].
    /// Configured but failing: returns a `Notify` error for the caller to
    /// record; the HTTP action itself is not failed on delivery errors.
    pub async fn send_alert(
        &self,
        subject: &str,
        body: String,
    ) -> Result<EnforceChannel, HearthError> {
        let Some(mailer) = &self.mailer else {
            tracing::warn!(subject, "mail notifier unconfigured; alert logged only");
            return Ok(EnforceChannel::Log);
        };

        let message = Message::builder()
            .from(mailer.from.clone())
            .to(mailer.to.clone())
            .subject(subject)
            .body(body)
            .map_err(|e| HearthError::Notify {
                message: format!("building alert mail failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        mailer
            .transport
            .send(message)
            .await
            .map_err(|e| HearthError::Notify {
                message: format!("sending alert mail failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        tracing::info!(subject, "enforcement alert mailed");
        Ok(EnforceChannel::Email)
    }
}

/// Compose the alert for enforcing a single task.
pub fn task_alert(task: &Task) -> (String, String) {
    let subject = format!("[hearth] task enforced: {}", task.title);
    let action = task
        .auto_action
        .map(|a| a.to_string())
        .unwrap_or_else(|| "none".to_string());
    let assignee = task.assigned_to.as_deref().unwrap_or("unassigned");
    let body = format!(
        "Task \"{}\" (assigned to {assignee}) was enforced.\nConfigured action: {action}\n",
        task.title
    );
    (subject, body)
}

/// Compose the alert for a device-level parental enforce request.
pub fn parental_alert(target_user_id: &str, action: EnforceAction, reason: &str) -> (String, String) {
    let subject = format!("[hearth] parental enforce: {action}");
    let body = format!(
        "Action {action} was requested against {target_user_id}.\nReason: {reason}\n"
    );
    (subject, body)
}
