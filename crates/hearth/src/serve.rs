// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hearth serve` command implementation.
//!
//! Assembles the in-memory store from the configured roster, the presence
//! tracker, the mail notifier, and the optional upstream proxy client,
//! then runs the axum gateway until a shutdown signal arrives.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use hearth_config::model::HearthConfig;
use hearth_core::{Clock, HearthError, SystemClock, User};
use hearth_gateway::{start_server, GatewayState, HealthState, UpstreamClient};
use hearth_notify::Notifier;
use hearth_store::{PresenceTracker, TaskStore};

/// Runs the `hearth serve` command.
pub async fn run_serve(config: HearthConfig) -> Result<(), HearthError> {
    init_tracing(&config.service.log_level);

    info!("starting hearth serve");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let roster: Vec<User> = config
        .family
        .members
        .iter()
        .map(|member| User {
            id: member.id.clone(),
            name: member.name.clone(),
            role: member.role,
        })
        .collect();
    info!(members = roster.len(), "family roster seeded");
    let store = Arc::new(TaskStore::new(roster, clock.clone()));

    let presence = Arc::new(PresenceTracker::new(config.presence.ttl_secs, clock));

    let notifier = Arc::new(Notifier::from_config(&config.mail)?);
    if notifier.is_configured() {
        info!("mail notifier enabled");
    } else {
        info!("mail notifier disabled (mail.smtp_host unset); alerts are logged only");
    }

    let upstream = UpstreamClient::from_config(&config.upstream)?.map(Arc::new);
    if upstream.is_some() {
        info!(
            base_url = config.upstream.base_url.as_deref().unwrap_or_default(),
            "proxy mode: forwarding /api to upstream"
        );
    }

    let state = GatewayState {
        store,
        presence,
        notifier,
        plan: config.plan.tier,
        upstream,
        allowed_origins: config.server.allowed_origins.clone(),
        health: HealthState {
            start_time: std::time::Instant::now(),
        },
    };

    let cancel = install_signal_handler();
    start_server(&config.server, state, cancel).await?;

    info!("hearth serve shutdown complete");
    Ok(())
}

/// Cancel the returned token when Ctrl-C arrives.
fn install_signal_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            handler_token.cancel();
        }
    });
    cancel
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hearth={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
