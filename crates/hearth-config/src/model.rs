// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hearth service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use hearth_core::Role;
use serde::{Deserialize, Serialize};

/// Top-level Hearth configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// dev values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HearthConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server binding and CORS.
    #[serde(default)]
    pub server: ServerConfig,

    /// Family roster seeded into the store at startup.
    #[serde(default)]
    pub family: FamilyConfig,

    /// Subscription plan tier.
    #[serde(default)]
    pub plan: PlanConfig,

    /// Device presence window.
    #[serde(default)]
    pub presence: PresenceConfig,

    /// Optional upstream backend; when set the gateway runs in proxy mode.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Optional SMTP enforcement notifier.
    #[serde(default)]
    pub mail: MailConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "hearth".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed by CORS. Empty means permissive (dev).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

/// A configured family member.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemberConfig {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Family roster configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyConfig {
    /// Members seeded into the store. Defaults to a small demo roster so
    /// the admin UI works out of the box.
    #[serde(default = "default_members")]
    pub members: Vec<MemberConfig>,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            members: default_members(),
        }
    }
}

fn default_members() -> Vec<MemberConfig> {
    vec![
        MemberConfig {
            id: "owner".into(),
            name: "Owner".into(),
            role: Role::Owner,
        },
        MemberConfig {
            id: "kid-1".into(),
            name: "Sam".into(),
            role: Role::Child,
        },
        MemberConfig {
            id: "kid-2".into(),
            name: "Riley".into(),
            role: Role::Minor,
        },
    ]
}

/// Subscription plan tier; caps how many kids can be tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Lite,
    Elite,
}

impl PlanTier {
    /// Maximum number of kid profiles for the tier.
    pub fn max_kids(self) -> u32 {
        match self {
            PlanTier::Free => 1,
            PlanTier::Lite => 2,
            PlanTier::Elite => 5,
        }
    }

    /// Wire name of the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Lite => "lite",
            PlanTier::Elite => "elite",
        }
    }
}

/// Plan configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfig {
    /// Active tier. Defaults to elite so local testing is never capped.
    #[serde(default = "default_tier")]
    pub tier: PlanTier,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            tier: default_tier(),
        }
    }
}

fn default_tier() -> PlanTier {
    PlanTier::Elite
}

/// Device presence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PresenceConfig {
    /// A device counts as online if it beat within this many seconds.
    #[serde(default = "default_presence_ttl")]
    pub ttl_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_presence_ttl(),
        }
    }
}

fn default_presence_ttl() -> u64 {
    30
}

/// Upstream backend configuration for proxy mode.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base URL of the backing store. `None` serves from the local
    /// in-memory store.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout for forwarded calls.
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

fn default_upstream_timeout() -> u64 {
    5
}

/// SMTP enforcement notifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// SMTP relay host. `None` disables the notifier (logged no-op).
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Sender address for alert mail.
    #[serde(default)]
    pub from: String,

    /// Recipient address for alert mail.
    #[serde(default)]
    pub to: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            from: String::new(),
            to: String::new(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}
