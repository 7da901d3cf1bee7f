// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, unique member ids, and
//! coherent notifier settings.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::HearthConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &HearthConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate log level is a known tracing level.
    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` is not one of {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate host is a plausible IP address or hostname.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    // Validate member ids are non-empty and unique.
    let mut seen_ids = HashSet::new();
    for (i, member) in config.family.members.iter().enumerate() {
        if member.id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("family.members[{i}].id must not be empty"),
            });
        } else if !seen_ids.insert(&member.id) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate member id `{}` in [[family.members]] array",
                    member.id
                ),
            });
        }
    }

    if config.presence.ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "presence.ttl_secs must be at least 1".to_string(),
        });
    }

    // Validate upstream URL scheme when proxy mode is enabled.
    if let Some(base_url) = &config.upstream.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!(
                    "upstream.base_url `{base_url}` must start with http:// or https://"
                ),
            });
        }
    }

    // Validate mail settings are coherent when the notifier is enabled.
    if config.mail.smtp_host.is_some() {
        if config.mail.from.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mail.from is required when mail.smtp_host is set".to_string(),
            });
        }
        if config.mail.to.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mail.to is required when mail.smtp_host is set".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
