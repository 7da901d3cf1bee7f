// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hearth doctor` command implementation.
//!
//! Runs environment checks the server would otherwise fail on at startup:
//! bind address availability, upstream reachability in proxy mode, and
//! notifier configuration. Prints one line per check and fails the
//! command if any check fails.

use std::time::Duration;

use hearth_config::model::HearthConfig;
use hearth_core::HearthError;

struct CheckOutcome {
    name: &'static str,
    passed: bool,
    detail: String,
}

/// Runs the `hearth doctor` command.
pub async fn run_doctor(config: &HearthConfig) -> Result<(), HearthError> {
    let mut outcomes = Vec::new();

    outcomes.push(check_bind(config).await);
    outcomes.push(check_upstream(config).await);
    outcomes.push(check_mail(config));

    let mut failed = false;
    for outcome in &outcomes {
        let mark = if outcome.passed { "ok  " } else { "FAIL" };
        println!("{mark} {name}: {detail}", name = outcome.name, detail = outcome.detail);
        failed |= !outcome.passed;
    }

    if failed {
        Err(HearthError::Config("doctor checks failed".into()))
    } else {
        println!("all checks passed");
        Ok(())
    }
}

/// The configured host:port must be bindable right now.
async fn check_bind(config: &HearthConfig) -> CheckOutcome {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    match tokio::net::TcpListener::bind(&addr).await {
        Ok(_) => CheckOutcome {
            name: "bind",
            passed: true,
            detail: format!("{addr} is available"),
        },
        Err(e) => CheckOutcome {
            name: "bind",
            passed: false,
            detail: format!("cannot bind {addr}: {e}"),
        },
    }
}

/// In proxy mode the upstream must answer; otherwise the check is moot.
async fn check_upstream(config: &HearthConfig) -> CheckOutcome {
    let Some(base_url) = &config.upstream.base_url else {
        return CheckOutcome {
            name: "upstream",
            passed: true,
            detail: "not configured (serving the local store)".into(),
        };
    };

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return CheckOutcome {
                name: "upstream",
                passed: false,
                detail: format!("client build failed: {e}"),
            }
        }
    };

    match client.get(base_url).send().await {
        Ok(response) => CheckOutcome {
            name: "upstream",
            passed: true,
            detail: format!("{base_url} answered {}", response.status()),
        },
        Err(e) => CheckOutcome {
            name: "upstream",
            passed: false,
            detail: format!("{base_url} unreachable: {e}"),
        },
    }
}

/// The notifier is optional; report which mode the server would run in.
fn check_mail(config: &HearthConfig) -> CheckOutcome {
    match &config.mail.smtp_host {
        Some(host) => CheckOutcome {
            name: "mail",
            passed: true,
            detail: format!("notifier configured against {host}:{}", config.mail.smtp_port),
        },
        None => CheckOutcome {
            name: "mail",
            passed: true,
            detail: "not configured; enforcement alerts are logged only".into(),
        },
    }
}
