// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end testing.
//!
//! `TestHarness` assembles a complete gateway stack over an isolated
//! in-memory store with a manual clock, and drives it through the router
//! without binding a socket. Harnesses are independent and
//! order-insensitive.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use tower::ServiceExt;

use hearth_config::model::PlanTier;
use hearth_core::{Role, User};
use hearth_gateway::{build_router, GatewayState, HealthState};
use hearth_notify::Notifier;
use hearth_store::{PresenceTracker, TaskStore};

use crate::manual_clock::ManualClock;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    now: DateTime<Utc>,
    roster: Vec<User>,
    plan: PlanTier,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            // 2025-06-03 is a Tuesday; a known weekday anchors the
            // recurrence scenarios.
            now: Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap(),
            roster: vec![
                User {
                    id: "owner".into(),
                    name: "Owner".into(),
                    role: Role::Owner,
                },
                User {
                    id: "kid-1".into(),
                    name: "Sam".into(),
                    role: Role::Child,
                },
                User {
                    id: "kid-2".into(),
                    name: "Riley".into(),
                    role: Role::Minor,
                },
            ],
            plan: PlanTier::Elite,
        }
    }

    /// Start the clock at a specific instant.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Replace the default roster.
    pub fn with_roster(mut self, roster: Vec<User>) -> Self {
        self.roster = roster;
        self
    }

    /// Use a specific plan tier.
    pub fn with_plan(mut self, plan: PlanTier) -> Self {
        self.plan = plan;
        self
    }

    /// Build the harness, assembling store, presence, and router.
    pub fn build(self) -> TestHarness {
        let clock = Arc::new(ManualClock::at(self.now));
        let store = Arc::new(TaskStore::new(self.roster, clock.clone()));
        let presence = Arc::new(PresenceTracker::new(30, clock.clone()));
        let state = GatewayState {
            store: store.clone(),
            presence: presence.clone(),
            notifier: Arc::new(Notifier::disabled()),
            plan: self.plan,
            upstream: None,
            allowed_origins: Vec::new(),
            health: HealthState {
                start_time: std::time::Instant::now(),
            },
        };

        TestHarness {
            router: build_router(state),
            store,
            presence,
            clock,
        }
    }
}

/// A complete test environment: router, store, presence, manual clock.
pub struct TestHarness {
    /// The assembled gateway router.
    pub router: Router,
    /// Direct store access for assertions.
    pub store: Arc<TaskStore>,
    /// Direct presence access for assertions.
    pub presence: Arc<PresenceTracker>,
    /// The clock every component reads.
    pub clock: Arc<ManualClock>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send one request through the router as `user` and return the
    /// status plus parsed JSON body (Null for empty bodies).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is JSON")
        };
        (status, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::Clock;

    #[tokio::test]
    async fn harnesses_are_isolated() {
        let h1 = TestHarness::builder().build();
        let h2 = TestHarness::builder().build();

        let (status, _) = h1
            .request(
                "POST",
                "/api/tasks",
                Some("owner"),
                Some(serde_json::json!({"title": "Only in h1"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        assert_eq!(h1.store.list_tasks().await.len(), 1);
        assert!(h2.store.list_tasks().await.is_empty());
    }

    #[tokio::test]
    async fn clock_drives_the_whole_stack() {
        let harness = TestHarness::builder().build();
        let before = harness.clock.now().timestamp_millis();
        harness.clock.advance_minutes(5);

        let (_, task) = harness
            .request(
                "POST",
                "/api/tasks",
                Some("owner"),
                Some(serde_json::json!({"title": "Timed"})),
            )
            .await;
        assert_eq!(task["createdAt"].as_i64().unwrap(), before + 5 * 60_000);
    }
}
