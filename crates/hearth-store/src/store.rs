// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authoritative in-memory task store.
//!
//! One `TaskStore` instance holds the Task and User records for a single
//! process lifetime; there is no persistence across restarts. The store is
//! constructed explicitly (roster + clock injected) so tests can run
//! isolated instances. Every operation takes the collection lock for its
//! whole duration and never awaits while holding it, so each handler
//! invocation mutates the collection atomically.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use hearth_core::recurrence::next_occurrence;
use hearth_core::types::{EnforceAction, EnforceChannel, RepeatKind, RepeatRule, Task, User};
use hearth_core::{Clock, HearthError};

/// Input for [`TaskStore::create_task`].
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub assigned_to: Option<String>,
    pub due: Option<i64>,
    pub for_minor: bool,
    pub ack_required: bool,
    pub photo_proof: bool,
    pub note: Option<String>,
    pub repeat_rule: RepeatRule,
    pub auto_enforce: bool,
    pub auto_action: Option<EnforceAction>,
}

/// Partial update for [`TaskStore::update_task`].
///
/// Only mutable fields appear here; `ackRequired` and `photoProof` are
/// fixed at creation and have no patch counterpart. Unknown keys in the
/// wire body are ignored, matching the legacy backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub assigned_to: Option<String>,
    pub due: Option<i64>,
    pub completed: Option<bool>,
    pub note: Option<String>,
    pub paused_by_parent: Option<bool>,
    pub repeat: Option<RepeatKind>,
    pub repeat_rule: Option<RepeatRule>,
    pub auto_enforce: Option<bool>,
    pub auto_action: Option<EnforceAction>,
}

/// In-memory collection of tasks plus the read-only family roster.
pub struct TaskStore {
    clock: Arc<dyn Clock>,
    users: Vec<User>,
    tasks: RwLock<HashMap<String, Task>>,
}

impl TaskStore {
    /// Create a store seeded with the given roster.
    pub fn new(users: Vec<User>, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            users,
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// All users in the roster.
    pub fn list_users(&self) -> Vec<User> {
        self.users.clone()
    }

    /// Look up a roster member by id.
    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    /// All tasks. The store guarantees no ordering; callers sort for
    /// display.
    pub async fn list_tasks(&self) -> Vec<Task> {
        self.tasks.read().await.values().cloned().collect()
    }

    /// Fetch one task by id.
    pub async fn get_task(&self, id: &str) -> Result<Task, HearthError> {
        self.tasks
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| HearthError::task_not_found(id))
    }

    /// Create a task. Validates the title and recurrence rule before any
    /// mutation; for daily/weekly rules the due timestamp is computed from
    /// the rule, overriding any caller-supplied value.
    pub async fn create_task(&self, input: NewTask) -> Result<Task, HearthError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(HearthError::Validation("title required".into()));
        }
        input.repeat_rule.validate()?;

        let now = self.clock.now();
        let due = match input.repeat_rule.kind {
            RepeatKind::None => input.due,
            _ => next_occurrence(&input.repeat_rule, now)?,
        };

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            assigned_to: input.assigned_to,
            due,
            completed: false,
            for_minor: input.for_minor,
            ack_required: input.ack_required,
            photo_proof: input.photo_proof,
            ack_by: None,
            ack_at: None,
            proof_key: None,
            note: input.note,
            repeat: input.repeat_rule.kind,
            repeat_rule: input.repeat_rule,
            auto_enforce: input.auto_enforce,
            auto_action: input.auto_action,
            enforced_at: None,
            enforce_channel: None,
            last_enforce_error: None,
            paused_by_parent: false,
            hold_until: None,
            cancelled_at: None,
            created_at: now.timestamp_millis(),
        };

        self.tasks
            .write()
            .await
            .insert(task.id.clone(), task.clone());
        tracing::debug!(task_id = task.id.as_str(), "task created");
        Ok(task)
    }

    /// Apply a partial update. When the recurrence rule changes, the due
    /// timestamp is recomputed from the new rule.
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task, HearthError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(HearthError::Validation("title required".into()));
            }
        }
        let now = self.clock.now();
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;

        // Resolve the prospective rule first so an invalid combination
        // (e.g. switching to weekly while the day set is empty) rejects
        // before any field is touched.
        let rule_changed = patch.repeat.is_some() || patch.repeat_rule.is_some();
        let new_rule = match (&patch.repeat_rule, patch.repeat) {
            (Some(rule), _) => rule.clone(),
            (None, Some(kind)) => {
                let mut rule = task.repeat_rule.clone();
                rule.kind = kind;
                rule
            }
            (None, None) => task.repeat_rule.clone(),
        };
        if rule_changed {
            new_rule.validate()?;
        }

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        if let Some(due) = patch.due {
            task.due = Some(due);
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(note) = patch.note {
            task.note = Some(note);
        }
        if let Some(paused) = patch.paused_by_parent {
            task.paused_by_parent = paused;
        }
        if let Some(auto_enforce) = patch.auto_enforce {
            task.auto_enforce = auto_enforce;
        }
        if let Some(auto_action) = patch.auto_action {
            task.auto_action = Some(auto_action);
        }
        if rule_changed {
            task.repeat = new_rule.kind;
            task.repeat_rule = new_rule;
            // Re-anchor the due time to the changed rule.
            if let Some(due) = next_occurrence(&task.repeat_rule, now)? {
                task.due = Some(due);
            }
        }

        Ok(task.clone())
    }

    /// Record an acknowledgment by `actor`. Re-acking overwrites the
    /// previous actor and timestamp; there is no un-ack.
    pub async fn ack(&self, id: &str, actor: &str) -> Result<Task, HearthError> {
        let now_ms = self.clock.now_ms();
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        task.ack_by = Some(actor.to_string());
        task.ack_at = Some(now_ms);
        Ok(task.clone())
    }

    /// Suspend overdue/enforcement consideration for `minutes` from now.
    pub async fn hold(&self, id: &str, minutes: i64) -> Result<Task, HearthError> {
        if minutes <= 0 {
            return Err(HearthError::Validation(
                "hold minutes must be a positive number".into(),
            ));
        }
        let now_ms = self.clock.now_ms();
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        task.hold_until = Some(now_ms + minutes * 60_000);
        Ok(task.clone())
    }

    /// Clear any suspension window or parent pause.
    pub async fn resume(&self, id: &str) -> Result<Task, HearthError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        task.hold_until = None;
        task.paused_by_parent = false;
        Ok(task.clone())
    }

    /// Mark an enforcement episode. The timestamp is set once per episode
    /// (a second enforce while one is active keeps the original instant);
    /// the channel records how the alert actually went out. Overdue is the
    /// recommended precondition but is not gated here: an operator may
    /// enforce early as an explicit override.
    pub async fn enforce(
        &self,
        id: &str,
        channel: EnforceChannel,
    ) -> Result<Task, HearthError> {
        let now_ms = self.clock.now_ms();
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        if task.enforced_at.is_none() {
            task.enforced_at = Some(now_ms);
        }
        task.enforce_channel = Some(channel);
        task.last_enforce_error = None;
        Ok(task.clone())
    }

    /// Record a delivery failure for the current enforcement episode.
    pub async fn record_enforce_error(
        &self,
        id: &str,
        message: &str,
    ) -> Result<Task, HearthError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        task.last_enforce_error = Some(message.to_string());
        Ok(task.clone())
    }

    /// End the current enforcement episode. A task with no active episode
    /// is left untouched.
    pub async fn clear_enforcement(&self, id: &str) -> Result<Task, HearthError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        task.enforced_at = None;
        task.enforce_channel = None;
        task.last_enforce_error = None;
        Ok(task.clone())
    }

    /// Attach an evidence artifact by opaque storage key.
    pub async fn attach_proof(&self, id: &str, proof_key: &str) -> Result<Task, HearthError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        task.proof_key = Some(proof_key.to_string());
        Ok(task.clone())
    }

    /// Remove a task from active consideration by marking it cancelled.
    /// The record is kept for display; completed tasks go through
    /// [`TaskStore::delete_task`] instead.
    pub async fn cancel(&self, id: &str) -> Result<Task, HearthError> {
        let now_ms = self.clock.now_ms();
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| HearthError::task_not_found(id))?;
        if task.completed {
            return Err(HearthError::Validation(
                "completed task cannot be cancelled; delete it".into(),
            ));
        }
        if task.cancelled_at.is_none() {
            task.cancelled_at = Some(now_ms);
        }
        Ok(task.clone())
    }

    /// Permanently remove a completed task.
    ///
    /// A missing id is not an error: `Ok(false)` signals nothing was
    /// removed. A task that is not completed is refused; the documented
    /// path for it is [`TaskStore::cancel`].
    pub async fn delete_task(&self, id: &str) -> Result<bool, HearthError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get(id) {
            None => Ok(false),
            Some(task) if !task.completed => Err(HearthError::Validation(
                "only completed tasks can be deleted; cancel instead".into(),
            )),
            Some(_) => {
                tasks.remove(id);
                tracing::debug!(task_id = id, "task deleted");
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use hearth_core::{task_state, TaskState};
    use std::sync::Mutex;

    /// Clock that tests can advance by hand.
    struct TestClock(Mutex<DateTime<Utc>>);

    impl TestClock {
        fn at(dt: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(dt)))
        }

        fn advance_minutes(&self, minutes: i64) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::minutes(minutes);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn roster() -> Vec<User> {
        vec![
            User {
                id: "owner".into(),
                name: "Owner".into(),
                role: hearth_core::Role::Owner,
            },
            User {
                id: "kid-1".into(),
                name: "Sam".into(),
                role: hearth_core::Role::Child,
            },
        ]
    }

    fn store_at(dt: DateTime<Utc>) -> (TaskStore, Arc<TestClock>) {
        let clock = TestClock::at(dt);
        (TaskStore::new(roster(), clock.clone()), clock)
    }

    fn tuesday_nine() -> DateTime<Utc> {
        // 2025-06-03 is a Tuesday.
        Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap()
    }

    fn one_time(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            ..NewTask::default()
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let (store, _) = store_at(tuesday_nine());
        let err = store.create_task(one_time("   ")).await.unwrap_err();
        assert!(matches!(err, HearthError::Validation(_)));
        assert!(store.list_tasks().await.is_empty());
    }

    #[tokio::test]
    async fn create_weekly_computes_due_from_rule() {
        let (store, _) = store_at(tuesday_nine());
        let task = store
            .create_task(NewTask {
                title: "Practice".into(),
                repeat_rule: RepeatRule {
                    kind: RepeatKind::Weekly,
                    days_of_week: vec![1, 3, 5],
                    time_hhmm: Some("17:00".into()),
                    ..RepeatRule::default()
                },
                ..NewTask::default()
            })
            .await
            .unwrap();

        // Tuesday 09:00 -> Wednesday 17:00 of the same week.
        let expected = Utc.with_ymd_and_hms(2025, 6, 4, 17, 0, 0).unwrap();
        assert_eq!(task.due, Some(expected.timestamp_millis()));
        assert_eq!(task.repeat, RepeatKind::Weekly);
    }

    #[tokio::test]
    async fn create_weekly_with_no_days_is_rejected() {
        let (store, _) = store_at(tuesday_nine());
        let err = store
            .create_task(NewTask {
                title: "Practice".into(),
                repeat_rule: RepeatRule {
                    kind: RepeatKind::Weekly,
                    time_hhmm: Some("17:00".into()),
                    ..RepeatRule::default()
                },
                ..NewTask::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HearthError::Validation(_)));
    }

    #[tokio::test]
    async fn ack_is_idempotent_and_second_actor_wins() {
        let (store, clock) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();

        let first = store.ack(&task.id, "owner").await.unwrap();
        assert_eq!(first.ack_by.as_deref(), Some("owner"));

        clock.advance_minutes(5);
        let second = store.ack(&task.id, "kid-1").await.unwrap();
        assert_eq!(second.ack_by.as_deref(), Some("kid-1"));
        assert!(second.ack_at > first.ack_at);
    }

    #[tokio::test]
    async fn hold_requires_positive_minutes() {
        let (store, _) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();
        assert!(store.hold(&task.id, 0).await.is_err());
        assert!(store.hold(&task.id, -5).await.is_err());
        let held = store.hold(&task.id, 30).await.unwrap();
        assert!(held.hold_until.is_some());
    }

    #[tokio::test]
    async fn hold_masks_overdue_until_it_expires() {
        let (store, clock) = store_at(tuesday_nine());
        let task = store
            .create_task(NewTask {
                title: "Homework".into(),
                due: Some(clock.now_ms() + 15 * 60_000),
                ack_required: true,
                ..NewTask::default()
            })
            .await
            .unwrap();
        assert_eq!(task_state(&task, clock.now_ms()), TaskState::AwaitingAck);

        clock.advance_minutes(16);
        let task = store.get_task(&task.id).await.unwrap();
        assert_eq!(task_state(&task, clock.now_ms()), TaskState::Overdue);

        let task = store.hold(&task.id, 30).await.unwrap();
        assert_eq!(task_state(&task, clock.now_ms()), TaskState::Held);

        clock.advance_minutes(31);
        let task = store.get_task(&task.id).await.unwrap();
        assert_eq!(task_state(&task, clock.now_ms()), TaskState::Overdue);

        let task = store.ack(&task.id, "kid-1").await.unwrap();
        // The ack satisfies the deadline regardless of how late it is.
        assert_eq!(task_state(&task, clock.now_ms()), TaskState::Normal);
    }

    #[tokio::test]
    async fn resume_clears_hold_and_parent_pause() {
        let (store, _) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();
        store.hold(&task.id, 30).await.unwrap();
        store
            .update_task(
                &task.id,
                TaskPatch {
                    paused_by_parent: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();

        let resumed = store.resume(&task.id).await.unwrap();
        assert!(resumed.hold_until.is_none());
        assert!(!resumed.paused_by_parent);
    }

    #[tokio::test]
    async fn enforce_keeps_first_episode_timestamp() {
        let (store, clock) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();

        let first = store.enforce(&task.id, EnforceChannel::Log).await.unwrap();
        clock.advance_minutes(5);
        let second = store
            .enforce(&task.id, EnforceChannel::Email)
            .await
            .unwrap();

        assert_eq!(second.enforced_at, first.enforced_at);
        assert_eq!(second.enforce_channel, Some(EnforceChannel::Email));
    }

    #[tokio::test]
    async fn clear_enforcement_resets_episode_bookkeeping() {
        let (store, _) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();
        store.enforce(&task.id, EnforceChannel::Log).await.unwrap();
        store
            .record_enforce_error(&task.id, "smtp send failed")
            .await
            .unwrap();

        let cleared = store.clear_enforcement(&task.id).await.unwrap();
        assert!(cleared.enforced_at.is_none());
        assert!(cleared.enforce_channel.is_none());
        assert!(cleared.last_enforce_error.is_none());

        // Clearing again is a no-op, not an error.
        assert!(store.clear_enforcement(&task.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_only_removes_completed_tasks() {
        let (store, _) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();

        let err = store.delete_task(&task.id).await.unwrap_err();
        assert!(matches!(err, HearthError::Validation(_)));
        assert_eq!(store.list_tasks().await.len(), 1);

        store
            .update_task(
                &task.id,
                TaskPatch {
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(store.delete_task(&task.id).await.unwrap());
        assert!(store.list_tasks().await.is_empty());

        // Missing id is an idempotent signal, not an error.
        assert!(!store.delete_task(&task.id).await.unwrap());
    }

    #[tokio::test]
    async fn cancel_marks_but_keeps_the_record() {
        let (store, _) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();
        let cancelled = store.cancel(&task.id).await.unwrap();
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(store.list_tasks().await.len(), 1);
    }

    #[tokio::test]
    async fn cancel_refuses_completed_tasks() {
        let (store, _) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Homework")).await.unwrap();
        store
            .update_task(
                &task.id,
                TaskPatch {
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(store.cancel(&task.id).await.is_err());
    }

    #[tokio::test]
    async fn mutations_on_unknown_ids_are_not_found() {
        let (store, _) = store_at(tuesday_nine());
        for result in [
            store.ack("missing", "owner").await,
            store.hold("missing", 10).await,
            store.resume("missing").await,
            store.enforce("missing", EnforceChannel::Log).await,
            store.clear_enforcement("missing").await,
            store.cancel("missing").await,
            store.attach_proof("missing", "s3://proof").await,
        ] {
            assert!(matches!(result, Err(HearthError::NotFound { .. })));
        }
    }

    #[tokio::test]
    async fn patch_rule_change_recomputes_due() {
        let (store, clock) = store_at(tuesday_nine());
        let task = store.create_task(one_time("Practice")).await.unwrap();
        assert_eq!(task.due, None);

        let updated = store
            .update_task(
                &task.id,
                TaskPatch {
                    repeat_rule: Some(RepeatRule {
                        kind: RepeatKind::Daily,
                        time_hhmm: Some("17:00".into()),
                        ..RepeatRule::default()
                    }),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 6, 3, 17, 0, 0).unwrap();
        assert_eq!(updated.due, Some(expected.timestamp_millis()));
        assert!(updated.due.unwrap() > clock.now_ms());
    }

    #[tokio::test]
    async fn roster_lookup_matches_seed() {
        let (store, _) = store_at(tuesday_nine());
        assert_eq!(store.list_users().len(), 2);
        assert_eq!(store.get_user("kid-1").unwrap().name, "Sam");
        assert!(store.get_user("stranger").is_none());
    }
}
