// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-based action policy, applied at the HTTP boundary.
//!
//! The store is role-agnostic; this single function decides what a role
//! may do. Owner and Family operate everything; Child and Minor can look
//! at tasks, acknowledge them, and attach proof.

use hearth_core::Role;

use crate::error::ApiError;
use crate::identity::Identity;

/// Actions a caller can take through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    View,
    Create,
    Edit,
    Ack,
    Hold,
    Resume,
    Enforce,
    ClearEnforcement,
    Cancel,
    Delete,
    AttachProof,
    ParentalEnforce,
}

impl TaskAction {
    fn name(self) -> &'static str {
        match self {
            TaskAction::View => "view tasks",
            TaskAction::Create => "create tasks",
            TaskAction::Edit => "edit tasks",
            TaskAction::Ack => "acknowledge tasks",
            TaskAction::Hold => "hold tasks",
            TaskAction::Resume => "resume tasks",
            TaskAction::Enforce => "enforce tasks",
            TaskAction::ClearEnforcement => "clear enforcement",
            TaskAction::Cancel => "cancel tasks",
            TaskAction::Delete => "delete tasks",
            TaskAction::AttachProof => "attach proof",
            TaskAction::ParentalEnforce => "run parental enforcement",
        }
    }
}

/// Whether `role` may perform `action`.
pub fn is_allowed(role: Role, action: TaskAction) -> bool {
    match role {
        Role::Owner | Role::Family => true,
        Role::Child | Role::Minor => matches!(
            action,
            TaskAction::View | TaskAction::Ack | TaskAction::AttachProof
        ),
    }
}

/// Reject the request with a 403 when the role does not permit the action.
pub fn authorize(identity: &Identity, action: TaskAction) -> Result<(), ApiError> {
    if is_allowed(identity.role, action) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "role {} may not {}",
            identity.role,
            action.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_family_may_do_everything() {
        for role in [Role::Owner, Role::Family] {
            for action in [
                TaskAction::View,
                TaskAction::Create,
                TaskAction::Enforce,
                TaskAction::Delete,
                TaskAction::ParentalEnforce,
            ] {
                assert!(is_allowed(role, action), "{role} should allow {action:?}");
            }
        }
    }

    #[test]
    fn kids_may_only_view_ack_and_attach_proof() {
        for role in [Role::Child, Role::Minor] {
            assert!(is_allowed(role, TaskAction::View));
            assert!(is_allowed(role, TaskAction::Ack));
            assert!(is_allowed(role, TaskAction::AttachProof));
            assert!(!is_allowed(role, TaskAction::Create));
            assert!(!is_allowed(role, TaskAction::Enforce));
            assert!(!is_allowed(role, TaskAction::Delete));
            assert!(!is_allowed(role, TaskAction::ParentalEnforce));
        }
    }

    #[test]
    fn authorize_names_the_role_and_action() {
        let identity = Identity {
            user_id: "kid-1".into(),
            role: Role::Child,
        };
        let err = authorize(&identity, TaskAction::Delete).unwrap_err();
        match err {
            ApiError::Forbidden(message) => {
                assert!(message.contains("Child"));
                assert!(message.contains("delete"));
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
