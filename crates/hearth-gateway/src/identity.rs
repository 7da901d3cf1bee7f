// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Acting-identity resolution.
//!
//! The reference clients name the acting user in an `x-user-id` header
//! with no server-side verification; that trust model is kept, but the
//! identity is made explicit: this middleware resolves the header against
//! the roster once and every handler receives an [`Identity`] rather than
//! re-reading headers. Role checks happen in [`crate::policy`], never in
//! the store.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use hearth_core::Role;

use crate::server::GatewayState;

/// Header naming the acting user.
pub const USER_HEADER: &str = "x-user-id";

/// Acting user id when no header is sent (matches the admin UI default).
const DEFAULT_USER: &str = "owner";

/// The acting user for one request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

/// Resolve the `x-user-id` header into an [`Identity`] request extension.
///
/// Ids that are not in the roster act with `Family` rights, mirroring the
/// reference backend's fully-trusting behavior for unknown callers while
/// still restricting roster members seeded as Child/Minor.
pub async fn identity_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = request
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_USER)
        .to_string();

    let role = state
        .store
        .get_user(&user_id)
        .map(|user| user.role)
        .unwrap_or(Role::Family);

    request.extensions_mut().insert(Identity { user_id, role });
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_cloneable_for_extensions() {
        let identity = Identity {
            user_id: "owner".into(),
            role: Role::Owner,
        };
        let cloned = identity.clone();
        assert_eq!(cloned.user_id, "owner");
        assert_eq!(cloned.role, Role::Owner);
    }
}
