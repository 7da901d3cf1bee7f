// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the task REST API.
//!
//! One handler per route; each resolves the acting identity, applies the
//! role policy, and performs a single store operation. Display ordering
//! (assignee roster order, then due time, then title) happens here, not in
//! the store.

use std::collections::HashMap;

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use hearth_core::types::{EnforceAction, EnforceChannel, RepeatKind, RepeatRule, Task, User};
use hearth_store::{NewTask, PresenceSnapshot, TaskPatch};

use crate::error::ApiError;
use crate::identity::Identity;
use crate::policy::{authorize, TaskAction};
use crate::server::GatewayState;

/// Response body for `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub ok: bool,
    pub name: String,
    pub version: String,
    pub endpoints: Vec<&'static str>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Response body for `GET /api/plan`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub plan: String,
    pub max_kids: u32,
}

/// Modern request body for `POST /api/tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub due: Option<i64>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub for_minor: bool,
    #[serde(default)]
    pub ack_required: bool,
    #[serde(default)]
    pub photo_proof: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub repeat: Option<RepeatKind>,
    #[serde(default)]
    pub repeat_rule: Option<RepeatRule>,
    #[serde(default)]
    pub auto_enforce: bool,
    #[serde(default)]
    pub auto_action: Option<EnforceAction>,
}

/// Legacy request body still sent by older clients:
/// `{taskTitle, taskType, taskDate, assignees?, note?}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCreateTask {
    pub task_title: String,
    /// Present in every legacy payload; its value carried no meaning
    /// beyond marking the shape.
    #[allow(dead_code)]
    pub task_type: String,
    /// `yyyy-mm-dd`.
    pub task_date: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Either create-task shape. The legacy variant is tried first since its
/// marker fields are required and absent from modern bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateTaskPayload {
    Legacy(LegacyCreateTask),
    Modern(CreateTaskRequest),
}

impl CreateTaskPayload {
    /// Normalize either shape into store input.
    fn into_new_task(self) -> Result<NewTask, ApiError> {
        match self {
            CreateTaskPayload::Modern(req) => {
                let repeat_rule = req.repeat_rule.unwrap_or_else(|| RepeatRule {
                    kind: req.repeat.unwrap_or_default(),
                    ..RepeatRule::default()
                });
                Ok(NewTask {
                    title: req.title,
                    assigned_to: req.assigned_to,
                    due: req.due,
                    for_minor: req.for_minor,
                    ack_required: req.ack_required,
                    photo_proof: req.photo_proof,
                    note: req.note,
                    repeat_rule,
                    auto_enforce: req.auto_enforce,
                    auto_action: req.auto_action,
                })
            }
            CreateTaskPayload::Legacy(req) => {
                let date = chrono::NaiveDate::parse_from_str(&req.task_date, "%Y-%m-%d")
                    .map_err(|_| {
                        hearth_core::HearthError::Validation(format!(
                            "taskDate `{}` is not a yyyy-mm-dd date",
                            req.task_date
                        ))
                    })?;
                let due = date
                    .and_hms_opt(0, 0, 0)
                    .expect("midnight is always a valid time")
                    .and_utc()
                    .timestamp_millis();
                Ok(NewTask {
                    title: req.task_title,
                    assigned_to: req.assignees.into_iter().next(),
                    due: Some(due),
                    note: req.note,
                    ..NewTask::default()
                })
            }
        }
    }
}

/// Request body for `POST /api/tasks/:id/hold`.
#[derive(Debug, Deserialize)]
pub struct HoldRequest {
    pub minutes: i64,
}

/// Request body for `POST /api/tasks/:id/proof`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRequest {
    pub proof_key: String,
}

/// Response body for `DELETE /api/tasks/:id`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
    pub deleted: bool,
}

/// Request body for `POST /api/parental/enforce`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentalEnforceRequest {
    pub target_user_id: String,
    pub action: EnforceAction,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response body for `POST /api/parental/enforce`.
#[derive(Debug, Serialize)]
pub struct ParentalEnforceResponse {
    pub ok: bool,
    pub received: ParentalEnforceRequest,
}

/// Query for `GET /api/device/presence`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceQuery {
    pub user_id: String,
}

/// Request body for `POST /api/device/heartbeat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    pub user_id: String,
}

/// Minimal `{ok: true}` acknowledgment.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// GET /
pub async fn get_service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        ok: true,
        name: "Hearth Family Backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            "/api/plan",
            "/api/users",
            "/api/tasks (GET/POST)",
            "/api/tasks/:id (PATCH/DELETE)",
            "/api/tasks/:id/{ack,hold,resume,enforce,clear-enforcement,cancel,proof} (POST)",
            "/api/parental/enforce (POST)",
            "/api/device/presence (GET)",
            "/api/device/heartbeat (POST)",
        ],
    })
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /api/plan
pub async fn get_plan(State(state): State<GatewayState>) -> Json<PlanResponse> {
    Json(PlanResponse {
        plan: state.plan.as_str().to_string(),
        max_kids: state.plan.max_kids(),
    })
}

/// GET /api/users
pub async fn get_users(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<User>>, ApiError> {
    authorize(&identity, TaskAction::View)?;
    Ok(Json(state.store.list_users()))
}

/// GET /api/tasks
pub async fn get_tasks(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Task>>, ApiError> {
    authorize(&identity, TaskAction::View)?;
    let mut tasks = state.store.list_tasks().await;
    sort_for_display(&mut tasks, &state.store.list_users());
    Ok(Json(tasks))
}

/// POST /api/tasks
pub async fn post_task(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    authorize(&identity, TaskAction::Create)?;
    let input = payload.into_new_task()?;
    let task = state.store.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/:id
pub async fn patch_task(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::Edit)?;
    Ok(Json(state.store.update_task(&id, patch).await?))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    authorize(&identity, TaskAction::Delete)?;
    let deleted = state.store.delete_task(&id).await?;
    Ok(Json(DeleteResponse { ok: true, deleted }))
}

/// POST /api/tasks/:id/ack
pub async fn post_ack(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::Ack)?;
    Ok(Json(state.store.ack(&id, &identity.user_id).await?))
}

/// POST /api/tasks/:id/hold
pub async fn post_hold(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<HoldRequest>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::Hold)?;
    Ok(Json(state.store.hold(&id, body.minutes).await?))
}

/// POST /api/tasks/:id/resume
pub async fn post_resume(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::Resume)?;
    Ok(Json(state.store.resume(&id).await?))
}

/// POST /api/tasks/:id/enforce
///
/// Marks the enforcement episode and dispatches the alert. Overdue is the
/// recommended precondition but not gated: enforcing early is treated as
/// an operator override. Delivery failures are recorded on the task, not
/// surfaced as request errors.
pub async fn post_enforce(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::Enforce)?;
    let task = state.store.get_task(&id).await?;

    let (subject, body) = hearth_notify::task_alert(&task);
    let task = match state.notifier.send_alert(&subject, body).await {
        Ok(channel) => state.store.enforce(&id, channel).await?,
        Err(err) => {
            tracing::warn!(task_id = id.as_str(), error = %err, "enforcement alert failed");
            state.store.enforce(&id, EnforceChannel::Log).await?;
            state.store.record_enforce_error(&id, &err.to_string()).await?
        }
    };
    Ok(Json(task))
}

/// POST /api/tasks/:id/clear-enforcement
pub async fn post_clear_enforcement(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::ClearEnforcement)?;
    Ok(Json(state.store.clear_enforcement(&id).await?))
}

/// POST /api/tasks/:id/cancel
pub async fn post_cancel(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::Cancel)?;
    Ok(Json(state.store.cancel(&id).await?))
}

/// POST /api/tasks/:id/proof
pub async fn post_proof(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<ProofRequest>,
) -> Result<Json<Task>, ApiError> {
    authorize(&identity, TaskAction::AttachProof)?;
    Ok(Json(state.store.attach_proof(&id, &body.proof_key).await?))
}

/// POST /api/parental/enforce
///
/// Device-level enforcement request. Dispatches through the notifier and
/// acknowledges; there is no device transport behind it.
pub async fn post_parental_enforce(
    State(state): State<GatewayState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ParentalEnforceRequest>,
) -> Result<Json<ParentalEnforceResponse>, ApiError> {
    authorize(&identity, TaskAction::ParentalEnforce)?;

    let reason = body.reason.as_deref().unwrap_or("no reason given");
    let (subject, mail_body) =
        hearth_notify::parental_alert(&body.target_user_id, body.action, reason);
    if let Err(err) = state.notifier.send_alert(&subject, mail_body).await {
        tracing::warn!(
            target_user_id = body.target_user_id.as_str(),
            error = %err,
            "parental enforce alert failed"
        );
    }

    Ok(Json(ParentalEnforceResponse {
        ok: true,
        received: body,
    }))
}

/// GET /api/device/presence?userId=
pub async fn get_presence(
    State(state): State<GatewayState>,
    Query(query): Query<PresenceQuery>,
) -> Json<PresenceSnapshot> {
    Json(state.presence.snapshot(&query.user_id))
}

/// POST /api/device/heartbeat
pub async fn post_device_heartbeat(
    State(state): State<GatewayState>,
    Json(body): Json<HeartbeatRequest>,
) -> Json<OkResponse> {
    state.presence.heartbeat(&body.user_id);
    Json(OkResponse { ok: true })
}

/// Sort tasks for display: assignee in roster order (unassigned last),
/// then due time (no deadline last), then title.
fn sort_for_display(tasks: &mut [Task], roster: &[User]) {
    let rank: HashMap<&str, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, user)| (user.id.as_str(), i))
        .collect();
    tasks.sort_by(|a, b| {
        let rank_of = |task: &Task| {
            task.assigned_to
                .as_deref()
                .and_then(|id| rank.get(id).copied())
                .unwrap_or(usize::MAX)
        };
        let due_of = |task: &Task| task.due.unwrap_or(i64::MAX);
        (rank_of(a), due_of(a), a.title.as_str()).cmp(&(rank_of(b), due_of(b), b.title.as_str()))
    });
}
