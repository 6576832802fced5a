//! Schedule, checklist, approval and comment routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::actor::ReviewerActor;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::services::monitoring::{self, Decision, MachineView, MonitoringError, ScheduleSummary};
use crate::state::AppState;
use crate::workflow::checklist::ChecklistError;
use crate::workflow::comment::{Comment, CommentNode};
use crate::workflow::machine::{MachineError, ResultEntry, SaveOutcome, Transition};
use crate::workflow::role::ReviewerRole;
use crate::workflow::schedule::Schedule;

#[derive(Deserialize)]
pub struct SaveChecklistBody {
    pub results: Vec<ResultEntry>,
}

#[derive(Deserialize)]
pub struct ReasonBody {
    pub reason: String,
}

#[derive(Deserialize)]
pub struct ReplyBody {
    pub parent_id: Uuid,
    pub body: String,
}

/// `GET /api/schedules` — schedule summaries.
pub async fn list_schedules(State(state): State<AppState>, _actor: ReviewerActor) -> Json<Vec<ScheduleSummary>> {
    Json(monitoring::list_schedules(&state).await)
}

/// `GET /api/schedules/:id` — full schedule.
pub async fn get_schedule(
    State(state): State<AppState>,
    _actor: ReviewerActor,
    ApiPath(schedule_id): ApiPath<Uuid>,
) -> Result<Json<Schedule>, ApiError> {
    monitoring::get_schedule(&state, schedule_id)
        .await
        .map(Json)
        .map_err(monitoring_error)
}

/// `GET /api/schedules/:id/machines/:machine_id` — machine detail for the caller.
pub async fn get_machine(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiPath((schedule_id, machine_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<MachineView>, ApiError> {
    monitoring::machine_view(&state, schedule_id, machine_id, &actor)
        .await
        .map(Json)
        .map_err(monitoring_error)
}

/// `PUT /api/schedules/:id/machines/:machine_id/checklist` — fill results and save.
pub async fn save_checklist(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiPath((schedule_id, machine_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(body): ApiJson<SaveChecklistBody>,
) -> Result<Json<SaveOutcome>, ApiError> {
    monitoring::save_checklist(&state, schedule_id, machine_id, &actor, &body.results)
        .await
        .map(Json)
        .map_err(monitoring_error)
}

/// `POST /api/schedules/:id/machines/:machine_id/approvals/:role/approve`.
pub async fn approve(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiPath((schedule_id, machine_id, role)): ApiPath<(Uuid, Uuid, ReviewerRole)>,
) -> Result<Json<Transition>, ApiError> {
    monitoring::decide(&state, schedule_id, machine_id, &actor, role, Decision::Approve)
        .await
        .map(Json)
        .map_err(monitoring_error)
}

/// `POST /api/schedules/:id/machines/:machine_id/approvals/:role/reject`.
pub async fn reject(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiPath((schedule_id, machine_id, role)): ApiPath<(Uuid, Uuid, ReviewerRole)>,
    ApiJson(body): ApiJson<ReasonBody>,
) -> Result<Json<Transition>, ApiError> {
    monitoring::decide(&state, schedule_id, machine_id, &actor, role, Decision::Reject(body.reason))
        .await
        .map(Json)
        .map_err(monitoring_error)
}

/// `POST /api/schedules/:id/machines/:machine_id/approvals/:role/feedback`.
pub async fn feedback(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiPath((schedule_id, machine_id, role)): ApiPath<(Uuid, Uuid, ReviewerRole)>,
    ApiJson(body): ApiJson<ReasonBody>,
) -> Result<Json<Transition>, ApiError> {
    monitoring::decide(&state, schedule_id, machine_id, &actor, role, Decision::Feedback(body.reason))
        .await
        .map(Json)
        .map_err(monitoring_error)
}

/// `GET /api/schedules/:id/machines/:machine_id/comments` — reply tree.
pub async fn list_comments(
    State(state): State<AppState>,
    _actor: ReviewerActor,
    ApiPath((schedule_id, machine_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Vec<CommentNode>>, ApiError> {
    monitoring::comment_tree(&state, schedule_id, machine_id)
        .await
        .map(Json)
        .map_err(monitoring_error)
}

/// `POST /api/schedules/:id/machines/:machine_id/comments` — reply to a comment.
pub async fn reply(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiPath((schedule_id, machine_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(body): ApiJson<ReplyBody>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = monitoring::reply(&state, schedule_id, machine_id, &actor, body.parent_id, &body.body)
        .await
        .map_err(monitoring_error)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) fn monitoring_status(err: &MonitoringError) -> StatusCode {
    match err {
        MonitoringError::ScheduleNotFound(_)
        | MonitoringError::MachineNotFound(_)
        | MonitoringError::Machine(MachineError::ParentNotFound(_)) => StatusCode::NOT_FOUND,
        MonitoringError::Machine(MachineError::Gate(_) | MachineError::NoAuthorRole) => StatusCode::FORBIDDEN,
        MonitoringError::Machine(
            MachineError::Checklist(ChecklistError::MissingResults(_) | ChecklistError::UnknownItem(_))
            | MachineError::BlankReason
            | MachineError::BlankBody
            | MachineError::ReplyTooDeep(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn monitoring_error(err: MonitoringError) -> ApiError {
    ApiError::from_code(monitoring_status(&err), &err)
}

#[cfg(test)]
#[path = "monitoring_test.rs"]
mod tests;
