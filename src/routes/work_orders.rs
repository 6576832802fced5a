//! Work order routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::listing::Page;
use crate::routes::actor::ReviewerActor;
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::work_order::{self, CreateWorkOrder, TransitionWorkOrder, WorkOrderQuery};
use crate::state::AppState;
use crate::workorder::{WorkOrder, WorkOrderError};

/// `GET /api/work-orders` — filtered, sorted, paginated work orders.
pub async fn list_work_orders(
    State(state): State<AppState>,
    _actor: ReviewerActor,
    ApiQuery(query): ApiQuery<WorkOrderQuery>,
) -> Result<Json<Page<WorkOrder>>, ApiError> {
    work_order::list(&state, &query).await.map(Json).map_err(work_order_error)
}

/// `POST /api/work-orders` — open a work order.
pub async fn create_work_order(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiJson(body): ApiJson<CreateWorkOrder>,
) -> Result<(StatusCode, Json<WorkOrder>), ApiError> {
    let order = work_order::create(&state, &actor, body).await.map_err(work_order_error)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/work-orders/:id` — fetch one work order.
pub async fn get_work_order(
    State(state): State<AppState>,
    _actor: ReviewerActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<WorkOrder>, ApiError> {
    work_order::get(&state, id).await.map(Json).map_err(work_order_error)
}

/// `POST /api/work-orders/:id/transition` — move along the department pipeline.
pub async fn transition_work_order(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<TransitionWorkOrder>,
) -> Result<Json<WorkOrder>, ApiError> {
    work_order::transition(&state, &actor, id, body)
        .await
        .map(Json)
        .map_err(work_order_error)
}

pub(crate) fn work_order_status(err: &WorkOrderError) -> StatusCode {
    match err {
        WorkOrderError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkOrderError::BlankTitle | WorkOrderError::InvalidTransition { .. } | WorkOrderError::AssigneeRequired => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        WorkOrderError::Conflict(_) => StatusCode::CONFLICT,
        WorkOrderError::Corrupt(_) | WorkOrderError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn work_order_error(err: WorkOrderError) -> ApiError {
    ApiError::from_code(work_order_status(&err), &err)
}

#[cfg(test)]
#[path = "work_orders_test.rs"]
mod tests;
