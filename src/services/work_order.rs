//! Work order service — create, transition and list IT/TD tickets.
//!
//! DESIGN
//! ======
//! Listing loads every order through the repository port and filters,
//! sorts and paginates in memory, matching how the dashboard tables work.
//! Transitions use a compare-on-status update so two reviewers moving the
//! same ticket cannot both win.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::record_audit;
use crate::audit::{AuditAction, AuditTarget};
use crate::clock::now_ms;
use crate::listing::{self, Page, PageRequest, SortDir};
use crate::state::AppState;
use crate::workflow::role::Actor;
use crate::workorder::{Department, NewWorkOrder, WorkOrder, WorkOrderError, WorkOrderStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkOrder {
    pub department: Department,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitionWorkOrder {
    pub to: WorkOrderStatus,
    /// Sets or replaces the assignee as part of the move.
    #[serde(default)]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderSort {
    #[default]
    Created,
    Number,
}

/// Query parameters accepted by `GET /api/work-orders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderQuery {
    pub department: Option<Department>,
    pub status: Option<WorkOrderStatus>,
    pub q: Option<String>,
    #[serde(default)]
    pub sort_by: WorkOrderSort,
    #[serde(default)]
    pub sort: SortDir,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// Open a new work order.
///
/// # Errors
///
/// Returns `BlankTitle` or a repository failure.
pub async fn create(state: &AppState, actor: &Actor, body: CreateWorkOrder) -> Result<WorkOrder, WorkOrderError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(WorkOrderError::BlankTitle);
    }
    let order = state
        .work_orders
        .create(NewWorkOrder {
            department: body.department,
            title: title.to_owned(),
            description: body.description.trim().to_owned(),
            assignee: non_blank(body.assignee),
            created_at: now_ms(),
        })
        .await?;
    info!(id = %order.id, number = %order.number, department = order.department.as_str(), "work order created");

    record_audit(
        state,
        actor,
        AuditTarget::work_order(order.id),
        AuditAction::WorkOrderCreated { number: order.number.clone() },
        format!("{} opened: {}", order.number, order.title),
    )
    .await;
    Ok(order)
}

/// Fetch one work order.
///
/// # Errors
///
/// Returns `NotFound` or a repository failure.
pub async fn get(state: &AppState, id: Uuid) -> Result<WorkOrder, WorkOrderError> {
    state.work_orders.get(id).await?.ok_or(WorkOrderError::NotFound(id))
}

/// Move a work order along its department pipeline.
///
/// # Errors
///
/// Returns `InvalidTransition`, `AssigneeRequired`, `Conflict`, or a
/// repository failure.
pub async fn transition(
    state: &AppState,
    actor: &Actor,
    id: Uuid,
    body: TransitionWorkOrder,
) -> Result<WorkOrder, WorkOrderError> {
    let mut order = get(state, id).await?;
    let from = order.status;
    if !from.can_move(body.to, order.department) {
        return Err(WorkOrderError::InvalidTransition { from, to: body.to });
    }
    if let Some(assignee) = non_blank(body.assignee) {
        order.assignee = Some(assignee);
    }
    if body.to == WorkOrderStatus::Assigned && order.assignee.is_none() {
        return Err(WorkOrderError::AssigneeRequired);
    }

    order.status = body.to;
    order.updated_at = now_ms();
    state.work_orders.update_if_status(&order, from).await?;
    info!(id = %order.id, number = %order.number, %from, to = %order.status, "work order moved");

    record_audit(
        state,
        actor,
        AuditTarget::work_order(order.id),
        AuditAction::WorkOrderTransitioned { from, to: order.status },
        format!("{} moved {from} → {}", order.number, order.status),
    )
    .await;
    Ok(order)
}

/// Filter, sort and paginate work orders.
///
/// # Errors
///
/// Returns a repository failure.
pub async fn list(state: &AppState, query: &WorkOrderQuery) -> Result<Page<WorkOrder>, WorkOrderError> {
    let mut rows: Vec<WorkOrder> = state
        .work_orders
        .list()
        .await?
        .into_iter()
        .filter(|o| query.department.is_none_or(|d| o.department == d))
        .filter(|o| query.status.is_none_or(|s| o.status == s))
        .filter(|o| {
            query
                .q
                .as_deref()
                .is_none_or(|q| listing::contains_ci(&o.title, q) || listing::contains_ci(&o.number, q))
        })
        .collect();

    sort_orders(&mut rows, query.sort_by);
    if query.sort == SortDir::Desc {
        rows.reverse();
    }

    let req = PageRequest::resolve(query.page, query.per_page, state.config.page_size, state.config.max_page_size);
    Ok(listing::paginate(rows, req))
}

/// Ascending order for `sort_by`. Numbers compare by `(department, seq)`
/// since the zero-padded display form stops ordering past five digits.
fn sort_orders(rows: &mut [WorkOrder], sort_by: WorkOrderSort) {
    match sort_by {
        WorkOrderSort::Created => rows.sort_by_key(|o| (o.created_at, o.department.as_str(), o.seq)),
        WorkOrderSort::Number => rows.sort_by_key(|o| (o.department.as_str(), o.seq)),
    }
}

#[cfg(test)]
#[path = "work_order_test.rs"]
mod tests;
