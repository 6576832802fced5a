//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under a single Axum router. Every `/api`
//! handler takes a `ReviewerActor`, so identity headers are enforced per
//! route rather than by middleware.

pub mod actor;
pub mod audit;
pub mod extract;
pub mod flow;
pub mod monitoring;
pub mod work_orders;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const MACHINE: &str = "/api/schedules/{id}/machines/{machine_id}";

/// Full application router.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/schedules", get(monitoring::list_schedules))
        .route("/api/schedules/{id}", get(monitoring::get_schedule))
        .route(MACHINE, get(monitoring::get_machine))
        .route(&format!("{MACHINE}/checklist"), put(monitoring::save_checklist))
        .route(&format!("{MACHINE}/approvals/{{role}}/approve"), post(monitoring::approve))
        .route(&format!("{MACHINE}/approvals/{{role}}/reject"), post(monitoring::reject))
        .route(&format!("{MACHINE}/approvals/{{role}}/feedback"), post(monitoring::feedback))
        .route(
            &format!("{MACHINE}/comments"),
            get(monitoring::list_comments).post(monitoring::reply),
        )
        .route("/api/approval-flow", get(flow::get_flow).put(flow::replace_flow))
        .route("/api/audit", get(audit::list_audit))
        .route(
            "/api/work-orders",
            get(work_orders::list_work_orders).post(work_orders::create_work_order),
        )
        .route("/api/work-orders/{id}", get(work_orders::get_work_order))
        .route("/api/work-orders/{id}/transition", post(work_orders::transition_work_order));

    let router = if state.config.cors_allow_any {
        router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
