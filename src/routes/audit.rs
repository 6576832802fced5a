//! Audit trail route.

use axum::extract::State;
use axum::response::Json;

use crate::audit::{AuditEntry, AuditQuery};
use crate::listing::Page;
use crate::routes::actor::ReviewerActor;
use crate::routes::extract::ApiQuery;
use crate::state::AppState;

/// `GET /api/audit` — filtered, sorted, paginated audit entries.
pub async fn list_audit(
    State(state): State<AppState>,
    _actor: ReviewerActor,
    ApiQuery(query): ApiQuery<AuditQuery>,
) -> Json<Page<AuditEntry>> {
    let audit = state.audit.read().await;
    Json(audit.query(&query, state.config.page_size, state.config.max_page_size))
}
