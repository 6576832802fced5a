//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own locking, logging and audit recording so route
//! handlers can stay focused on protocol translation and actor plumbing.
//! The workflow rules themselves live in `crate::workflow` and stay
//! synchronous.

pub mod flow;
pub mod monitoring;
pub mod work_order;

use uuid::Uuid;

use crate::audit::{AuditAction, AuditEntry, AuditTarget};
use crate::clock::now_ms;
use crate::state::AppState;
use crate::workflow::role::Actor;

/// Append one entry to the audit trail. Call only after the mutation it
/// describes has succeeded.
pub(crate) async fn record_audit(
    state: &AppState,
    actor: &Actor,
    target: AuditTarget,
    action: AuditAction,
    detail: String,
) {
    let entry = AuditEntry { id: Uuid::new_v4(), ts: now_ms(), actor: *actor, target, action, detail };
    state.audit.write().await.record(entry);
}
