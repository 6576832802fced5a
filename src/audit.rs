//! Audit trail — who changed what, when.
//!
//! DESIGN
//! ======
//! Append-only list of entries kept in `AppState` for the process lifetime.
//! Entries are written by services after a transition succeeds, never by
//! routes. Queries filter, sort by timestamp and paginate in one pass over
//! a snapshot.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listing::{self, Page, PageRequest, SortDir};
use crate::workflow::approval::ApprovalStatus;
use crate::workflow::role::{Actor, ReviewerRole};
use crate::workorder::WorkOrderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditAction {
    ChecklistSaved { submissions: u32, edited_roles: Vec<ReviewerRole> },
    Decision { role: ReviewerRole, from: ApprovalStatus, to: ApprovalStatus, removed_comments: usize },
    CommentReplied { comment_id: Uuid, parent_id: Uuid },
    FlowUpdated { order: Vec<ReviewerRole> },
    ApprovalsReset { roles: Vec<ReviewerRole> },
    WorkOrderCreated { number: String },
    WorkOrderTransitioned { from: WorkOrderStatus, to: WorkOrderStatus },
}

impl AuditAction {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChecklistSaved { .. } => "checklist_saved",
            Self::Decision { .. } => "decision",
            Self::CommentReplied { .. } => "comment_replied",
            Self::FlowUpdated { .. } => "flow_updated",
            Self::ApprovalsReset { .. } => "approvals_reset",
            Self::WorkOrderCreated { .. } => "work_order_created",
            Self::WorkOrderTransitioned { .. } => "work_order_transitioned",
        }
    }
}

/// What an audit entry is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order_id: Option<Uuid>,
}

impl AuditTarget {
    #[must_use]
    pub fn machine(schedule_id: Uuid, machine_id: Uuid) -> Self {
        Self { schedule_id: Some(schedule_id), machine_id: Some(machine_id), work_order_id: None }
    }

    #[must_use]
    pub fn work_order(work_order_id: Uuid) -> Self {
        Self { work_order_id: Some(work_order_id), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub ts: i64,
    pub actor: Actor,
    pub target: AuditTarget,
    pub action: AuditAction,
    pub detail: String,
}

/// Query parameters accepted by `GET /api/audit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub kind: Option<String>,
    pub role: Option<ReviewerRole>,
    pub machine_id: Option<Uuid>,
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortDir,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl AuditQuery {
    fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(kind) = self.kind.as_deref() {
            if entry.action.kind() != kind {
                return false;
            }
        }
        if let Some(role) = self.role {
            if entry.actor.role != Some(role) {
                return false;
            }
        }
        if let Some(machine_id) = self.machine_id {
            if entry.target.machine_id != Some(machine_id) {
                return false;
            }
        }
        self.q.as_deref().is_none_or(|q| listing::contains_ci(&entry.detail, q))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: AuditEntry) {
        let (kind, id) = (entry.action.kind(), entry.id);
        self.entries.push(entry);
        tracing::debug!(kind, %id, total = self.len(), "audit entry recorded");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filter, sort by `(ts, id)` and paginate.
    #[must_use]
    pub fn query(&self, query: &AuditQuery, default_size: usize, max_size: usize) -> Page<AuditEntry> {
        let mut rows: Vec<AuditEntry> = self.entries.iter().filter(|e| query.matches(e)).cloned().collect();
        rows.sort_by_key(|e| (e.ts, e.id));
        if query.sort == SortDir::Desc {
            rows.reverse();
        }
        let req = PageRequest::resolve(query.page, query.per_page, default_size, max_size);
        listing::paginate(rows, req)
    }
}

#[cfg(test)]
#[path = "audit_test.rs"]
mod tests;
