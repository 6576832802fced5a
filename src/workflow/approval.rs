//! Per-machine approval record and the gate that decides who may act.
//!
//! DESIGN
//! ======
//! The gate is evaluated against the current snapshot on every call; there
//! is no stored "unlocked" flag. Conditions are checked in a fixed order so
//! a denial always names the first failing one:
//!
//! 1. the actor holds the role (or is admin),
//! 2. the checklist has been submitted at least once,
//! 3. every earlier role in the flow is `Approved`,
//! 4. every later role in the flow is still `Pending`.
//!
//! Rule 4 stops a role from revising its decision after the flow has moved
//! past it. When the flow is reordered, `ApprovalRecord::align_to` resets
//! decisions that now sit behind an unapproved role, so rule 4 can never
//! lock every column at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flow::ApprovalFlow;
use super::role::{Actor, ReviewerRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    FeedbackGiven,
    Edited,
}

impl ApprovalStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::FeedbackGiven => "feedback_given",
            Self::Edited => "edited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateDenied {
    #[error("actor does not hold role {0}")]
    RoleMismatch(ReviewerRole),
    #[error("checklist has not been submitted yet")]
    NotSubmitted,
    #[error("waiting for {0} to approve")]
    AwaitingPredecessor(ReviewerRole),
    #[error("{0} has already acted; earlier decisions are locked")]
    DownstreamLocked(ReviewerRole),
}

impl crate::error::ErrorCode for GateDenied {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RoleMismatch(_) => "E_GATE_ROLE_MISMATCH",
            Self::NotSubmitted => "E_GATE_NOT_SUBMITTED",
            Self::AwaitingPredecessor(_) => "E_GATE_AWAITING_PREDECESSOR",
            Self::DownstreamLocked(_) => "E_GATE_DOWNSTREAM_LOCKED",
        }
    }
}

/// Status of every reviewer role for one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovalRecord {
    statuses: BTreeMap<ReviewerRole, ApprovalStatus>,
}

impl Default for ApprovalRecord {
    fn default() -> Self {
        Self { statuses: ReviewerRole::ALL.iter().map(|role| (*role, ApprovalStatus::Pending)).collect() }
    }
}

impl ApprovalRecord {
    #[must_use]
    pub fn status(&self, role: ReviewerRole) -> ApprovalStatus {
        self.statuses.get(&role).copied().unwrap_or(ApprovalStatus::Pending)
    }

    /// Set a role's status and return the previous one.
    pub fn set(&mut self, role: ReviewerRole, status: ApprovalStatus) -> ApprovalStatus {
        self.statuses.insert(role, status).unwrap_or(ApprovalStatus::Pending)
    }

    /// Move every rejected or feedback role to `Edited`. Returns the roles changed.
    pub fn mark_edited(&mut self) -> Vec<ReviewerRole> {
        let mut changed = Vec::new();
        for (role, status) in &mut self.statuses {
            if matches!(status, ApprovalStatus::Rejected | ApprovalStatus::FeedbackGiven) {
                *status = ApprovalStatus::Edited;
                changed.push(*role);
            }
        }
        changed
    }

    /// Bring the record back in line with `flow` after a reorder.
    ///
    /// Walking in flow order, the `Approved` prefix and the first role after
    /// it are kept; every later role that is not `Pending` is reset. Returns
    /// the roles reset. A record already consistent with `flow` is untouched.
    pub fn align_to(&mut self, flow: &ApprovalFlow) -> Vec<ReviewerRole> {
        let mut reset = Vec::new();
        let mut frontier_seen = false;
        for step in flow.steps() {
            let status = self.status(step.role);
            if !frontier_seen {
                frontier_seen = status != ApprovalStatus::Approved;
                continue;
            }
            if status != ApprovalStatus::Pending {
                self.set(step.role, ApprovalStatus::Pending);
                reset.push(step.role);
            }
        }
        reset
    }

    #[must_use]
    pub fn all_approved(&self) -> bool {
        ReviewerRole::ALL
            .iter()
            .all(|role| self.status(*role) == ApprovalStatus::Approved)
    }
}

/// Decide whether `actor` may act in the column of `role`.
///
/// # Errors
///
/// Returns the first failing gate condition.
pub fn can_act(
    actor: &Actor,
    role: ReviewerRole,
    submitted: bool,
    record: &ApprovalRecord,
    flow: &ApprovalFlow,
) -> Result<(), GateDenied> {
    if !actor.holds(role) {
        return Err(GateDenied::RoleMismatch(role));
    }
    if !submitted {
        return Err(GateDenied::NotSubmitted);
    }
    if let Some(waiting) = flow
        .predecessors(role)
        .into_iter()
        .find(|prev| record.status(*prev) != ApprovalStatus::Approved)
    {
        return Err(GateDenied::AwaitingPredecessor(waiting));
    }
    if let Some(acted) = flow
        .successors(role)
        .into_iter()
        .find(|next| record.status(*next) != ApprovalStatus::Pending)
    {
        return Err(GateDenied::DownstreamLocked(acted));
    }
    Ok(())
}

#[cfg(test)]
#[path = "approval_test.rs"]
mod tests;
