//! Monitoring service — checklist saves, approvals and comment threads.
//!
//! DESIGN
//! ======
//! Every operation resolves `(schedule, machine)` under the schedules lock,
//! applies one synchronous `Machine` method, and records an audit entry
//! once the transition has succeeded. Lock order is always
//! flow → schedules → audit.
//!
//! ERROR HANDLING
//! ==============
//! Gate denials are expected traffic (a reviewer clicking too early) and
//! are logged at `warn`; the machine is left untouched.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::record_audit;
use crate::audit::{AuditAction, AuditTarget};
use crate::clock::now_ms;
use crate::state::AppState;
use crate::workflow::approval::ApprovalStatus;
use crate::workflow::checklist::ItemStatus;
use crate::workflow::comment::{Comment, CommentNode};
use crate::workflow::machine::{Machine, MachineError, ResultEntry, SaveOutcome, Transition};
use crate::workflow::role::{Actor, ReviewerRole};
use crate::workflow::schedule::Schedule;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MonitoringError {
    #[error("schedule not found: {0}")]
    ScheduleNotFound(Uuid),
    #[error("machine not found: {0}")]
    MachineNotFound(Uuid),
    #[error(transparent)]
    Machine(#[from] MachineError),
}

impl crate::error::ErrorCode for MonitoringError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ScheduleNotFound(_) => "E_SCHEDULE_NOT_FOUND",
            Self::MachineNotFound(_) => "E_MACHINE_NOT_FOUND",
            Self::Machine(e) => e.error_code(),
        }
    }
}

/// What a reviewer decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject(String),
    Feedback(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub id: Uuid,
    pub title: String,
    pub period: String,
    pub machines: usize,
    pub submitted: usize,
    pub fully_approved: usize,
}

/// One reviewer column as seen by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RoleColumn {
    pub role: ReviewerRole,
    pub assignee: String,
    pub status: ApprovalStatus,
    pub can_act: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineView {
    pub schedule_id: Uuid,
    pub machine: Machine,
    /// Columns in flow order.
    pub columns: Vec<RoleColumn>,
    pub comment_tree: Vec<CommentNode>,
    pub out_of_spec: usize,
}

// =============================================================================
// READS
// =============================================================================

pub async fn list_schedules(state: &AppState) -> Vec<ScheduleSummary> {
    let schedules = state.schedules.read().await;
    let mut out: Vec<ScheduleSummary> = schedules
        .values()
        .map(|s| ScheduleSummary {
            id: s.id,
            title: s.title.clone(),
            period: s.period.clone(),
            machines: s.machines().count(),
            submitted: s.machines().filter(|m| m.submitted()).count(),
            fully_approved: s.machines().filter(|m| m.approvals.all_approved()).count(),
        })
        .collect();
    out.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    out
}

/// Fetch a full schedule snapshot.
///
/// # Errors
///
/// Returns `ScheduleNotFound` for an unknown id.
pub async fn get_schedule(state: &AppState, schedule_id: Uuid) -> Result<Schedule, MonitoringError> {
    let schedules = state.schedules.read().await;
    schedules
        .get(&schedule_id)
        .cloned()
        .ok_or(MonitoringError::ScheduleNotFound(schedule_id))
}

/// Machine detail with per-role gate verdicts for `actor`.
///
/// # Errors
///
/// Returns a not-found error for an unknown schedule or machine.
pub async fn machine_view(
    state: &AppState,
    schedule_id: Uuid,
    machine_id: Uuid,
    actor: &Actor,
) -> Result<MachineView, MonitoringError> {
    let flow = state.flow.read().await;
    let schedules = state.schedules.read().await;
    let machine = find_machine(&schedules, schedule_id, machine_id)?;

    let columns = flow
        .steps()
        .iter()
        .map(|step| {
            let verdict = machine.gate(actor, step.role, &flow);
            RoleColumn {
                role: step.role,
                assignee: step.assignee.clone(),
                status: machine.approvals.status(step.role),
                can_act: verdict.is_ok(),
                blocked_reason: verdict.err().map(|e| e.to_string()),
            }
        })
        .collect();

    Ok(MachineView {
        schedule_id,
        machine: machine.clone(),
        columns,
        comment_tree: machine.comment_tree(),
        out_of_spec: machine.items.iter().filter(|i| i.status == ItemStatus::Tms).count(),
    })
}

/// Reply tree of a machine's comments.
///
/// # Errors
///
/// Returns a not-found error for an unknown schedule or machine.
pub async fn comment_tree(state: &AppState, schedule_id: Uuid, machine_id: Uuid) -> Result<Vec<CommentNode>, MonitoringError> {
    let schedules = state.schedules.read().await;
    Ok(find_machine(&schedules, schedule_id, machine_id)?.comment_tree())
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Apply checklist results and save.
///
/// # Errors
///
/// Returns a not-found error or the checklist validation failure.
pub async fn save_checklist(
    state: &AppState,
    schedule_id: Uuid,
    machine_id: Uuid,
    actor: &Actor,
    entries: &[ResultEntry],
) -> Result<SaveOutcome, MonitoringError> {
    let mut schedules = state.schedules.write().await;
    let machine = find_machine_mut(&mut schedules, schedule_id, machine_id)?;
    let outcome = machine.save_checklist(entries)?;
    let detail = format!("{} checklist saved (submission {})", machine.name, outcome.submissions);
    info!(%schedule_id, %machine_id, submissions = outcome.submissions, edited = outcome.edited_roles.len(), "checklist saved");

    record_audit(
        state,
        actor,
        AuditTarget::machine(schedule_id, machine_id),
        AuditAction::ChecklistSaved { submissions: outcome.submissions, edited_roles: outcome.edited_roles.clone() },
        detail,
    )
    .await;
    Ok(outcome)
}

/// Apply a reviewer decision for `role`.
///
/// # Errors
///
/// Returns a not-found error, a blank reason, or the gate denial.
pub async fn decide(
    state: &AppState,
    schedule_id: Uuid,
    machine_id: Uuid,
    actor: &Actor,
    role: ReviewerRole,
    decision: Decision,
) -> Result<Transition, MonitoringError> {
    let flow = state.flow.read().await;
    let mut schedules = state.schedules.write().await;
    let machine = find_machine_mut(&mut schedules, schedule_id, machine_id)?;

    let now = now_ms();
    let result = match &decision {
        Decision::Approve => machine.approve(actor, role, &flow),
        Decision::Reject(reason) => machine.reject(actor, role, reason, &flow, now),
        Decision::Feedback(reason) => machine.give_feedback(actor, role, reason, &flow, now),
    };
    let transition = match result {
        Ok(t) => t,
        Err(MachineError::Gate(denied)) => {
            warn!(%schedule_id, %machine_id, role = %role, reason = %denied, "approval gate denied");
            return Err(MachineError::Gate(denied).into());
        }
        Err(e) => return Err(e.into()),
    };

    let who = flow.assignee(role).unwrap_or(role.as_str());
    let detail = match &decision {
        Decision::Approve => format!("{who} ({role}) approved {}", machine.name),
        Decision::Reject(reason) => format!("{who} ({role}) rejected {}: {}", machine.name, reason.trim()),
        Decision::Feedback(reason) => format!("{who} ({role}) gave feedback on {}: {}", machine.name, reason.trim()),
    };
    info!(
        %schedule_id,
        %machine_id,
        role = %role,
        from = transition.from.as_str(),
        to = transition.to.as_str(),
        "approval transition"
    );

    record_audit(
        state,
        actor,
        AuditTarget::machine(schedule_id, machine_id),
        AuditAction::Decision {
            role,
            from: transition.from,
            to: transition.to,
            removed_comments: transition.removed_comments,
        },
        detail,
    )
    .await;
    Ok(transition)
}

/// Reply to a comment on a machine.
///
/// # Errors
///
/// Returns a not-found error or the reply validation failure.
pub async fn reply(
    state: &AppState,
    schedule_id: Uuid,
    machine_id: Uuid,
    actor: &Actor,
    parent_id: Uuid,
    body: &str,
) -> Result<Comment, MonitoringError> {
    let mut schedules = state.schedules.write().await;
    let machine = find_machine_mut(&mut schedules, schedule_id, machine_id)?;
    let comment = machine.reply(actor, parent_id, body, now_ms())?.clone();
    let detail = format!("reply on {}: {}", machine.name, comment.body);
    info!(%schedule_id, %machine_id, comment_id = %comment.id, %parent_id, "comment reply added");

    record_audit(
        state,
        actor,
        AuditTarget::machine(schedule_id, machine_id),
        AuditAction::CommentReplied { comment_id: comment.id, parent_id },
        detail,
    )
    .await;
    Ok(comment)
}

// =============================================================================
// HELPERS
// =============================================================================

fn find_machine(
    schedules: &HashMap<Uuid, Schedule>,
    schedule_id: Uuid,
    machine_id: Uuid,
) -> Result<&Machine, MonitoringError> {
    schedules
        .get(&schedule_id)
        .ok_or(MonitoringError::ScheduleNotFound(schedule_id))?
        .machine(machine_id)
        .ok_or(MonitoringError::MachineNotFound(machine_id))
}

fn find_machine_mut(
    schedules: &mut HashMap<Uuid, Schedule>,
    schedule_id: Uuid,
    machine_id: Uuid,
) -> Result<&mut Machine, MonitoringError> {
    schedules
        .get_mut(&schedule_id)
        .ok_or(MonitoringError::ScheduleNotFound(schedule_id))?
        .machine_mut(machine_id)
        .ok_or(MonitoringError::MachineNotFound(machine_id))
}

#[cfg(test)]
#[path = "monitoring_test.rs"]
mod tests;
