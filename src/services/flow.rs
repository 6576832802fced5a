//! Approval flow service — read and replace the reviewer order.

use tracing::info;

use crate::audit::{AuditAction, AuditTarget};
use crate::state::AppState;
use crate::workflow::flow::{ApprovalFlow, FlowError, FlowStep};
use crate::workflow::role::Actor;

#[derive(Debug, thiserror::Error)]
pub enum FlowServiceError {
    #[error("only an admin may change the approval flow")]
    AdminOnly,
    #[error(transparent)]
    Invalid(#[from] FlowError),
}

impl crate::error::ErrorCode for FlowServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AdminOnly => "E_FLOW_ADMIN_ONLY",
            Self::Invalid(e) => e.error_code(),
        }
    }
}

pub async fn current_flow(state: &AppState) -> ApprovalFlow {
    state.flow.read().await.clone()
}

/// Replace the approval flow. Takes effect for every later gate check.
///
/// # Errors
///
/// Returns `AdminOnly` for non-admin actors or the validation failure.
pub async fn replace_flow(state: &AppState, actor: &Actor, steps: Vec<FlowStep>) -> Result<ApprovalFlow, FlowServiceError> {
    if !actor.admin {
        return Err(FlowServiceError::AdminOnly);
    }
    let next = ApprovalFlow::new(steps)?;
    let order: Vec<_> = next.steps().iter().map(|s| s.role).collect();

    let mut flow = state.flow.write().await;
    *flow = next.clone();
    info!(order = ?order, "approval flow replaced");

    let mut resets = Vec::new();
    {
        let mut schedules = state.schedules.write().await;
        for schedule in schedules.values_mut() {
            let schedule_id = schedule.id;
            for machine in schedule.areas.iter_mut().flat_map(|area| area.machines.iter_mut()) {
                let roles = machine.approvals.align_to(&flow);
                if !roles.is_empty() {
                    info!(%schedule_id, machine_id = %machine.id, roles = ?roles, "approvals reset by flow change");
                    resets.push((schedule_id, machine.id, machine.name.clone(), roles));
                }
            }
        }
    }
    drop(flow);

    let detail = format!(
        "approval flow set to {}",
        next.steps()
            .iter()
            .map(|s| format!("{} ({})", s.role, s.assignee))
            .collect::<Vec<_>>()
            .join(" → ")
    );
    super::record_audit(state, actor, AuditTarget::default(), AuditAction::FlowUpdated { order }, detail).await;
    for (schedule_id, machine_id, name, roles) in resets {
        let listed = roles.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        super::record_audit(
            state,
            actor,
            AuditTarget::machine(schedule_id, machine_id),
            AuditAction::ApprovalsReset { roles },
            format!("{name}: {listed} reset to pending after flow change"),
        )
        .await;
    }
    Ok(next)
}
