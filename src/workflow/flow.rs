//! Approval flow configuration — the ordered reviewer list.
//!
//! DESIGN
//! ======
//! A flow is an ordered list of `(role, assignee)` steps. Order decides
//! gating: a role can only act once every role before it has approved.
//! Replacing the flow is validated as a whole so a half-edited order can
//! never be observed by the gate.

use serde::{Deserialize, Serialize};

use super::role::ReviewerRole;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("approval flow must list all {expected} roles exactly once (got {got} steps)")]
    WrongLength { expected: usize, got: usize },
    #[error("role listed more than once: {0}")]
    DuplicateRole(ReviewerRole),
    #[error("assignee name is blank for role {0}")]
    BlankAssignee(ReviewerRole),
}

impl crate::error::ErrorCode for FlowError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongLength { .. } => "E_FLOW_LENGTH",
            Self::DuplicateRole(_) => "E_FLOW_DUPLICATE_ROLE",
            Self::BlankAssignee(_) => "E_FLOW_BLANK_ASSIGNEE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub role: ReviewerRole,
    pub assignee: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalFlow {
    steps: Vec<FlowStep>,
}

impl Default for ApprovalFlow {
    fn default() -> Self {
        let steps = ReviewerRole::ALL
            .iter()
            .map(|role| FlowStep { role: *role, assignee: default_assignee(*role).to_owned() })
            .collect();
        Self { steps }
    }
}

fn default_assignee(role: ReviewerRole) -> &'static str {
    match role {
        ReviewerRole::Leader => "Line Leader",
        ReviewerRole::Supervisor => "Shift Supervisor",
        ReviewerRole::SectionHead => "Section Head",
        ReviewerRole::Manager => "Plant Manager",
    }
}

impl ApprovalFlow {
    /// Build a flow from explicit steps.
    ///
    /// # Errors
    ///
    /// Returns an error unless every role appears exactly once and every
    /// assignee name is non-blank.
    pub fn new(steps: Vec<FlowStep>) -> Result<Self, FlowError> {
        if steps.len() != ReviewerRole::ALL.len() {
            return Err(FlowError::WrongLength { expected: ReviewerRole::ALL.len(), got: steps.len() });
        }
        for (idx, step) in steps.iter().enumerate() {
            if steps[..idx].iter().any(|prev| prev.role == step.role) {
                return Err(FlowError::DuplicateRole(step.role));
            }
            if step.assignee.trim().is_empty() {
                return Err(FlowError::BlankAssignee(step.role));
            }
        }
        let steps = steps
            .into_iter()
            .map(|step| FlowStep { role: step.role, assignee: step.assignee.trim().to_owned() })
            .collect();
        Ok(Self { steps })
    }

    #[must_use]
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    /// Zero-based position of `role` in the flow.
    #[must_use]
    pub fn position(&self, role: ReviewerRole) -> Option<usize> {
        self.steps.iter().position(|step| step.role == role)
    }

    /// Roles ordered strictly before `role`.
    #[must_use]
    pub fn predecessors(&self, role: ReviewerRole) -> Vec<ReviewerRole> {
        let Some(pos) = self.position(role) else {
            return Vec::new();
        };
        self.steps[..pos].iter().map(|step| step.role).collect()
    }

    /// Roles ordered strictly after `role`.
    #[must_use]
    pub fn successors(&self, role: ReviewerRole) -> Vec<ReviewerRole> {
        let Some(pos) = self.position(role) else {
            return Vec::new();
        };
        self.steps[pos + 1..].iter().map(|step| step.role).collect()
    }

    #[must_use]
    pub fn assignee(&self, role: ReviewerRole) -> Option<&str> {
        self.steps
            .iter()
            .find(|step| step.role == role)
            .map(|step| step.assignee.as_str())
    }
}

#[cfg(test)]
#[path = "flow_test.rs"]
mod tests;
