//! Machine — the reviewable unit of an inspection schedule.
//!
//! A machine owns its checklist, its approval record and its comment log.
//! Every mutation goes through a method here so the gate in
//! `approval::can_act` is always applied against the live record.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::approval::{self, ApprovalRecord, ApprovalStatus, GateDenied};
use super::checklist::{self, ChecklistError, ChecklistItem};
use super::comment::{self, Comment, CommentNode};
use super::flow::ApprovalFlow;
use super::role::{Actor, ReviewerRole};

#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    #[error(transparent)]
    Checklist(#[from] ChecklistError),
    #[error(transparent)]
    Gate(#[from] GateDenied),
    #[error("a reason is required")]
    BlankReason,
    #[error("comment body is empty")]
    BlankBody,
    #[error("parent comment not found: {0}")]
    ParentNotFound(Uuid),
    #[error("only reviewers with a role may reply")]
    NoAuthorRole,
    #[error("replies may nest at most {0} levels deep")]
    ReplyTooDeep(usize),
}

impl crate::error::ErrorCode for MachineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Checklist(e) => e.error_code(),
            Self::Gate(e) => e.error_code(),
            Self::BlankReason => "E_BLANK_REASON",
            Self::BlankBody => "E_BLANK_BODY",
            Self::ParentNotFound(_) => "E_PARENT_NOT_FOUND",
            Self::NoAuthorRole => "E_NO_AUTHOR_ROLE",
            Self::ReplyTooDeep(_) => "E_REPLY_TOO_DEEP",
        }
    }
}

/// One result entered on the checklist form.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultEntry {
    pub item_id: Uuid,
    pub result: String,
    #[serde(default)]
    pub remark: String,
}

/// Outcome of a successful checklist save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub submissions: u32,
    /// Roles moved from rejected/feedback to edited by this resubmission.
    pub edited_roles: Vec<ReviewerRole>,
}

/// Outcome of an approve/reject/feedback call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub role: ReviewerRole,
    pub from: ApprovalStatus,
    pub to: ApprovalStatus,
    pub removed_comments: usize,
    pub comment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: Uuid,
    pub name: String,
    pub items: Vec<ChecklistItem>,
    #[serde(default)]
    pub approvals: ApprovalRecord,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Number of successful checklist saves.
    #[serde(default)]
    pub submissions: u32,
}

impl Machine {
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<ChecklistItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            items,
            approvals: ApprovalRecord::default(),
            comments: Vec::new(),
            submissions: 0,
        }
    }

    #[must_use]
    pub fn submitted(&self) -> bool {
        self.submissions > 0
    }

    /// Apply entered results and save the checklist.
    ///
    /// Entries are staged on a copy first; nothing changes unless every item
    /// ends up with a result.
    ///
    /// # Errors
    ///
    /// Returns `UnknownItem` for an entry that matches no item, or
    /// `MissingResults` listing every item still empty.
    pub fn save_checklist(&mut self, entries: &[ResultEntry]) -> Result<SaveOutcome, MachineError> {
        let mut staged = self.items.clone();
        for entry in entries {
            let item = staged
                .iter_mut()
                .find(|item| item.id == entry.item_id)
                .ok_or(ChecklistError::UnknownItem(entry.item_id))?;
            item.record(&entry.result, &entry.remark);
        }
        checklist::validate_for_save(&staged)?;

        self.items = staged;
        self.submissions += 1;
        let edited_roles = if self.submissions > 1 { self.approvals.mark_edited() } else { Vec::new() };
        Ok(SaveOutcome { submissions: self.submissions, edited_roles })
    }

    /// Gate verdict for `actor` acting as `role`.
    ///
    /// # Errors
    ///
    /// Returns the first failing gate condition.
    pub fn gate(&self, actor: &Actor, role: ReviewerRole, flow: &ApprovalFlow) -> Result<(), GateDenied> {
        approval::can_act(actor, role, self.submitted(), &self.approvals, flow)
    }

    /// Approve as `role`, clearing that role's own top-level remarks.
    ///
    /// # Errors
    ///
    /// Returns a gate denial if the actor may not act.
    pub fn approve(&mut self, actor: &Actor, role: ReviewerRole, flow: &ApprovalFlow) -> Result<Transition, MachineError> {
        self.gate(actor, role, flow)?;
        let from = self.approvals.set(role, ApprovalStatus::Approved);
        let removed_comments = self.remove_top_level_comments_by(role);
        Ok(Transition { role, from, to: ApprovalStatus::Approved, removed_comments, comment_id: None })
    }

    /// Reject as `role` with a reason posted as a top-level comment.
    ///
    /// # Errors
    ///
    /// Returns `BlankReason` or a gate denial.
    pub fn reject(
        &mut self,
        actor: &Actor,
        role: ReviewerRole,
        reason: &str,
        flow: &ApprovalFlow,
        now_ms: i64,
    ) -> Result<Transition, MachineError> {
        self.decide_with_reason(actor, role, ApprovalStatus::Rejected, reason, flow, now_ms)
    }

    /// Give feedback as `role` with a reason posted as a top-level comment.
    ///
    /// # Errors
    ///
    /// Returns `BlankReason` or a gate denial.
    pub fn give_feedback(
        &mut self,
        actor: &Actor,
        role: ReviewerRole,
        reason: &str,
        flow: &ApprovalFlow,
        now_ms: i64,
    ) -> Result<Transition, MachineError> {
        self.decide_with_reason(actor, role, ApprovalStatus::FeedbackGiven, reason, flow, now_ms)
    }

    fn decide_with_reason(
        &mut self,
        actor: &Actor,
        role: ReviewerRole,
        to: ApprovalStatus,
        reason: &str,
        flow: &ApprovalFlow,
        now_ms: i64,
    ) -> Result<Transition, MachineError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(MachineError::BlankReason);
        }
        self.gate(actor, role, flow)?;

        let from = self.approvals.set(role, to);
        let comment = Comment {
            id: Uuid::new_v4(),
            machine_id: self.id,
            author: Some(role),
            body: reason.to_owned(),
            ts: now_ms,
            parent_id: None,
        };
        let comment_id = comment.id;
        self.comments.push(comment);
        Ok(Transition { role, from, to, removed_comments: 0, comment_id: Some(comment_id) })
    }

    /// Reply to an existing comment on this machine.
    ///
    /// # Errors
    ///
    /// Returns `BlankBody`, `NoAuthorRole` for a role-less admin, or
    /// `ParentNotFound` if the parent is not on this machine, or
    /// `ReplyTooDeep` past `comment::MAX_REPLY_DEPTH`.
    pub fn reply(&mut self, actor: &Actor, parent_id: Uuid, body: &str, now_ms: i64) -> Result<&Comment, MachineError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(MachineError::BlankBody);
        }
        let author = actor.role.ok_or(MachineError::NoAuthorRole)?;
        let parent_depth = comment::depth_of(&self.comments, parent_id).ok_or(MachineError::ParentNotFound(parent_id))?;
        if parent_depth >= comment::MAX_REPLY_DEPTH {
            return Err(MachineError::ReplyTooDeep(comment::MAX_REPLY_DEPTH));
        }

        self.comments.push(Comment {
            id: Uuid::new_v4(),
            machine_id: self.id,
            author: Some(author),
            body: body.to_owned(),
            ts: now_ms,
            parent_id: Some(parent_id),
        });
        Ok(&self.comments[self.comments.len() - 1])
    }

    #[must_use]
    pub fn comment_tree(&self) -> Vec<CommentNode> {
        comment::build_tree(&self.comments)
    }

    /// Remove `role`'s top-level comments and every reply beneath them.
    fn remove_top_level_comments_by(&mut self, role: ReviewerRole) -> usize {
        let roots: Vec<CommentNode> = self
            .comment_tree()
            .into_iter()
            .filter(|node| node.comment.author == Some(role))
            .collect();
        if roots.is_empty() {
            return 0;
        }

        let doomed: HashSet<Uuid> = comment::flatten(&roots).into_iter().map(|c| c.id).collect();
        let before = self.comments.len();
        self.comments.retain(|c| !doomed.contains(&c.id));
        before - self.comments.len()
    }
}

#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;
