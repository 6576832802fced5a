//! Work orders — IT/TD service tickets and their status pipelines.
//!
//! DESIGN
//! ======
//! Each department has a fixed pipeline; `WorkOrderStatus::can_move` is the
//! only place transitions are decided. Storage sits behind the
//! `WorkOrderRepository` port so handlers never touch a concrete backend.

mod memory;
mod postgres;
mod repo;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::InMemoryWorkOrders;
pub use postgres::PgWorkOrders;
pub use repo::{NewWorkOrder, WorkOrderRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    It,
    Td,
}

impl Department {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::It => "it",
            Self::Td => "td",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "it" => Some(Self::It),
            "td" => Some(Self::Td),
            _ => None,
        }
    }

    fn number_prefix(self) -> &'static str {
        match self {
            Self::It => "IT",
            Self::Td => "TD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    New,
    Assigned,
    InProgress,
    WaitingParts,
    Resolved,
    Closed,
    Cancelled,
}

impl WorkOrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::WaitingParts => "waiting_parts",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "new" => Some(Self::New),
            "assigned" => Some(Self::Assigned),
            "in_progress" => Some(Self::InProgress),
            "waiting_parts" => Some(Self::WaitingParts),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Whether `department`'s pipeline allows moving from `self` to `to`.
    #[must_use]
    pub fn can_move(self, to: Self, department: Department) -> bool {
        use WorkOrderStatus::*;

        if self.is_terminal() {
            return false;
        }
        if to == Cancelled {
            return true;
        }
        match (self, to, department) {
            (New, Assigned, _)
            | (Assigned, InProgress, _)
            | (InProgress, Resolved, _)
            | (Resolved, Closed, _)
            | (InProgress, WaitingParts, Department::Td)
            | (WaitingParts, InProgress, Department::Td) => true,
            _ => false,
        }
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkOrderError {
    #[error("work order not found: {0}")]
    NotFound(Uuid),
    #[error("title is required")]
    BlankTitle,
    #[error("cannot move work order from {from} to {to}")]
    InvalidTransition { from: WorkOrderStatus, to: WorkOrderStatus },
    #[error("an assignee is required before assigning")]
    AssigneeRequired,
    #[error("work order {0} changed concurrently")]
    Conflict(Uuid),
    #[error("stored work order is corrupt: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for WorkOrderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_WORK_ORDER_NOT_FOUND",
            Self::BlankTitle => "E_WORK_ORDER_BLANK_TITLE",
            Self::InvalidTransition { .. } => "E_WORK_ORDER_INVALID_TRANSITION",
            Self::AssigneeRequired => "E_WORK_ORDER_ASSIGNEE_REQUIRED",
            Self::Conflict(_) => "E_WORK_ORDER_CONFLICT",
            Self::Corrupt(_) => "E_WORK_ORDER_CORRUPT",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Database(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: Uuid,
    /// Per-department sequence number, starting at 1.
    pub seq: i64,
    pub number: String,
    pub department: Department,
    pub title: String,
    pub description: String,
    pub assignee: Option<String>,
    pub status: WorkOrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Display number, e.g. `WO-TD-00042`.
#[must_use]
pub fn format_number(department: Department, seq: i64) -> String {
    format!("WO-{}-{seq:05}", department.number_prefix())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
