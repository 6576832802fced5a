//! Storage port for work orders.

use async_trait::async_trait;
use uuid::Uuid;

use super::{Department, WorkOrder, WorkOrderError, WorkOrderStatus};

/// Fields supplied when opening a work order.
#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub department: Department,
    pub title: String,
    pub description: String,
    pub assignee: Option<String>,
    pub created_at: i64,
}

#[async_trait]
pub trait WorkOrderRepository: Send + Sync {
    /// Insert a new order in status `New`, assigning the next sequence
    /// number for its department.
    async fn create(&self, new: NewWorkOrder) -> Result<WorkOrder, WorkOrderError>;

    async fn get(&self, id: Uuid) -> Result<Option<WorkOrder>, WorkOrderError>;

    async fn list(&self) -> Result<Vec<WorkOrder>, WorkOrderError>;

    /// Store `order` only if the stored status still equals `expected`.
    ///
    /// Returns `Conflict` when another writer moved the order first.
    async fn update_if_status(&self, order: &WorkOrder, expected: WorkOrderStatus) -> Result<(), WorkOrderError>;
}
