//! In-memory work order store, the default backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo::{NewWorkOrder, WorkOrderRepository};
use super::{WorkOrder, WorkOrderError, WorkOrderStatus, format_number};

#[derive(Default)]
pub struct InMemoryWorkOrders {
    orders: RwLock<HashMap<Uuid, WorkOrder>>,
}

impl InMemoryWorkOrders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkOrderRepository for InMemoryWorkOrders {
    async fn create(&self, new: NewWorkOrder) -> Result<WorkOrder, WorkOrderError> {
        let mut orders = self.orders.write().await;
        let seq = orders
            .values()
            .filter(|o| o.department == new.department)
            .map(|o| o.seq)
            .max()
            .unwrap_or(0)
            + 1;
        let order = WorkOrder {
            id: Uuid::new_v4(),
            seq,
            number: format_number(new.department, seq),
            department: new.department,
            title: new.title,
            description: new.description,
            assignee: new.assignee,
            status: WorkOrderStatus::New,
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> Result<Option<WorkOrder>, WorkOrderError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<WorkOrder>, WorkOrderError> {
        Ok(self.orders.read().await.values().cloned().collect())
    }

    async fn update_if_status(&self, order: &WorkOrder, expected: WorkOrderStatus) -> Result<(), WorkOrderError> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(&order.id).ok_or(WorkOrderError::NotFound(order.id))?;
        if stored.status != expected {
            return Err(WorkOrderError::Conflict(order.id));
        }
        *stored = order.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workorder::Department;

    fn new_order(department: Department, title: &str) -> NewWorkOrder {
        NewWorkOrder {
            department,
            title: title.into(),
            description: String::new(),
            assignee: None,
            created_at: 1_000,
        }
    }

    #[tokio::test]
    async fn sequences_are_per_department() {
        let repo = InMemoryWorkOrders::new();
        let a = repo.create(new_order(Department::It, "Printer jam")).await.unwrap();
        let b = repo.create(new_order(Department::Td, "Spindle noise")).await.unwrap();
        let c = repo.create(new_order(Department::It, "VPN down")).await.unwrap();

        assert_eq!(a.number, "WO-IT-00001");
        assert_eq!(b.number, "WO-TD-00001");
        assert_eq!(c.number, "WO-IT-00002");
        assert_eq!(a.status, WorkOrderStatus::New);
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_checks_expected_status() {
        let repo = InMemoryWorkOrders::new();
        let mut order = repo.create(new_order(Department::It, "Laptop")).await.unwrap();
        order.status = WorkOrderStatus::Assigned;

        assert!(matches!(
            repo.update_if_status(&order, WorkOrderStatus::Assigned).await,
            Err(WorkOrderError::Conflict(_))
        ));
        repo.update_if_status(&order, WorkOrderStatus::New).await.unwrap();
        let stored = repo.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, WorkOrderStatus::Assigned);
    }

    #[tokio::test]
    async fn update_unknown_order_is_not_found() {
        let repo = InMemoryWorkOrders::new();
        let order = WorkOrder {
            id: Uuid::new_v4(),
            seq: 1,
            number: "WO-IT-00001".into(),
            department: Department::It,
            title: "ghost".into(),
            description: String::new(),
            assignee: None,
            status: WorkOrderStatus::New,
            created_at: 0,
            updated_at: 0,
        };
        assert!(matches!(
            repo.update_if_status(&order, WorkOrderStatus::New).await,
            Err(WorkOrderError::NotFound(_))
        ));
    }
}
