//! Postgres-backed work order store, used when `DATABASE_URL` is set.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo::{NewWorkOrder, WorkOrderRepository};
use super::{Department, WorkOrder, WorkOrderError, WorkOrderStatus, format_number};

type WorkOrderRow = (Uuid, String, i64, String, String, Option<String>, String, i64, i64);

const SELECT_COLUMNS: &str =
    "SELECT id, department, seq, title, description, assignee, status, created_at, updated_at FROM work_orders";

pub struct PgWorkOrders {
    pool: PgPool,
}

impl PgWorkOrders {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_order(row: WorkOrderRow) -> Result<WorkOrder, WorkOrderError> {
    let (id, department, seq, title, description, assignee, status, created_at, updated_at) = row;
    let department = Department::parse(&department)
        .ok_or_else(|| WorkOrderError::Corrupt(format!("unknown department '{department}' on {id}")))?;
    let status = WorkOrderStatus::parse(&status)
        .ok_or_else(|| WorkOrderError::Corrupt(format!("unknown status '{status}' on {id}")))?;
    Ok(WorkOrder {
        id,
        seq,
        number: format_number(department, seq),
        department,
        title,
        description,
        assignee,
        status,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl WorkOrderRepository for PgWorkOrders {
    async fn create(&self, new: NewWorkOrder) -> Result<WorkOrder, WorkOrderError> {
        let id = Uuid::new_v4();
        // Concurrent creates in one department collide on (department, seq)
        // and surface as a retryable database error.
        let seq: i64 = sqlx::query_scalar(
            "INSERT INTO work_orders (id, department, seq, title, description, assignee, status, created_at, updated_at)
             SELECT $1, $2, COALESCE(MAX(seq), 0) + 1, $3, $4, $5, 'new', $6, $6
             FROM work_orders WHERE department = $2
             RETURNING seq",
        )
        .bind(id)
        .bind(new.department.as_str())
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.assignee)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(WorkOrder {
            id,
            seq,
            number: format_number(new.department, seq),
            department: new.department,
            title: new.title,
            description: new.description,
            assignee: new.assignee,
            status: WorkOrderStatus::New,
            created_at: new.created_at,
            updated_at: new.created_at,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<WorkOrder>, WorkOrderError> {
        let row = sqlx::query_as::<_, WorkOrderRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_order).transpose()
    }

    async fn list(&self) -> Result<Vec<WorkOrder>, WorkOrderError> {
        let rows = sqlx::query_as::<_, WorkOrderRow>(SELECT_COLUMNS)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_order).collect()
    }

    async fn update_if_status(&self, order: &WorkOrder, expected: WorkOrderStatus) -> Result<(), WorkOrderError> {
        let result = sqlx::query(
            "UPDATE work_orders
             SET title = $2, description = $3, assignee = $4, status = $5, updated_at = $6
             WHERE id = $1 AND status = $7",
        )
        .bind(order.id)
        .bind(&order.title)
        .bind(&order.description)
        .bind(&order.assignee)
        .bind(order.status.as_str())
        .bind(order.updated_at)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM work_orders WHERE id = $1)")
                .bind(order.id)
                .fetch_one(&self.pool)
                .await?;
            return Err(if exists { WorkOrderError::Conflict(order.id) } else { WorkOrderError::NotFound(order.id) });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(department: &str, status: &str) -> WorkOrderRow {
        (Uuid::new_v4(), department.into(), 7, "Spindle".into(), String::new(), None, status.into(), 1, 2)
    }

    #[test]
    fn row_to_order_formats_number() {
        let order = row_to_order(row("td", "waiting_parts")).unwrap();
        assert_eq!(order.number, "WO-TD-00007");
        assert_eq!(order.status, WorkOrderStatus::WaitingParts);
    }

    #[test]
    fn row_to_order_flags_unknown_values() {
        assert!(matches!(row_to_order(row("hr", "new")), Err(WorkOrderError::Corrupt(_))));
        assert!(matches!(row_to_order(row("it", "done")), Err(WorkOrderError::Corrupt(_))));
    }

    #[cfg(feature = "live-db-tests")]
    #[tokio::test]
    async fn create_and_transition_against_live_db() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        let pool = crate::db::init_pool(&url, 2).await.expect("pool");
        let repo = PgWorkOrders::new(pool);

        let mut order = repo
            .create(NewWorkOrder {
                department: Department::It,
                title: "live test".into(),
                description: String::new(),
                assignee: Some("Rina".into()),
                created_at: 1,
            })
            .await
            .unwrap();
        order.status = WorkOrderStatus::Assigned;
        repo.update_if_status(&order, WorkOrderStatus::New).await.unwrap();
        let stored = repo.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, WorkOrderStatus::Assigned);
    }
}
