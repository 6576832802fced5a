use super::*;
use crate::state::test_helpers;
use crate::workflow::role::{Actor, ReviewerRole};
use crate::workorder::{Department, WorkOrderStatus};

fn leader() -> ReviewerActor {
    ReviewerActor(Actor::reviewer(ReviewerRole::Leader))
}

fn new_order(title: &str) -> CreateWorkOrder {
    CreateWorkOrder { department: Department::It, title: title.into(), description: String::new(), assignee: None }
}

#[test]
fn status_mapping_covers_error_classes() {
    let id = Uuid::nil();
    assert_eq!(work_order_status(&WorkOrderError::NotFound(id)), StatusCode::NOT_FOUND);
    assert_eq!(work_order_status(&WorkOrderError::BlankTitle), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(work_order_status(&WorkOrderError::Conflict(id)), StatusCode::CONFLICT);
    assert_eq!(
        work_order_status(&WorkOrderError::Database(sqlx::Error::PoolTimedOut)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn create_returns_created() {
    let state = test_helpers::test_app_state();
    let (status, Json(order)) = create_work_order(State(state.clone()), leader(), ApiJson(new_order("Scanner offline")))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order.number, "WO-IT-00001");

    let Json(fetched) = get_work_order(State(state), leader(), ApiPath(order.id)).await.unwrap();
    assert_eq!(fetched.id, order.id);
}

#[tokio::test]
async fn invalid_transition_is_unprocessable() {
    let state = test_helpers::test_app_state();
    let (_, Json(order)) = create_work_order(State(state.clone()), leader(), ApiJson(new_order("Badge reader")))
        .await
        .unwrap();

    let err = transition_work_order(
        State(state),
        leader(),
        ApiPath(order.id),
        ApiJson(TransitionWorkOrder { to: WorkOrderStatus::Resolved, assignee: None }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err.body.code, "E_WORK_ORDER_INVALID_TRANSITION");
}

#[tokio::test]
async fn list_honours_query() {
    let state = test_helpers::test_app_state();
    for title in ["Monitor flicker", "Keyboard"] {
        create_work_order(State(state.clone()), leader(), ApiJson(new_order(title))).await.unwrap();
    }
    let query = WorkOrderQuery { q: Some("monitor".into()), ..WorkOrderQuery::default() };
    let Json(page) = list_work_orders(State(state), leader(), ApiQuery(query)).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Monitor flicker");
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let state = test_helpers::test_app_state();
    let err = get_work_order(State(state), leader(), ApiPath(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}
