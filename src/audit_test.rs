use super::*;

fn entry(ts: i64, actor: Actor, machine_id: Option<Uuid>, action: AuditAction, detail: &str) -> AuditEntry {
    AuditEntry {
        id: Uuid::new_v4(),
        ts,
        actor,
        target: AuditTarget { machine_id, ..AuditTarget::default() },
        action,
        detail: detail.into(),
    }
}

fn decision(role: ReviewerRole) -> AuditAction {
    AuditAction::Decision { role, from: ApprovalStatus::Pending, to: ApprovalStatus::Approved, removed_comments: 0 }
}

fn sample_trail() -> (AuditTrail, Uuid) {
    let press = Uuid::new_v4();
    let mut trail = AuditTrail::new();
    trail.record(entry(
        100,
        Actor::reviewer(ReviewerRole::Leader),
        Some(press),
        AuditAction::ChecklistSaved { submissions: 1, edited_roles: Vec::new() },
        "Hydraulic Press checklist saved",
    ));
    trail.record(entry(300, Actor::reviewer(ReviewerRole::Leader), Some(press), decision(ReviewerRole::Leader), "leader approved Hydraulic Press"));
    trail.record(entry(
        200,
        Actor::reviewer(ReviewerRole::Supervisor),
        Some(Uuid::new_v4()),
        decision(ReviewerRole::Supervisor),
        "supervisor approved Conveyor",
    ));
    trail.record(entry(
        400,
        Actor::admin(),
        None,
        AuditAction::FlowUpdated { order: ReviewerRole::ALL.to_vec() },
        "approval flow updated",
    ));
    (trail, press)
}

#[test]
fn default_query_is_newest_first() {
    let (trail, _) = sample_trail();
    let page = trail.query(&AuditQuery::default(), 20, 100);
    let ts: Vec<_> = page.items.iter().map(|e| e.ts).collect();
    assert_eq!(ts, vec![400, 300, 200, 100]);
    assert_eq!(page.total, 4);
}

#[test]
fn ascending_sort() {
    let (trail, _) = sample_trail();
    let query = AuditQuery { sort: SortDir::Asc, ..AuditQuery::default() };
    let page = trail.query(&query, 20, 100);
    assert_eq!(page.items[0].ts, 100);
}

#[test]
fn filters_combine() {
    let (trail, press) = sample_trail();
    let query = AuditQuery {
        kind: Some("decision".into()),
        role: Some(ReviewerRole::Leader),
        machine_id: Some(press),
        ..AuditQuery::default()
    };
    let page = trail.query(&query, 20, 100);
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].ts, 300);
}

#[test]
fn text_search_matches_detail_case_insensitively() {
    let (trail, _) = sample_trail();
    let query = AuditQuery { q: Some("CONVEYOR".into()), ..AuditQuery::default() };
    let page = trail.query(&query, 20, 100);
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].actor.role, Some(ReviewerRole::Supervisor));
}

#[test]
fn pagination_caps_page_size() {
    let (trail, _) = sample_trail();
    let query = AuditQuery { per_page: Some(50), page: Some(2), ..AuditQuery::default() };
    let page = trail.query(&query, 20, 3);
    assert_eq!(page.per_page, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
}

#[test]
fn action_serializes_with_kind_tag() {
    let json = serde_json::to_value(decision(ReviewerRole::Manager)).unwrap();
    assert_eq!(json["kind"], "decision");
    assert_eq!(json["role"], "manager");
    assert_eq!(json["to"], "approved");
}
