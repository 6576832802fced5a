use super::*;

#[test]
fn bounds_are_inclusive() {
    assert_eq!(compute_status("20", Some(20.0), Some(40.0)), ItemStatus::Ms);
    assert_eq!(compute_status("40", Some(20.0), Some(40.0)), ItemStatus::Ms);
    assert_eq!(compute_status("19", Some(20.0), Some(40.0)), ItemStatus::Tms);
    assert_eq!(compute_status("41", Some(20.0), Some(40.0)), ItemStatus::Tms);
}

#[test]
fn just_above_max_is_tms() {
    assert_eq!(compute_status("40.01", Some(20.0), Some(40.0)), ItemStatus::Tms);
}

#[test]
fn empty_or_whitespace_result_is_pending() {
    assert_eq!(compute_status("", Some(20.0), Some(40.0)), ItemStatus::Pending);
    assert_eq!(compute_status("   ", None, None), ItemStatus::Pending);
}

#[test]
fn missing_bound_is_not_applicable() {
    assert_eq!(compute_status("OK", None, None), ItemStatus::NotApplicable);
    assert_eq!(compute_status("30", Some(20.0), None), ItemStatus::NotApplicable);
}

#[test]
fn non_numeric_result_with_bounds_is_tms() {
    assert_eq!(compute_status("abc", Some(20.0), Some(40.0)), ItemStatus::Tms);
    assert_eq!(compute_status("NaN", Some(20.0), Some(40.0)), ItemStatus::Tms);
}

#[test]
fn record_trims_and_recomputes() {
    let mut item = ChecklistItem::new("Oil temperature", Some("°C"), Some(20.0), Some(40.0));
    item.record(" 35 ", " normal ");
    assert_eq!(item.result, "35");
    assert_eq!(item.remark, "normal");
    assert_eq!(item.status, ItemStatus::Ms);

    item.record("45", "");
    assert_eq!(item.status, ItemStatus::Tms);
}

#[test]
fn save_blocked_lists_missing_item_names() {
    let mut filled = ChecklistItem::new("Pressure", Some("bar"), Some(2.0), Some(6.0));
    filled.record("4", "");
    let empty = ChecklistItem::new("Oil temperature", Some("°C"), Some(20.0), Some(40.0));

    let err = validate_for_save(&[filled, empty]).unwrap_err();
    assert_eq!(err, ChecklistError::MissingResults(vec!["Oil temperature".into()]));
    assert_eq!(err.to_string(), "fill all required fields: Oil temperature");
}

#[test]
fn save_allowed_when_all_filled() {
    let mut a = ChecklistItem::new("Belt tension", None, None, None);
    a.record("OK", "");
    let mut b = ChecklistItem::new("Pressure", Some("bar"), Some(2.0), Some(6.0));
    b.record("7", "leaking seal");
    assert!(validate_for_save(&[a, b]).is_ok());
}

#[test]
fn status_serializes_with_short_tags() {
    assert_eq!(serde_json::to_string(&ItemStatus::NotApplicable).unwrap(), "\"n_a\"");
    assert_eq!(serde_json::to_string(&ItemStatus::Tms).unwrap(), "\"tms\"");
}
