//! Unit tests for the CompareManager: capacity, toggling, metric rows and winners.

use coursefinder::managers::compare_manager::*;
use coursefinder::types::compare::{MetricKind, MetricValue};
use coursefinder::types::programme::ProgrammeRecord;
use rstest::rstest;
use serde_json::json;

fn programme(id: &str, rating: f64, employment: f64) -> ProgrammeRecord {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Programme {}", id),
        "institution": "Harbour College",
        "category": "Degree",
        "level": "Level 6",
        "studyMode": "Full-time",
        "locations": ["Leeds", "York"],
        "rating": rating,
        "employmentRate": employment,
        "duration": "3 years",
        "tuitionFees": "£9,250",
    }))
    .unwrap()
}

#[test]
fn test_capacity_is_three_by_default() {
    let mut mgr = CompareManager::new();
    assert_eq!(mgr.max_items(), MAX_COMPARE_ITEMS);

    for id in ["a", "b", "c"] {
        assert!(mgr.add_to_compare(&programme(id, 4.0, 80.0)));
    }
    assert!(mgr.is_full());

    let before: Vec<String> = mgr.items().iter().map(|p| p.id.clone()).collect();
    assert!(!mgr.add_to_compare(&programme("d", 5.0, 99.0)));
    let after: Vec<String> = mgr.items().iter().map(|p| p.id.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_duplicates_are_rejected() {
    let mut mgr = CompareManager::new();
    assert!(mgr.add_to_compare(&programme("a", 4.0, 80.0)));
    assert!(!mgr.add_to_compare(&programme("a", 4.0, 80.0)));
    assert_eq!(mgr.len(), 1);
}

#[test]
fn test_toggle_adds_then_removes() {
    let mut mgr = CompareManager::new();
    let p = programme("a", 4.0, 80.0);
    assert!(mgr.toggle_compare(&p));
    assert!(mgr.is_in_compare("a"));
    assert!(!mgr.toggle_compare(&p));
    assert!(mgr.is_empty());
}

#[test]
fn test_toggle_on_full_list_reports_false() {
    let mut mgr = CompareManager::with_capacity(2);
    mgr.add_to_compare(&programme("a", 4.0, 80.0));
    mgr.add_to_compare(&programme("b", 4.0, 80.0));
    assert!(!mgr.toggle_compare(&programme("c", 4.0, 80.0)));
    assert!(!mgr.is_in_compare("c"));
}

#[test]
fn test_remove_and_clear() {
    let mut mgr = CompareManager::new();
    mgr.add_to_compare(&programme("a", 4.0, 80.0));
    mgr.add_to_compare(&programme("b", 4.0, 80.0));
    mgr.remove_from_compare("missing");
    assert_eq!(mgr.len(), 2);
    mgr.remove_from_compare("a");
    assert_eq!(mgr.items()[0].id, "b");
    mgr.clear_compare();
    assert!(mgr.is_empty());
}

#[test]
fn test_metric_rows() {
    let mut mgr = CompareManager::new();
    mgr.add_to_compare(&programme("a", 4.1, 70.0));
    mgr.add_to_compare(&programme("b", 3.9, 85.5));

    let metrics = mgr.comparison_metrics();
    assert_eq!(metrics.len(), 7);
    assert_eq!(metrics[0].kind, MetricKind::Progress { max: 5.0 });
    assert_eq!(metrics[1].kind, MetricKind::Progress { max: 100.0 });
    assert_eq!(metrics[1].values, vec![MetricValue::Number(70.0), MetricValue::Number(85.5)]);
    assert!(metrics[2..].iter().all(|m| m.kind == MetricKind::Text));

    let location = metrics.iter().find(|m| m.label == METRIC_LOCATION).unwrap();
    assert_eq!(location.values[0].to_string(), "Leeds, York");
}

#[test]
fn test_metrics_serialize_with_type_tag() {
    let mut mgr = CompareManager::new();
    mgr.add_to_compare(&programme("a", 4.0, 80.0));
    mgr.add_to_compare(&programme("b", 3.0, 60.0));

    let value = serde_json::to_value(mgr.comparison_metrics()).unwrap();
    assert_eq!(value[0]["kind"], json!({"type": "progress", "max": 5.0}));
    assert_eq!(value[0]["values"], json!([4.0, 3.0]));
    assert_eq!(value[3]["kind"], json!({"type": "text"}));
    assert_eq!(value[3]["values"], json!(["£9,250", "£9,250"]));
}

#[test]
fn test_tied_rating_has_no_winner() {
    let mut mgr = CompareManager::new();
    mgr.add_to_compare(&programme("a", 4.5, 60.0));
    mgr.add_to_compare(&programme("b", 4.5, 75.0));

    assert_eq!(mgr.get_metric_winner(METRIC_RATING), None);
    assert_eq!(mgr.get_metric_winner(METRIC_EMPLOYMENT_RATE), Some(1));
}

#[rstest]
#[case(vec![4.0, 4.8, 4.8], Some(1))]
#[case(vec![4.9, 4.8, 4.7], Some(0))]
#[case(vec![3.0, 3.0, 3.5], Some(2))]
#[case(vec![2.0, 2.0, 2.0], None)]
fn test_rating_winner(#[case] ratings: Vec<f64>, #[case] expected: Option<usize>) {
    let mut mgr = CompareManager::new();
    for (i, r) in ratings.iter().enumerate() {
        mgr.add_to_compare(&programme(&i.to_string(), *r, 50.0));
    }
    assert_eq!(mgr.get_metric_winner(METRIC_RATING), expected);
}

#[rstest]
#[case(METRIC_DURATION)]
#[case(METRIC_FEES)]
#[case(METRIC_STUDY_MODE)]
#[case(METRIC_LOCATION)]
#[case(METRIC_LEVEL)]
#[case("Nonexistent")]
fn test_text_and_unknown_metrics_have_no_winner(#[case] label: &str) {
    let mut mgr = CompareManager::new();
    mgr.add_to_compare(&programme("a", 1.0, 10.0));
    mgr.add_to_compare(&programme("b", 5.0, 90.0));
    assert_eq!(mgr.get_metric_winner(label), None);
}
