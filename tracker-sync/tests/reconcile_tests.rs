mod support;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use support::ScriptedGateway;
use tracker_cloud::{CloudError, RemoteRow};
use tracker_model::{EntryKind, Milestone};
use tracker_sync::reconcile::{load_remote, normalize_milestones, normalize_remote_entry};

fn row(milestones: Value) -> RemoteRow {
    serde_json::from_value(json!({
        "id": "ff7",
        "type": "game",
        "title": "Final Fantasy VII",
        "cover_url": "https://img/ff7.png",
        "theme": "#0A4",
        "milestones": milestones
    }))
    .unwrap()
}

// --- Milestone coercion ---

#[test]
fn array_milestones_are_used_directly() {
    let entry = normalize_remote_entry(row(json!([
        {"id": "m1", "label": "Midgar", "done": true},
        {"id": "m2", "label": "Kalm", "done": false}
    ])));
    assert_eq!(
        entry.milestones,
        vec![Milestone::new("m1", "Midgar").done(), Milestone::new("m2", "Kalm")]
    );
    assert_eq!(entry.progress, 0.5);
}

#[test]
fn encoded_string_milestones_are_parsed() {
    let entry = normalize_remote_entry(row(json!(
        "[{\"id\":\"m1\",\"label\":\"x\",\"done\":true}]"
    )));
    assert_eq!(entry.milestones, vec![Milestone::new("m1", "x").done()]);
    assert_eq!(entry.progress, 1.0);
}

#[test]
fn null_milestones_become_empty_with_zero_progress() {
    let entry = normalize_remote_entry(row(Value::Null));
    assert!(entry.milestones.is_empty());
    assert_eq!(entry.progress, 0.0);
}

#[test]
fn unparsable_string_becomes_empty() {
    let entry = normalize_remote_entry(row(json!("[{broken")));
    assert!(entry.milestones.is_empty());
    assert_eq!(entry.progress, 0.0);
}

#[test]
fn encoded_non_array_becomes_empty() {
    assert!(normalize_milestones(json!("{\"id\":\"m1\"}")).is_empty());
    assert!(normalize_milestones(json!(42)).is_empty());
    assert!(normalize_milestones(json!({"id": "m1"})).is_empty());
}

#[test]
fn missing_label_becomes_empty_string() {
    let milestones = normalize_milestones(json!([{"id": "m1", "done": true}]));
    assert_eq!(milestones, vec![Milestone::new("m1", "").done()]);
}

#[test]
fn done_is_truthiness_tested() {
    let milestones = normalize_milestones(json!([
        {"id": "a", "done": 1},
        {"id": "b", "done": 0},
        {"id": "c", "done": "yes"},
        {"id": "d", "done": ""},
        {"id": "e", "done": null},
        {"id": "f"}
    ]));
    let done: Vec<bool> = milestones.iter().map(|m| m.done).collect();
    assert_eq!(done, vec![true, false, true, false, false, false]);
}

#[test]
fn missing_ids_get_positional_ids() {
    let milestones = normalize_milestones(json!([
        {"label": "first"},
        {"id": 7, "label": "numeric"},
        {"id": "", "label": "blank"}
    ]));
    let ids: Vec<&str> = milestones.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m0", "7", "m2"]);
}

#[test]
fn non_object_elements_are_dropped() {
    let milestones = normalize_milestones(json!([
        "stray",
        {"id": "m1", "label": "kept", "done": true},
        null,
        3
    ]));
    assert_eq!(milestones, vec![Milestone::new("m1", "kept").done()]);
}

#[test]
fn image_urls_survive() {
    let milestones = normalize_milestones(json!([
        {"id": "m1", "label": "Cover", "imageUrl": "https://img/m1.png"}
    ]));
    assert_eq!(milestones[0].image_url.as_deref(), Some("https://img/m1.png"));
}

#[test]
fn scalar_fields_are_carried_over() {
    let entry = normalize_remote_entry(row(json!([])));
    assert_eq!(entry.id, "ff7");
    assert_eq!(entry.kind, EntryKind::Game);
    assert_eq!(entry.cover_url, "https://img/ff7.png");
    assert_eq!(entry.theme, "#0A4");
    assert_eq!(entry.progress, 0.0);
}

// --- load_remote ---

#[tokio::test]
async fn load_remote_normalizes_every_row_and_drops_blank_ids() {
    let gateway = ScriptedGateway::with_rows(vec![
        json!({"id": "a", "type": "show", "title": "A", "milestones": "[{\"id\":\"m1\",\"done\":true}]"}),
        json!({"id": "", "type": "game", "title": "ghost"}),
        json!({"type": "game", "title": "no id"}),
        json!({"id": "b", "title": "B", "coverUrl": "https://img/b.png"}),
    ]);

    let entries = load_remote(&gateway).await.unwrap();

    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(entries[0].kind, EntryKind::Show);
    assert_eq!(entries[0].progress, 1.0);
    assert_eq!(entries[1].kind, EntryKind::Game);
    assert_eq!(entries[1].cover_url, "https://img/b.png");
}

#[tokio::test]
async fn load_remote_propagates_transport_failure() {
    let gateway = ScriptedGateway::unreachable();
    let result = load_remote(&gateway).await;
    assert!(matches!(result, Err(CloudError::Api(_))));
}
