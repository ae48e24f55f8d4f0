use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use sitac_app::common::{replay, AggregateRoot, DomainError, DomainEvent, Envelope};
use sitac_app::domains::density::{bin, BinCandidate, IntervalTable, PolarGrid};
use sitac_app::domains::mobile::*;

fn envelope(value: Value) -> Envelope {
    serde_json::from_value(value).unwrap()
}

fn config_json(mobiles: u64) -> Value {
    json!({
        "centerX": 0.0, "centerY": 0.0, "maxMobileDistanceFromCenterM": 10000.0,
        "isSimulationRunning": true, "updatePeriodMs": 1000, "mobiles": mobiles
    })
}

fn loaded_store() -> MobileStore {
    let mut store = MobileStore::new();
    store
        .apply_envelope(&envelope(json!({
            "eventType": "INITIAL_LOAD",
            "timestampMs": 1_700_000_000_000i64,
            "config": config_json(3),
            "mobiles": {
                "1": { "id": 1, "shape": "CIRCLE", "color": "BLUE", "environment": "SURFACE",
                       "kinematics": { "xM": 1000.0, "yM": 0.0, "headingRad": 0.3 } },
                "2": { "id": 2, "shape": "TRIANGLE", "color": "GREEN",
                       "kinematics": { "xM": -200.0, "yM": 4500.0 },
                       "extraMobileData1": { "data1": 1.5, "data3": "alpha" } },
                "3": { "id": 3, "shape": "DIAMOND", "color": "RED",
                       "kinematics": { "xM": 0.0, "yM": -9000.0 } }
            }
        })))
        .unwrap();
    store
}

#[test]
fn test_initial_load_replaces_population_and_config() {
    let mut store = loaded_store();
    assert_eq!(store.len(), 3);
    assert_eq!(store.config().unwrap().mobiles, 3);

    let notifications = store
        .apply_envelope(&envelope(json!({
            "eventType": "INITIAL_LOAD",
            "config": config_json(1),
            "mobiles": {
                "7": { "id": 7, "kinematics": { "xM": 1.0, "yM": 1.0 } }
            }
        })))
        .unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.contains(7));
    assert!(!store.contains(1));
    assert_eq!(notifications[0], StoreNotification::Mobiles(EventType::InitialLoad));
    assert!(matches!(
        &notifications[1],
        StoreNotification::Config(ConfigNotification::Snapshot(config)) if config.mobiles == 1
    ));
}

#[test]
fn test_initial_load_without_config_is_rejected() {
    let mut store = MobileStore::new();
    let result = store.apply_envelope(&envelope(json!({
        "eventType": "INITIAL_LOAD",
        "mobiles": {}
    })));
    assert!(matches!(result, Err(DomainError::InvalidEnvelope { .. })));
    assert_eq!(store.version(), 0);
}

#[test]
fn test_unknown_event_kind_changes_nothing() {
    let mut store = loaded_store();
    let before = store.mobiles().to_vec();

    let result = store.apply_envelope(&envelope(json!({
        "eventType": "MOBILES_TELEPORTED",
        "mobiles": { "1": { "kinematics": { "xM": 0.0 } } }
    })));

    match result {
        Err(DomainError::InvalidEventKind { kind }) => assert_eq!(kind, "MOBILES_TELEPORTED"),
        other => panic!("Expected InvalidEventKind, got {:?}", other),
    }
    assert_eq!(store.mobiles(), before.as_slice());
}

#[test]
fn test_update_merges_nested_fields_and_inserts_unknown_ids() {
    let mut store = loaded_store();

    let notifications = store
        .apply_envelope(&envelope(json!({
            "eventType": "MOBILES_UPDATED",
            "mobiles": {
                "2": { "kinematics": { "yM": 4600.0, "speedMS": 12.0 },
                       "extraMobileData1": { "data8": true } },
                "42": { "shape": "SQUARE", "color": "ORANGE",
                        "kinematics": { "xM": 5.0, "yM": 6.0 } }
            }
        })))
        .unwrap();

    assert_eq!(notifications, vec![StoreNotification::Mobiles(EventType::MobilesUpdated)]);
    let updated = store.get(2).unwrap();
    assert_eq!(updated.kinematics.x_m, -200.0);
    assert_eq!(updated.kinematics.y_m, 4600.0);
    assert_eq!(updated.kinematics.speed_m_s, Some(12.0));
    assert_eq!(updated.shape, Some(MobileShape::Triangle));
    let extra = updated.extra_mobile_data1.as_ref().unwrap();
    assert_eq!(extra.data1, Some(1.5));
    assert_eq!(extra.data3.as_deref(), Some("alpha"));
    assert_eq!(extra.data8, Some(true));

    assert_eq!(store.get(42).unwrap().color, Some(MobileColor::Orange));
    assert_eq!(store.len(), 4);
}

#[test]
fn test_create_then_delete_emit_refresh_signals() {
    let mut store = loaded_store();

    let created = store
        .apply_envelope(&envelope(json!({
            "eventType": "MOBILES_CREATED",
            "mobiles": { "9": { "id": 9, "kinematics": { "xM": 10.0, "yM": 10.0 } } }
        })))
        .unwrap();
    assert_eq!(
        created,
        vec![
            StoreNotification::Mobiles(EventType::MobilesCreated),
            StoreNotification::Config(ConfigNotification::Refresh),
        ]
    );

    let deleted = store
        .apply_envelope(&envelope(json!({
            "eventType": "MOBILES_DELETED",
            "mobiles": { "9": { "id": 9 }, "1": { "id": 1 } }
        })))
        .unwrap();
    assert_eq!(
        deleted,
        vec![
            StoreNotification::Mobiles(EventType::MobilesDeleted),
            StoreNotification::Config(ConfigNotification::Refresh),
        ]
    );
    assert!(!store.contains(9));
    assert!(!store.contains(1));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_deleting_absent_id_still_notifies() {
    let mut store = loaded_store();
    let notifications = store
        .apply_envelope(&envelope(json!({
            "eventType": "MOBILES_DELETED",
            "mobiles": { "555": {} }
        })))
        .unwrap();

    assert_eq!(notifications[0], StoreNotification::Mobiles(EventType::MobilesDeleted));
    assert_eq!(store.len(), 3);
}

#[test]
fn test_config_update_keeps_population() {
    let mut store = loaded_store();
    let notifications = store
        .apply_envelope(&Envelope::new("SIMULATION_CONFIG_UPDATED", 5).with_config(config_json(50)))
        .unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.config().unwrap().mobiles, 50);
    assert_eq!(notifications.len(), 1);
}

#[test]
fn test_replay_applies_events_in_order() {
    let mut store = MobileStore::new();
    let events = vec![
        SitacEvent::from_envelope(&envelope(json!({
            "eventType": "INITIAL_LOAD",
            "config": config_json(1),
            "mobiles": { "1": { "id": 1, "kinematics": { "xM": 0.0, "yM": 0.0 } } }
        })))
        .unwrap(),
        SitacEvent::from_envelope(&envelope(json!({
            "eventType": "MOBILES_UPDATED",
            "mobiles": { "1": { "kinematics": { "xM": 3.0 } } }
        })))
        .unwrap(),
    ];

    let notifications = replay(&mut store, events).unwrap();

    assert_eq!(notifications.len(), 3);
    assert_eq!(store.version(), 2);
    assert_eq!(store.get(1).unwrap().kinematics.x_m, 3.0);
}

#[test]
fn test_event_metadata_comes_from_envelope() {
    let event = SitacEvent::from_envelope(&Envelope::new("MOBILES_UPDATED", 1_000)).unwrap();
    assert_eq!(event.event_type(), "MOBILES_UPDATED");
    assert_eq!(event.occurred_at().timestamp_millis(), 1_000);
    assert_eq!(event.kind(), EventType::MobilesUpdated);
}

#[test]
fn test_mobile_east_of_center_lands_in_innermost_band() {
    let grid = PolarGrid::new(10_000.0, 7, 12);
    let frame = bin(
        &grid,
        &IntervalTable::default(),
        vec![BinCandidate::new(1, 1000.0, 0.0)],
        Some(1),
    );

    assert_eq!(frame.cell(6, 2).unwrap().count, 1);
    assert_eq!(frame.highlighted_cell, Some((6, 2)));
    assert_eq!(frame.total_count(), 1);
}

#[test]
fn test_due_north_lands_in_last_wedge() {
    let grid = PolarGrid::new(10_000.0, 7, 12);
    assert_eq!(grid.locate(0.0, 5_000.0), Some((3, 11)));
}

#[test]
fn test_four_mobiles_in_a_cell_use_third_color() {
    let grid = PolarGrid::new(10_000.0, 7, 12);
    let candidates = (0..4)
        .map(|id| BinCandidate::new(id, 9_500.0, 100.0 + id as f64))
        .collect();
    let frame = bin(&grid, &IntervalTable::default(), candidates, None);

    let cell = frame.cell(0, 2).unwrap();
    assert_eq!(cell.count, 4);
    assert_eq!(cell.color, "rgb(1, 160, 210)");
    assert_eq!(frame.cell(0, 3).unwrap().color, "rgb(245, 245, 245)");
}

#[test]
fn test_random_population_is_counted_exactly_once() {
    let mut rng = StdRng::seed_from_u64(7);
    let grid = PolarGrid::new(10_000.0, 7, 12).with_zoom_ratio(0.8);
    let zoomed_radius = 10_000.0 * 0.8;

    let candidates: Vec<BinCandidate> = (0..2_000)
        .map(|id| {
            BinCandidate::new(
                id,
                rng.gen_range(-10_000.0..10_000.0),
                rng.gen_range(-10_000.0..10_000.0),
            )
        })
        .collect();
    let in_range = candidates
        .iter()
        .filter(|candidate| candidate.distance <= zoomed_radius)
        .count();

    let frame = bin(&grid, &IntervalTable::default(), candidates, None);

    assert_eq!(frame.total_count(), in_range);
    assert_eq!(frame.assignments.len(), in_range);
    assert_eq!(frame.unassigned.len(), 2_000 - in_range);
}
