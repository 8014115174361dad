//! End-to-end catalog behaviour against the in-memory store.

use std::collections::HashMap;

use chrono::{Datelike, TimeZone, Utc};
use shipyard_core::{
    InMemoryShipStore, ShipDraft, ShipPatch, ShipService, ShipType, ShipyardError, rating,
};

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn draft(index: i32) -> ShipDraft {
    let ship_type = match index % 3 {
        0 => ShipType::Transport,
        1 => ShipType::Military,
        _ => ShipType::Merchant,
    };
    ShipDraft {
        name: Some(format!("Ship {index}")),
        planet: Some(if index % 2 == 0 { "Earth" } else { "Mars" }.to_string()),
        ship_type: Some(ship_type),
        prod_date: Some(Utc.with_ymd_and_hms(2900 + index, 5, 1, 0, 0, 0).unwrap()),
        is_used: Some(index % 2 == 1),
        speed: Some(0.1 * f64::from(index % 9 + 1)),
        crew_size: Some(10 * (index + 1)),
    }
}

fn seeded(count: i32) -> ShipService<InMemoryShipStore> {
    let service = ShipService::new(InMemoryShipStore::new());
    for index in 0..count {
        service.create(draft(index)).expect("create");
    }
    service
}

#[test]
fn created_rating_matches_formula() {
    let service = seeded(0);
    for index in 0..6 {
        let ship = service.create(draft(index)).expect("create");
        let expected = rating(ship.speed, ship.is_used, ship.prod_date.year());
        assert_eq!(ship.rating, expected);
    }
}

#[test]
fn client_rating_is_overwritten() {
    let service = seeded(0);
    let candidate: ShipDraft = serde_json::from_str(
        r#"{"name":"Hawk","planet":"Earth","shipType":"MILITARY",
            "prodDate":29000000000000,"speed":0.5,"crewSize":100,"rating":999}"#,
    )
    .expect("candidate");

    let ship = service.create(candidate).expect("create");

    assert_ne!(ship.rating, 999.0);
    assert!(!ship.is_used);
}

#[test]
fn second_page_of_three_starts_at_offset_three() {
    let service = seeded(10);

    let ids: Vec<i64> = service
        .list(&params(&[("pageNumber", "1"), ("pageSize", "3")]))
        .expect("list")
        .into_iter()
        .map(|ship| ship.id)
        .collect();

    assert_eq!(ids, vec![4, 5, 6]);
}

#[test]
fn default_listing_is_first_three_by_id() {
    let service = seeded(10);

    let ids: Vec<i64> = service
        .list(&HashMap::new())
        .expect("list")
        .into_iter()
        .map(|ship| ship.id)
        .collect();

    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn count_matches_unbounded_listing() {
    let service = seeded(20);
    let filters: Vec<Vec<(&str, &str)>> = vec![
        vec![],
        vec![("planet", "Ear")],
        vec![("shipType", "MERCHANT"), ("isUsed", "false")],
        vec![("minSpeed", "0.3"), ("maxSpeed", "0.7")],
        vec![("minCrewSize", "50"), ("maxCrewSize", "150"), ("name", "1")],
        vec![("after", "29000000000000"), ("before", "29500000000000")],
        vec![("minRating", "0.3"), ("maxRating", "2")],
        vec![("name", "nothing matches this")],
    ];

    for filter in filters {
        let count = service.count(&params(&filter)).expect("count");
        let mut unbounded = filter.clone();
        unbounded.push(("pageSize", "4294967295"));
        unbounded.push(("order", "SPEED"));
        let listed = service.list(&params(&unbounded)).expect("list");
        assert_eq!(count, listed.len() as i64, "filter {filter:?}");
    }
}

#[test]
fn get_by_id_distinguishes_invalid_and_missing() {
    let service = seeded(2);

    assert!(matches!(service.get(0), Err(ShipyardError::InvalidArgument(_))));
    assert!(matches!(service.get(-5), Err(ShipyardError::InvalidArgument(_))));
    assert!(matches!(service.get(77), Err(ShipyardError::NotFound(_))));
    assert_eq!(service.get(2).expect("get").name, "Ship 1");
}

#[test]
fn speed_only_patch_changes_speed_and_rating() {
    let service = seeded(3);
    let before = service.get(2).expect("get");

    let after = service
        .update(
            2,
            ShipPatch {
                speed: Some(0.95),
                ..ShipPatch::default()
            },
        )
        .expect("update");

    assert_eq!(after.speed, 0.95);
    assert_ne!(after.rating, before.rating);
    assert_eq!(after.name, before.name);
    assert_eq!(after.planet, before.planet);
    assert_eq!(after.ship_type, before.ship_type);
    assert_eq!(after.prod_date, before.prod_date);
    assert_eq!(after.crew_size, before.crew_size);
    assert_eq!(after.is_used, before.is_used);
    assert_eq!(service.get(2).expect("get"), after);
}

#[test]
fn rejected_update_leaves_ship_unchanged() {
    let service = seeded(1);
    let before = service.get(1).expect("get");

    let result = service.update(
        1,
        ShipPatch {
            name: Some("renamed".to_string()),
            crew_size: Some(10000),
            ..ShipPatch::default()
        },
    );

    assert!(matches!(result, Err(ShipyardError::InvalidArgument(_))));
    assert_eq!(service.get(1).expect("get"), before);
}

#[test]
fn deleted_ship_is_not_found() {
    let service = seeded(2);

    service.delete(1).expect("delete");

    assert!(matches!(service.get(1), Err(ShipyardError::NotFound(_))));
    assert!(matches!(service.delete(1), Err(ShipyardError::NotFound(_))));
    assert_eq!(service.count(&HashMap::new()).expect("count"), 1);
}
