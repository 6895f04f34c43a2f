//! Contract Test: Nested Objects & Collections
//!
//! Constraints verified:
//! - Nested mappings construct nested instances through their own tables
//! - Sequences of nested mappings preserve source order
//! - Mismatch paths name the failing nested field
//! - Null clears an optional nested field
//!
//! If this test fails, recursive mapping is broken.

mod common;

use common::*;
use csmap_core::{Error, Mappable, Mapper, ValueKind};
use serde_json::json;

#[test]
fn nested_object_round_trip() {
    let person = Person::from_payload(&payload(json!({"addr": {"city": "X"}})))
        .expect("construct succeeds");

    let address = person.address.expect("address is constructed");
    assert_eq!(address.city_name, "X");
    assert_eq!(address.zip_code, None);
}

#[test]
fn collection_preserves_source_order() {
    let person = Person::from_payload(&payload(json!({
        "items": [{"n": 1}, {"n": 2}, {"n": 3, "label": "third"}]
    })))
    .expect("construct succeeds");

    let nums: Vec<i64> = person.items.iter().map(|item| item.num).collect();
    assert_eq!(nums, vec![1, 2, 3]);
    assert_eq!(person.items[2].label, "third");
}

#[test]
fn empty_collection_replaces_previous_items() {
    let mut person = Person {
        items: vec![LineItem::default()],
        ..Person::default()
    };

    person
        .map_attributes(&payload(json!({"items": []})))
        .expect("populate succeeds");

    assert!(person.items.is_empty());
}

#[test]
fn nested_mismatch_reports_full_path() {
    let err = Person::from_payload(&payload(json!({
        "items": [{"n": 1}, {"n": "two"}]
    })))
    .expect_err("second item is malformed");

    assert_eq!(
        err,
        Error::TypeMismatch {
            path: "items[1].num".to_string(),
            expected: "i64",
            found: ValueKind::String,
        }
    );
}

#[test]
fn nested_field_mismatch_path() {
    let err = Person::from_payload(&payload(json!({"addr": {"city": ["a"]}})))
        .expect_err("city must be text");

    match err {
        Error::TypeMismatch { path, .. } => assert_eq!(path, "address.cityName"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn scalar_where_nested_object_expected() {
    let err = Person::from_payload(&payload(json!({"addr": "Main Street"})))
        .expect_err("address must be an object");

    assert_eq!(
        err,
        Error::TypeMismatch {
            path: "address".to_string(),
            expected: "object",
            found: ValueKind::String,
        }
    );
}

#[test]
fn object_where_sequence_expected() {
    let err = Person::from_payload(&payload(json!({"items": {"n": 1}})))
        .expect_err("items must be a sequence");

    assert!(err.is_type_mismatch());
}

#[test]
fn null_clears_optional_nested_field() {
    let mut person = Person {
        address: Some(Address {
            city_name: "Old".to_string(),
            zip_code: None,
        }),
        ..Person::default()
    };

    Mapper::default()
        .populate(&mut person, &payload(json!({"addr": null})))
        .expect("populate succeeds");

    assert_eq!(person.address, None);
}

#[test]
fn payload_is_not_mutated() {
    let data = payload(json!({"addr": {"city": "Y"}, "items": [{"n": 5}]}));
    let snapshot = data.clone();

    let _person: Person = Mapper::default().construct(&data).expect("construct succeeds");

    assert_eq!(data, snapshot);
}
