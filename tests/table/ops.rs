//! Row operation contracts through the public facade

use crate::common::page_table;
use slottable::{Row, Value};

#[test]
fn set_then_get_returns_fields_union_key() {
    let table = page_table(10);
    assert!(table
        .set("a", &Row::new().with("name", "x").with("views", 0i64))
        .unwrap());

    let row = table.get("a").unwrap().unwrap();
    assert_eq!(row.get("name"), Some(&Value::Str("x".into())));
    assert_eq!(row.get("views"), Some(&Value::Int(0)));
    assert_eq!(row.key(), Some("a"));
}

#[test]
fn page_view_scenario_end_to_end() {
    let table = page_table(10);

    assert!(table
        .set("a", &Row::new().with("name", "x").with("views", 0i64))
        .unwrap());
    assert_eq!(table.incr("a", "views", 5).unwrap(), Some(Value::Int(5)));

    let row = table.get("a").unwrap().unwrap();
    assert_eq!(row.key(), Some("a"));
    assert_eq!(row.get("name"), Some(&Value::Str("x".into())));
    assert_eq!(row.get("views"), Some(&Value::Int(5)));

    assert!(table.del("a").unwrap());
    assert_eq!(table.get("a").unwrap(), None);
}

#[test]
fn del_clears_exist_and_get() {
    let table = page_table(10);
    table.set("a", &Row::new()).unwrap();

    assert!(table.del("a").unwrap());
    assert!(!table.exist("a").unwrap());
    assert_eq!(table.get("a").unwrap(), None);
    assert_eq!(table.get_field("a", "views").unwrap(), None);
}

#[test]
fn incr_then_decr_restores_original() {
    let table = page_table(10);
    table.set("a", &Row::new().with("views", 100i64)).unwrap();

    assert_eq!(table.incr("a", "views", 42).unwrap(), Some(Value::Int(142)));
    assert_eq!(table.decr("a", "views", 42).unwrap(), Some(Value::Int(100)));
}

#[test]
fn capacity_exhaustion_preserves_existing_rows() {
    let table = page_table(3);
    for i in 0..3i64 {
        assert!(table
            .set(&format!("k{i}"), &Row::new().with("views", i))
            .unwrap());
    }

    // Past capacity, new keys are rejected without corrupting anything
    for i in 3..10i64 {
        assert!(!table.set(&format!("k{i}"), &Row::new()).unwrap());
    }
    assert_eq!(table.count().unwrap(), 3);
    for i in 0..3i64 {
        assert_eq!(
            table.get_field(&format!("k{i}"), "views").unwrap(),
            Some(Value::Int(i))
        );
    }
}

#[test]
fn clear_drives_count_to_zero() {
    let table = page_table(10);
    let keys: Vec<String> = (0..6).map(|i| format!("k{i}")).collect();
    for key in &keys {
        table.set(key, &Row::new()).unwrap();
    }

    table.clear().unwrap();
    assert_eq!(table.count().unwrap(), 0);
    for key in &keys {
        assert!(!table.exist(key).unwrap());
    }

    // The table stays usable after a clear
    assert!(table.set("again", &Row::new()).unwrap());
    assert_eq!(table.count().unwrap(), 1);
}

#[test]
fn for_each_visits_every_row_once() {
    let table = page_table(10);
    for i in 0..5i64 {
        table
            .set(&format!("k{i}"), &Row::new().with("views", i))
            .unwrap();
    }

    let mut seen = Vec::new();
    table
        .for_each(|row| seen.push(row.key().unwrap().to_string()))
        .unwrap();
    seen.sort();
    assert_eq!(seen, ["k0", "k1", "k2", "k3", "k4"]);
}

#[test]
fn string_values_truncate_to_declared_width() {
    let table = page_table(10);
    let long = "n".repeat(200);
    table.set("a", &Row::new().with("name", long.as_str())).unwrap();

    assert_eq!(
        table.get_field("a", "name").unwrap(),
        Some(Value::Str("n".repeat(64)))
    );
}

#[test]
fn int_values_wrap_to_declared_width() {
    let table = page_table(10);
    table
        .set("a", &Row::new().with("views", i32::MAX as i64 + 1))
        .unwrap();

    assert_eq!(
        table.get_field("a", "views").unwrap(),
        Some(Value::Int(i32::MIN as i64))
    );
}
