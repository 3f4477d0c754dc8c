//! Creation state machine and schema immutability

use slottable::{ColumnType, Error, Row, SharedTable};

#[test]
fn row_operations_require_created_state() {
    let table = SharedTable::new("t", 4);

    assert!(matches!(table.set("a", &Row::new()), Err(Error::NotCreated(_))));
    assert!(matches!(table.get("a"), Err(Error::NotCreated(_))));
    assert!(matches!(table.exist("a"), Err(Error::NotCreated(_))));
    assert!(matches!(table.del("a"), Err(Error::NotCreated(_))));
    assert!(matches!(table.incr("a", "f", 1), Err(Error::NotCreated(_))));
    assert!(matches!(table.count(), Err(Error::NotCreated(_))));
    assert!(matches!(table.clear(), Err(Error::NotCreated(_))));
    assert!(matches!(
        table.for_each(|_| {}),
        Err(Error::NotCreated(_))
    ));
}

#[test]
fn create_is_one_shot() {
    let table = SharedTable::new("t", 4);
    table.create().unwrap();
    assert!(matches!(table.create(), Err(Error::AlreadyCreated(_))));

    // The failed second create leaves the table fully usable
    assert!(table.set("a", &Row::new()).unwrap());
}

#[test]
fn add_column_after_create_is_schema_error() {
    let table = SharedTable::new("t", 4);
    table.add_column("a", ColumnType::Int32).unwrap();
    table.create().unwrap();

    assert!(matches!(
        table.add_column("b", ColumnType::Int32),
        Err(Error::Schema(_))
    ));
}

#[test]
fn duplicate_column_is_schema_error() {
    let table = SharedTable::new("t", 4);
    table.add_column("a", ColumnType::Int32).unwrap();
    assert!(matches!(
        table.add_column("a", ColumnType::Int64),
        Err(Error::Schema(_))
    ));
}

#[test]
fn reserved_key_column_cannot_be_declared() {
    let table = SharedTable::new("t", 4);
    assert!(matches!(
        table.add_column(slottable::KEY_FIELD, ColumnType::FixedString(8)),
        Err(Error::Schema(_))
    ));
}

#[test]
fn zero_width_string_column_is_schema_error() {
    let table = SharedTable::new("t", 4);
    assert!(matches!(
        table.add_column("tag", ColumnType::FixedString(0)),
        Err(Error::Schema(_))
    ));
}

#[test]
fn zero_capacity_create_fails_and_state_stays_uncreated() {
    let table = SharedTable::new("t", 0);
    assert!(matches!(table.create(), Err(Error::Schema(_))));
    assert!(!table.is_created());
    assert!(matches!(table.get("a"), Err(Error::NotCreated(_))));
}

#[test]
fn restore_before_create_is_state_error_when_backed() {
    let table = SharedTable::new("t", 4).with_backing_file("/nonexistent/snapshot.json");
    assert!(matches!(table.restore(), Err(Error::NotCreated(_))));
}
