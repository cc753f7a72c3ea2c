//! Object Registration Tests
//!
//! ## Scenarios Covered
//!
//! 1. Scalars register as `.0`, tables get seed rows with a reported status
//! 2. A missing definition skips only that object
//! 3. A definition of the wrong shape is reported as a value-model problem
//! 4. An unavailable index column skips the whole table and leaves no
//!    instances behind
//! 5. Registration emits lifecycle events

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{demo, demo_space, demo_with, descr, oid, spin, status, ENTRY, NAME, UPTIME};
use mibtc_core::logging_facility::test_capture::init_test_capture;
use mibtc_core::{RowState, Value};
use mibtc_core_types::schema::{EVENT_END, EVENT_START};
use mibtc_engine::{
    InMemoryEngine, Registrar, RegistrationFailure, RepresentationKind, SymbolKind, WriteOptions,
};

#[test]
fn test_demo_registers_everything() {
    // GIVEN an engine with every demo definition loaded
    // WHEN the demo object space is registered
    let demo = demo(WriteOptions::default());

    // THEN nothing is skipped
    assert!(demo.report.skipped.is_empty(), "{:?}", demo.report.skipped);

    // AND scalars live at .0, the seed row at index 1
    assert!(demo.report.is_registered(&oid(NAME)));
    assert!(demo.report.is_registered(&oid(UPTIME)));
    assert_eq!(
        demo.engine.value(&oid(NAME)),
        Some(Value::OctetString(b"agent".to_vec()))
    );
    assert_eq!(
        demo.engine.value(&oid(ENTRY).join(&[1, 1])),
        Some(Value::Integer(1))
    );
    assert_eq!(demo.engine.value(&spin(1)), Some(Value::Integer(0)));

    // AND the seed row is active
    assert_eq!(demo.writer.row_state("demoTable", &[1]), RowState::Active);
    assert_eq!(demo.engine.value(&status(1)), Some(Value::Integer(1)));
    assert_eq!(demo.engine.instance_count(), 6);
}

#[test]
fn test_seed_rows() {
    // GIVEN a registrar asked for three rows per table
    let space = demo_space();
    let engine = InMemoryEngine::from_object_space(&space);

    // WHEN it registers the demo space
    let (report, store) = Registrar::new(&engine)
        .with_seed_rows(3)
        .register_object_space(&space);

    // THEN rows 1..=3 exist
    assert!(report.skipped.is_empty());
    let table = space.table("demoTable").unwrap();
    let rows: Vec<Vec<u32>> = store
        .rows_of(&table.entry_path)
        .map(|(key, _)| key.index.clone())
        .collect();
    assert_eq!(rows, vec![vec![1], vec![2], vec![3]]);
    assert_eq!(engine.value(&descr(3)), Some(Value::OctetString(vec![])));
}

#[test]
fn test_missing_symbol_leaves_siblings_registered() {
    // GIVEN an engine that never loaded the demoSpin column
    let demo = demo_with(WriteOptions::default(), |engine| {
        engine.forget(&oid("1.3.6.1.4.1.9999.3.1.3"));
    });

    // THEN demoSpin is skipped as a missing symbol
    let failure = demo.report.skipped_object("demoSpin").unwrap();
    assert!(
        matches!(failure, RegistrationFailure::MissingSymbol { path, .. } if *path == spin(1)),
        "{:?}",
        failure
    );

    // AND its siblings in the same row still registered
    assert!(demo.report.is_registered(&descr(1)));
    assert!(demo.report.is_registered(&status(1)));
    assert_eq!(demo.engine.value(&spin(1)), None);

    // AND the row is active, since demoSpin is optional
    assert_eq!(demo.writer.row_state("demoTable", &[1]), RowState::Active);
}

#[test]
fn test_wrong_shape_is_value_model_incompatible() {
    // GIVEN an engine that believes demoDescr is a scalar
    let demo = demo_with(WriteOptions::default(), |engine| {
        engine.define(
            oid("1.3.6.1.4.1.9999.3.1.2"),
            SymbolKind::Scalar,
            RepresentationKind::OctetString,
        );
    });

    // THEN demoDescr is reported with the representation it needed
    let failure = demo.report.skipped_object("demoDescr").unwrap();
    assert!(matches!(
        failure,
        RegistrationFailure::ValueModelIncompatible {
            representation: RepresentationKind::OctetString,
            ..
        }
    ));

    // AND the row is notReady because a mandatory column is missing
    assert_eq!(demo.writer.row_state("demoTable", &[1]), RowState::NotReady);
    assert_eq!(demo.engine.value(&status(1)), Some(Value::Integer(3)));
}

#[test]
fn test_unavailable_index_skips_table() {
    // GIVEN an engine without the index column definition
    let demo = demo_with(WriteOptions::default(), |engine| {
        engine.forget(&oid("1.3.6.1.4.1.9999.3.1.1"));
    });

    // THEN the table is skipped as a whole
    let failure = demo.report.skipped_object("demoTable").unwrap();
    assert!(matches!(
        failure,
        RegistrationFailure::TableIndexUnavailable { table, .. } if table == "demoTable"
    ));
    assert!(demo.report.skipped_object("demoDescr").is_none());

    // AND no table instance exists, while scalars are unaffected
    let table = oid(ENTRY);
    assert!(demo
        .engine
        .instance_paths()
        .iter()
        .all(|p| !table.is_prefix_of(p)));
    assert!(demo.report.is_registered(&oid(NAME)));
    assert_eq!(demo.writer.row_state("demoTable", &[1]), RowState::NonExistent);
}

#[test]
fn test_index_failure_removes_earlier_rows() {
    // GIVEN three seed rows and an engine that already holds index row 3
    let space = demo_space();
    let engine = InMemoryEngine::from_object_space(&space);
    let index_path = oid(ENTRY).join(&[1, 3]);
    mibtc_engine::ProtocolEngine::instantiate(
        &engine,
        &index_path,
        RepresentationKind::Integer,
        &Value::Integer(3),
    )
    .unwrap();

    // WHEN the demo space is registered
    let (report, _) = Registrar::new(&engine)
        .with_seed_rows(3)
        .register_object_space(&space);

    // THEN the table is skipped and rows 1 and 2 were dropped again
    assert!(report.skipped_object("demoTable").is_some());
    assert_eq!(engine.value(&oid(ENTRY).join(&[1, 1])), None);
    assert_eq!(engine.value(&oid(ENTRY).join(&[1, 2])), None);
    assert_eq!(engine.value(&index_path), Some(Value::Integer(3)));
}

#[test]
fn test_registration_lifecycle_events() {
    let capture = init_test_capture();

    let demo = demo(WriteOptions::default());
    let registered = demo.report.registered.len().to_string();

    capture.assert_event_exists("register_object_space", EVENT_START);
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("register_object_space")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("registered") == Some(registered.as_str())
    });
    assert!(ends >= 1);
}
