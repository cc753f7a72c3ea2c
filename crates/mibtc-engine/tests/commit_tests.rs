//! Commit, Rollback and Concurrency Tests
//!
//! ## Scenarios Covered
//!
//! 1. An engine rejection undoes the changes already pushed in that commit
//! 2. Rolled-back removals are reinstated and stay writable
//! 3. Concurrent writers to one spinlock are serialized
//! 4. Concurrent row creation in different rows
//! 5. Lock entries are released once their request finishes
//! 6. `write_apply` lifecycle events carry the request id

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{cell, ctx, ctx_with, demo, descr, oid, set, spin, status, text, NAME, UPTIME};
use mibtc_core::logging_facility::test_capture::init_test_capture;
use mibtc_core::{RowState, RowStatus, Value};
use mibtc_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use mibtc_engine::{WriteFailure, WriteOptions};

#[test]
fn test_engine_rejection_rolls_back_earlier_changes() {
    // GIVEN an engine that refuses changes to demoDescr
    let demo = demo(WriteOptions::default());
    demo.engine.freeze(oid("1.3.6.1.4.1.9999.3.1.2"));

    // WHEN a batch changes demoName and then demoDescr
    let batch = [set(oid(NAME), text("renamed")), set(descr(1), text("blocked"))];
    let err = demo.writer.apply(&batch, &ctx()).unwrap_err();

    // THEN the rejection names demoDescr
    assert!(
        matches!(&err, WriteFailure::EngineRejected { path, .. } if *path == descr(1)),
        "{:?}",
        err
    );

    // AND demoName was restored in the engine and never committed
    assert_eq!(demo.engine.value(&oid(NAME)), Some(text("agent")));
    assert_eq!(demo.writer.read(&oid(NAME)), Some(text("agent")));
    assert!(demo.sink.changes().is_empty());
}

#[test]
fn test_rolled_back_removal_is_reinstated() {
    // GIVEN an engine that refuses to drop the status column
    let demo = demo(WriteOptions::default());
    demo.engine.freeze(oid("1.3.6.1.4.1.9999.3.1.4"));

    // WHEN the row is destroyed
    let err = demo
        .writer
        .apply(&[set(status(1), Value::Integer(RowStatus::Destroy.value()))], &ctx())
        .unwrap_err();

    // THEN the destroy fails and the row is intact
    assert!(matches!(err, WriteFailure::EngineRejected { .. }));
    assert_eq!(demo.writer.row_state("demoTable", &[1]), RowState::Active);
    assert_eq!(demo.engine.value(&cell(1, 1)), Some(Value::Integer(1)));
    assert_eq!(demo.engine.value(&descr(1)), Some(Value::OctetString(vec![])));
    assert_eq!(demo.engine.value(&spin(1)), Some(Value::Integer(0)));

    // AND the reinstated instances accept later writes
    demo.writer
        .apply(&[set(descr(1), text("after"))], &ctx())
        .unwrap();
    assert_eq!(demo.engine.value(&descr(1)), Some(text("after")));
}

#[test]
fn test_concurrent_spinlock_writers_are_serialized() {
    // GIVEN four writers racing on the row 1 spinlock
    let demo = demo(WriteOptions::default());
    let writer = &demo.writer;

    // WHEN each repeatedly offers the value it last read
    let wins: usize = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let mut won = 0;
                    for _ in 0..25 {
                        let seen = writer.read(&spin(1)).unwrap();
                        if writer.apply(&[set(spin(1), seen)], &ctx()).is_ok() {
                            won += 1;
                        }
                    }
                    won
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).sum()
    });

    // THEN the spinlock advanced exactly once per successful write
    assert!(wins >= 1);
    assert_eq!(
        writer.read(&spin(1)),
        Some(Value::Integer(i64::try_from(wins).unwrap()))
    );
}

#[test]
fn test_concurrent_row_creation() {
    // GIVEN four writers, each creating its own row
    let demo = demo(WriteOptions::default());
    let writer = &demo.writer;

    // WHEN they run at once
    std::thread::scope(|scope| {
        for row in 10..14u32 {
            scope.spawn(move || {
                let batch = [
                    set(status(row), Value::Integer(RowStatus::CreateAndGo.value())),
                    set(descr(row), text(&format!("port{}", row))),
                ];
                writer.apply(&batch, &ctx()).unwrap();
            });
        }
    });

    // THEN every row is active with its own values
    assert_eq!(writer.lock_entries(), 0);
    for row in 10..14u32 {
        assert_eq!(writer.row_state("demoTable", &[row]), RowState::Active);
        assert_eq!(
            writer.read(&descr(row)),
            Some(text(&format!("port{}", row)))
        );
    }
}

#[test]
fn test_lock_table_does_not_grow_with_failed_writes() {
    // GIVEN a writer
    let demo = demo(WriteOptions::default());

    // WHEN many writes address rows that do not exist
    for row in 100..1100u32 {
        demo.writer
            .apply(&[set(descr(row), text("ghost"))], &ctx())
            .unwrap_err();
    }

    // AND a row is created and destroyed again
    demo.writer
        .apply(
            &[
                set(status(5), Value::Integer(RowStatus::CreateAndGo.value())),
                set(descr(5), text("brief")),
            ],
            &ctx(),
        )
        .unwrap();
    demo.writer
        .apply(&[set(status(5), Value::Integer(RowStatus::Destroy.value()))], &ctx())
        .unwrap();

    // THEN no lock entry outlives its request
    assert_eq!(demo.writer.lock_entries(), 0);
}

#[test]
fn test_write_apply_lifecycle_events() {
    let capture = init_test_capture();
    let demo = demo(WriteOptions::default());

    // GIVEN a successful request
    demo.writer
        .apply(&[set(oid(NAME), text("logged"))], &ctx_with("req-write-ok"))
        .unwrap();

    // THEN start and end events carry its id and mode
    let mine = |id: &str| {
        capture
            .events_for("write_apply")
            .into_iter()
            .filter(|e| e.field("request_id") == Some(id))
            .collect::<Vec<_>>()
    };
    let events = mine("req-write-ok");
    assert!(events.iter().any(|e| e.event.as_deref() == Some(EVENT_START)
        && e.field("varbinds") == Some("1")));
    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.field("write_mode"), Some("Atomic"));
    assert_eq!(end.field("changes"), Some("1"));

    // GIVEN a failing request
    demo.writer
        .apply(&[set(oid(UPTIME), Value::Unsigned(1))], &ctx_with("req-write-err"))
        .unwrap_err();

    // THEN an error event carries the stable code
    let failed = mine("req-write-err");
    let error = failed
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .unwrap();
    assert_eq!(error.field("err_code"), Some("ERR_NOT_WRITABLE"));
    assert_eq!(error.level, tracing::Level::ERROR);
}
