//! Agent Bootstrap Tests
//!
//! ## Scenarios Covered
//!
//! 1. Bootstrapping from config, type and behaviour files
//! 2. Configuration reaches seed rows and the write fallback
//! 3. Type, generation and registration problems are reported, not fatal
//! 4. Duplicate types and unreadable files fail the bootstrap

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{ctx, descr, oid, set, spin, status, text, DEMO_BEHAVIOUR};
use mibtc_core::catalog::parse_behaviour;
use mibtc_core::errors::ExErrorKind;
use mibtc_core::{AgentConfig, RowState, RowStatus, TypeNode, Value};
use mibtc_engine::{Agent, InMemoryEngine, NullSink, ProtocolEngine, WriteFailure};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const TYPES: &str = r#"[
    {"name": "PortLabel", "parent": "DisplayString",
     "constraints": [{"type": "ValueSizeConstraint", "min": 1, "max": 32}]},
    {"name": "Dangling", "parent": "NeverDefined"}
]"#;

const BEHAVIOUR: &str = r#"{
    "lab":        {"oid": [1, 3, 6, 1, 4, 1, 8888]},
    "labLabel":   {"oid": [1, 3, 6, 1, 4, 1, 8888, 1], "type": "PortLabel",
                   "access": "read-write", "initial": "lab"},
    "labBroken":  {"oid": [1, 3, 6, 1, 4, 1, 8888, 2], "type": "Dangling",
                   "access": "read-only"}
}"#;

fn write_files(dir: &TempDir, config: &str) -> (PathBuf, PathBuf, PathBuf) {
    let config_path = dir.path().join("agent.yaml");
    let types_path = dir.path().join("types.json");
    let behaviour_path = dir.path().join("behaviour.json");
    std::fs::write(&config_path, config).unwrap();
    std::fs::write(&types_path, TYPES).unwrap();
    std::fs::write(&behaviour_path, BEHAVIOUR).unwrap();
    (config_path, types_path, behaviour_path)
}

/// Engine with definitions for every object the records will produce
fn engine_for(config: &AgentConfig, types: Vec<TypeNode>, records: &str) -> Arc<InMemoryEngine> {
    let records = parse_behaviour(records).unwrap();
    let scratch = Agent::bootstrap(
        config,
        types,
        &records,
        Arc::new(InMemoryEngine::new()),
        Arc::new(NullSink),
    )
    .unwrap();
    Arc::new(InMemoryEngine::from_object_space(scratch.space()))
}

#[test]
fn test_from_files() {
    // GIVEN config, type and behaviour files
    let dir = TempDir::new().unwrap();
    let (config_path, types_path, behaviour_path) = write_files(&dir, "");
    let types = mibtc_core::catalog::parse_type_records(TYPES).unwrap();
    let engine = engine_for(&AgentConfig::default(), types, BEHAVIOUR);

    // WHEN the agent bootstraps from them
    let agent = Agent::from_files(
        &config_path,
        &types_path,
        &behaviour_path,
        engine.clone(),
        Arc::new(NullSink),
    )
    .unwrap();

    // THEN the custom convention is resolved and registered
    let label = agent.registry().resolve("PortLabel").unwrap();
    assert_eq!(label.ancestry, vec!["PortLabel", "DisplayString", "OctetString"]);
    assert_eq!(
        engine.value(&oid("1.3.6.1.4.1.8888.1.0")),
        Some(text("lab"))
    );

    // AND the dangling type is reported, as is the object that used it
    assert!(agent.registry().failures().contains_key("Dangling"));
    assert_eq!(agent.generation_failures().len(), 1);
    assert_eq!(agent.generation_failures()[0].object, "labBroken");
    assert!(agent.registration().skipped.is_empty());

    // AND writes respect the derived size constraint
    let err = agent
        .writer()
        .apply(&[set(oid("1.3.6.1.4.1.8888.1.0"), text(""))], &ctx())
        .unwrap_err();
    assert!(matches!(err, WriteFailure::ConstraintViolation { .. }));
}

#[test]
fn test_config_reaches_registration_and_writes() {
    // GIVEN two seed rows and the fallback disabled
    let config = AgentConfig::from_yaml_str(
        "registration:\n  seed_rows: 2\nwrite:\n  sequential_fallback: false\n",
    )
    .unwrap();
    let records = parse_behaviour(DEMO_BEHAVIOUR).unwrap();
    let engine = engine_for(&config, vec![], DEMO_BEHAVIOUR);

    // WHEN the demo agent bootstraps
    let agent = Agent::bootstrap(&config, vec![], &records, engine, Arc::new(NullSink)).unwrap();

    // THEN both seed rows exist
    assert_eq!(agent.writer().row_state("demoTable", &[1]), RowState::Active);
    assert_eq!(agent.writer().row_state("demoTable", &[2]), RowState::Active);

    // AND a creating batch with a spinlock is refused outright
    let batch = [
        set(status(3), Value::Integer(RowStatus::CreateAndWait.value())),
        set(descr(3), text("x")),
        set(spin(3), Value::Integer(0)),
    ];
    let err = agent.writer().apply(&batch, &ctx()).unwrap_err();
    assert_eq!(err, WriteFailure::MissingInstance { path: spin(3) });
}

#[test]
fn test_unregistrable_objects_are_reported() {
    // GIVEN an engine with no definitions at all
    let records = parse_behaviour(DEMO_BEHAVIOUR).unwrap();
    let engine: Arc<dyn ProtocolEngine> = Arc::new(InMemoryEngine::new());

    // WHEN the demo agent bootstraps
    let agent = Agent::bootstrap(
        &AgentConfig::default(),
        vec![],
        &records,
        engine,
        Arc::new(NullSink),
    )
    .unwrap();

    // THEN it still starts, reporting every scalar and the table
    let skipped: Vec<&str> = agent
        .registration()
        .skipped
        .iter()
        .map(|s| s.object.as_str())
        .collect();
    assert_eq!(skipped, vec!["demoName", "demoUpTime", "demoTable"]);
    assert!(agent.registration().registered.is_empty());
}

#[test]
fn test_duplicate_type_fails_bootstrap() {
    let records = parse_behaviour(DEMO_BEHAVIOUR).unwrap();

    let err = Agent::bootstrap(
        &AgentConfig::default(),
        vec![TypeNode::derived("DisplayString", "OctetString")],
        &records,
        Arc::new(InMemoryEngine::new()),
        Arc::new(NullSink),
    )
    .err()
    .unwrap();

    assert_eq!(err.kind(), ExErrorKind::DuplicateType);
    assert_eq!(err.type_name(), Some("DisplayString"));
}

#[test]
fn test_missing_file_fails_bootstrap() {
    let dir = TempDir::new().unwrap();
    let (config_path, types_path, _) = write_files(&dir, "");

    let err = Agent::from_files(
        &config_path,
        &types_path,
        &dir.path().join("absent.json"),
        Arc::new(InMemoryEngine::new()),
        Arc::new(NullSink),
    )
    .err()
    .unwrap();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert!(err.message().contains("absent.json"));
}
