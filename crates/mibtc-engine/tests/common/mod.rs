use mibtc_core::catalog::{build_object_space, parse_behaviour};
use mibtc_core::{DefaultSynthesizer, ObjectSpace, Oid, TypeRegistryBuilder, Value};
use mibtc_core_types::{RequestContext, RequestId};
use mibtc_engine::sink::{ChangeNotification, ChangeSink, SinkError};
use mibtc_engine::{InMemoryEngine, Registrar, RegistrationReport, Varbind, WriteEngine, WriteOptions};
use std::sync::{Arc, Mutex};

/// Demo group with one table
///
/// ```text
/// 1.3.6.1.4.1.9999.1     demoName     DisplayString  read-write ("agent")
/// 1.3.6.1.4.1.9999.2     demoUpTime   TimeTicks      read-only (uptime)
/// 1.3.6.1.4.1.9999.3.1   demoEntry    indexes [demoIndex]
///                 .1     demoIndex    Integer32      not-accessible
///                 .2     demoDescr    DisplayString  read-create (mandatory)
///                 .3     demoSpin     TestAndIncr    read-create
///                 .4     demoStatus   RowStatus      read-create
/// ```
#[allow(dead_code)]
pub const DEMO_BEHAVIOUR: &str = r#"{
    "demo":       {"oid": [1, 3, 6, 1, 4, 1, 9999]},
    "demoName":   {"oid": [1, 3, 6, 1, 4, 1, 9999, 1], "type": "DisplayString",
                   "access": "read-write", "initial": "agent"},
    "demoUpTime": {"oid": [1, 3, 6, 1, 4, 1, 9999, 2], "type": "TimeTicks",
                   "access": "read-only", "dynamic_function": "uptime"},
    "demoTable":  {"oid": [1, 3, 6, 1, 4, 1, 9999, 3], "access": "not-accessible"},
    "demoEntry":  {"oid": [1, 3, 6, 1, 4, 1, 9999, 3, 1], "access": "not-accessible",
                   "indexes": ["demoIndex"]},
    "demoIndex":  {"oid": [1, 3, 6, 1, 4, 1, 9999, 3, 1, 1], "type": "Integer32",
                   "access": "not-accessible"},
    "demoDescr":  {"oid": [1, 3, 6, 1, 4, 1, 9999, 3, 1, 2], "type": "DisplayString",
                   "access": "read-create", "mandatory": true},
    "demoSpin":   {"oid": [1, 3, 6, 1, 4, 1, 9999, 3, 1, 3], "type": "TestAndIncr",
                   "access": "read-create"},
    "demoStatus": {"oid": [1, 3, 6, 1, 4, 1, 9999, 3, 1, 4], "type": "RowStatus",
                   "access": "read-create"}
}"#;

#[allow(dead_code)]
pub const NAME: &str = "1.3.6.1.4.1.9999.1.0";
#[allow(dead_code)]
pub const UPTIME: &str = "1.3.6.1.4.1.9999.2.0";
#[allow(dead_code)]
pub const ENTRY: &str = "1.3.6.1.4.1.9999.3.1";

#[allow(dead_code)]
pub fn oid(s: &str) -> Oid {
    s.parse().unwrap()
}

/// Instance path of demo column `arc` in row `row`
#[allow(dead_code)]
pub fn cell(arc: u32, row: u32) -> Oid {
    oid(ENTRY).join(&[arc, row])
}

#[allow(dead_code)]
pub fn descr(row: u32) -> Oid {
    cell(2, row)
}

#[allow(dead_code)]
pub fn spin(row: u32) -> Oid {
    cell(3, row)
}

#[allow(dead_code)]
pub fn status(row: u32) -> Oid {
    cell(4, row)
}

#[allow(dead_code)]
pub fn text(s: &str) -> Value {
    Value::OctetString(s.as_bytes().to_vec())
}

#[allow(dead_code)]
pub fn set(path: Oid, value: Value) -> Varbind {
    Varbind::new(path, value)
}

#[allow(dead_code)]
pub fn ctx() -> RequestContext {
    RequestContext::new()
}

#[allow(dead_code)]
pub fn ctx_with(id: &str) -> RequestContext {
    RequestContext::with_request_id(RequestId::from_string(id))
}

#[allow(dead_code)]
pub fn demo_space() -> ObjectSpace {
    let records = parse_behaviour(DEMO_BEHAVIOUR).unwrap();
    let registry = TypeRegistryBuilder::standard().build();
    let synth = DefaultSynthesizer::from_config(&Default::default()).unwrap();
    let report = build_object_space(&records, &registry, &synth);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    report.space
}

/// Records every notification it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    changes: Mutex<Vec<ChangeNotification>>,
}

impl RecordingSink {
    #[allow(dead_code)]
    pub fn changes(&self) -> Vec<ChangeNotification> {
        self.changes.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn paths(&self) -> Vec<Oid> {
        self.changes().into_iter().map(|c| c.path).collect()
    }
}

impl ChangeSink for RecordingSink {
    fn record(&self, change: &ChangeNotification) -> Result<(), SinkError> {
        self.changes.lock().unwrap().push(change.clone());
        Ok(())
    }
}

/// Refuses every notification
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FailingSink;

impl ChangeSink for FailingSink {
    fn record(&self, _change: &ChangeNotification) -> Result<(), SinkError> {
        Err(SinkError("disk full".to_string()))
    }
}

/// A registered demo agent over the in-memory engine
#[allow(dead_code)]
pub struct Demo {
    pub engine: Arc<InMemoryEngine>,
    pub sink: Arc<RecordingSink>,
    pub report: RegistrationReport,
    pub writer: WriteEngine,
}

#[allow(dead_code)]
pub fn demo(options: WriteOptions) -> Demo {
    demo_with(options, |_| {})
}

/// Like [`demo`], letting the caller adjust the engine before registration
#[allow(dead_code)]
pub fn demo_with(options: WriteOptions, prepare: impl FnOnce(&InMemoryEngine)) -> Demo {
    let space = Arc::new(demo_space());
    let engine = Arc::new(InMemoryEngine::from_object_space(&space));
    prepare(&*engine);
    let (report, store) = Registrar::new(&*engine).register_object_space(&space);
    let sink = Arc::new(RecordingSink::default());
    let writer = WriteEngine::new(
        space,
        store,
        engine.clone(),
        sink.clone(),
        options,
    );
    Demo {
        engine,
        sink,
        report,
        writer,
    }
}

/// Committed `(path, value)` pairs, in tree order
#[allow(dead_code)]
pub fn committed(writer: &WriteEngine) -> Vec<(Oid, Value)> {
    let store = writer.snapshot();
    store
        .paths()
        .filter_map(|p| store.value(p).map(|v| (p.clone(), v.clone())))
        .collect()
}
