use mibtc_core::catalog::{parse_behaviour, ObjectRecord};
use mibtc_core::{DefaultSynthesizer, TypeNode, TypeRegistry, TypeRegistryBuilder};

/// Registry with primitives and the SNMPv2-TC conventions only
#[allow(dead_code)]
pub fn standard_registry() -> TypeRegistry {
    TypeRegistryBuilder::standard().build()
}

/// Standard registry extended with `nodes`
#[allow(dead_code)]
pub fn registry_with(nodes: Vec<TypeNode>) -> TypeRegistry {
    let mut builder = TypeRegistryBuilder::standard();
    builder.extend(nodes).unwrap();
    builder.build()
}

/// Synthesizer with the stock provider chain
#[allow(dead_code)]
pub fn stock_synthesizer() -> DefaultSynthesizer {
    DefaultSynthesizer::from_config(&Default::default()).unwrap()
}

/// A small system group plus one table with a RowStatus and a spinlock
///
/// ```text
/// 1.3.6.1.4.1.9999.1     demoName          DisplayString  read-write
/// 1.3.6.1.4.1.9999.2     demoUpTime        TimeTicks      read-only (uptime)
/// 1.3.6.1.4.1.9999.3     demoTable
/// 1.3.6.1.4.1.9999.3.1   demoEntry         indexes [demoIndex]
///                 .1     demoIndex         Integer32      not-accessible
///                 .2     demoDescr         DisplayString  read-create (mandatory)
///                 .3     demoSpin          TestAndIncr    read-create
///                 .4     demoStatus        RowStatus      read-create
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
pub fn demo_records() -> Vec<ObjectRecord> {
    parse_behaviour(DEMO_BEHAVIOUR).unwrap()
}
