//! Declarative records and object-space generation
//!
//! Type records are a JSON array of type nodes. Behaviour records are a JSON
//! object mapping each object name to its identifier, type, access and
//! optional initial value:
//!
//! ```json
//! {
//!   "sysUpTime": {"oid": [1,3,6,1,2,1,1,3], "type": "TimeTicks",
//!                 "access": "read-only", "dynamic_function": "uptime"},
//!   "sysName":   {"oid": [1,3,6,1,2,1,1,5], "type": "DisplayString",
//!                 "access": "read-write", "initial": "agent"}
//! }
//! ```
//!
//! Tables are recognised by shape: a `not-accessible` record named `xTable`,
//! its row record `xEntry` directly beneath it, and the row's direct
//! children as columns.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::defaults::DefaultSynthesizer;
use crate::dynamic;
use crate::errors::{MibError, Result};
use crate::model::{
    Access, BaseKind, ConstraintNode, EnumValue, ObjectEntry, ObjectSpace, Oid, TableDef,
    TypeNode, Value,
};
use crate::registry::TypeRegistry;

/// One behaviour record; `name` comes from the enclosing map key
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectRecord {
    #[serde(skip)]
    pub name: String,
    pub oid: Oid,
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub access: Option<Access>,
    #[serde(default)]
    pub initial: Option<serde_json::Value>,
    #[serde(default)]
    pub dynamic_function: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    /// On row records: index column names, in order
    #[serde(default)]
    pub indexes: Vec<String>,
}

/// # Errors
///
/// `Serialization` if the document is not an array of type records.
pub fn parse_type_records(json: &str) -> Result<Vec<TypeNode>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse behaviour records, returned in identifier order
///
/// # Errors
///
/// `Serialization` if the document is not a map of behaviour records.
pub fn parse_behaviour(json: &str) -> Result<Vec<ObjectRecord>> {
    let map: BTreeMap<String, ObjectRecord> = serde_json::from_str(json)?;
    let mut records: Vec<ObjectRecord> = map
        .into_iter()
        .map(|(name, mut record)| {
            record.name = name;
            record
        })
        .collect();
    records.sort_by(|a, b| a.oid.cmp(&b.oid));
    Ok(records)
}

/// An object that could not be generated, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFailure {
    pub object: String,
    pub path: Oid,
    pub error: MibError,
}

/// Generated objects plus the records that were left out
#[derive(Debug, Clone, Default)]
pub struct ObjectSpaceReport {
    pub space: ObjectSpace,
    pub failures: Vec<GenerationFailure>,
}

/// Turn behaviour records into registrable objects
///
/// Every object gets its canonical type and an initial value: the record's
/// own (checked against the type), a dynamic sample, or a synthesized
/// default. A record that fails is reported and skipped; the rest proceed.
pub fn build_object_space(
    records: &[ObjectRecord],
    registry: &TypeRegistry,
    synth: &DefaultSynthesizer,
) -> ObjectSpaceReport {
    let by_name: HashMap<&str, &ObjectRecord> =
        records.iter().map(|r| (r.name.as_str(), r)).collect();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut report = ObjectSpaceReport::default();

    let table_records = records.iter().filter(|r| {
        r.name.ends_with("Table") && r.access == Some(Access::NotAccessible)
    });
    for table in table_records {
        claimed.insert(&table.name);
        let Some(entry) = find_entry(table, &by_name, records) else {
            report.failures.push(GenerationFailure {
                object: table.name.clone(),
                path: table.oid.clone(),
                error: MibError::InvalidRecord {
                    name: table.name.clone(),
                    reason: "no row entry beneath the table".to_string(),
                },
            });
            continue;
        };
        claimed.insert(&entry.name);

        let mut column_records: Vec<&ObjectRecord> = records
            .iter()
            .filter(|r| r.oid.parent().as_ref() == Some(&entry.oid))
            .collect();
        column_records.sort_by(|a, b| a.oid.cmp(&b.oid));
        claimed.extend(column_records.iter().map(|r| r.name.as_str()));

        let index_columns = match index_arcs(entry, &column_records) {
            Ok(arcs) => arcs,
            Err(error) => {
                report.failures.push(GenerationFailure {
                    object: table.name.clone(),
                    path: table.oid.clone(),
                    error,
                });
                continue;
            }
        };

        let mut columns = Vec::with_capacity(column_records.len());
        for record in column_records {
            match make_entry(record, registry, synth) {
                Ok(column) => columns.push(column),
                Err(error) => report.failures.push(failure(record, error)),
            }
        }
        tracing::debug!(
            table = %table.name,
            columns = columns.len(),
            index = ?index_columns,
            "table recognised"
        );
        report.space.tables.push(TableDef {
            name: table.name.clone(),
            path: table.oid.clone(),
            entry_name: entry.name.clone(),
            entry_path: entry.oid.clone(),
            columns,
            index_columns,
        });
    }

    for record in records {
        if claimed.contains(record.name.as_str()) || record.type_name.is_none() {
            continue;
        }
        if report
            .space
            .tables
            .iter()
            .any(|t| t.path.is_prefix_of(&record.oid))
        {
            continue;
        }
        if let Some(access) = record.access {
            if !access.is_instantiable() {
                tracing::debug!(object = %record.name, %access, "no instance for access level");
                continue;
            }
        }
        match make_entry(record, registry, synth) {
            Ok(scalar) => report.space.scalars.push(scalar),
            Err(error) => report.failures.push(failure(record, error)),
        }
    }

    for f in &report.failures {
        tracing::warn!(object = %f.object, oid = %f.path, error = %f.error, "object not generated");
    }
    report
}

fn failure(record: &ObjectRecord, error: MibError) -> GenerationFailure {
    GenerationFailure {
        object: record.name.clone(),
        path: record.oid.clone(),
        error,
    }
}

fn find_entry<'a>(
    table: &ObjectRecord,
    by_name: &HashMap<&str, &'a ObjectRecord>,
    records: &'a [ObjectRecord],
) -> Option<&'a ObjectRecord> {
    let under_table = |r: &&ObjectRecord| r.oid.parent().as_ref() == Some(&table.oid);
    let prefix = table.name.strip_suffix("Table").unwrap_or(&table.name);
    by_name
        .get(format!("{}Entry", prefix).as_str())
        .copied()
        .filter(under_table)
        .or_else(|| {
            records
                .iter()
                .filter(under_table)
                .find(|r| r.access == Some(Access::NotAccessible))
        })
}

/// Column arcs of the row index
///
/// Declared `indexes` win; otherwise the first column named like an index
/// or not accessible, otherwise the first column.
fn index_arcs(entry: &ObjectRecord, columns: &[&ObjectRecord]) -> Result<Vec<u32>> {
    let arc_of = |r: &ObjectRecord| r.oid.last_arc().unwrap_or_default();
    if !entry.indexes.is_empty() {
        return entry
            .indexes
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .find(|c| &c.name == name)
                    .map(|c| arc_of(c))
                    .ok_or_else(|| MibError::InvalidRecord {
                        name: entry.name.clone(),
                        reason: format!("index column {} is not a column of this row", name),
                    })
            })
            .collect();
    }
    columns
        .iter()
        .find(|c| c.name.contains("Index") || c.access == Some(Access::NotAccessible))
        .or_else(|| columns.first())
        .map(|c| vec![arc_of(c)])
        .ok_or_else(|| MibError::InvalidRecord {
            name: entry.name.clone(),
            reason: "row has no columns".to_string(),
        })
}

fn make_entry(
    record: &ObjectRecord,
    registry: &TypeRegistry,
    synth: &DefaultSynthesizer,
) -> Result<ObjectEntry> {
    let invalid = |reason: &str| MibError::InvalidRecord {
        name: record.name.clone(),
        reason: reason.to_string(),
    };
    let type_name = record
        .type_name
        .as_deref()
        .ok_or_else(|| invalid("record has no type"))?;
    let access = record.access.ok_or_else(|| invalid("record has no access"))?;
    let info = registry.resolve(type_name)?;

    let dynamic_provider = match &record.dynamic_function {
        Some(name) => Some(
            dynamic::by_name(name)
                .ok_or_else(|| invalid(&format!("unknown dynamic function {:?}", name)))?,
        ),
        None => None,
    };

    let initial_value = match (&record.initial, &dynamic_provider) {
        (Some(json), _) => Value::from_json(&info.name, info.base_kind, json)?,
        (None, Some(provider)) => provider.sample(),
        (None, None) => synth.synthesize(&info)?,
    };
    info.check(&initial_value)?;

    Ok(ObjectEntry {
        name: record.name.clone(),
        path: record.oid.clone(),
        type_info: info,
        access,
        initial_value,
        dynamic_provider,
        mandatory: record.mandatory,
    })
}

#[derive(Serialize)]
struct TypeExport<'a> {
    base_type: BaseKind,
    display_hint: Option<&'a str>,
    constraints: &'a [ConstraintNode],
    enums: Option<&'a [EnumValue]>,
    ancestry: &'a [String],
}

/// Every resolved type as a JSON object keyed by name
///
/// # Errors
///
/// `Serialization` if a value cannot be represented in JSON.
pub fn export_types(registry: &TypeRegistry) -> Result<serde_json::Value> {
    let infos = registry
        .names()
        .into_iter()
        .map(|name| registry.resolve(name).map(|info| (name, info)))
        .collect::<Result<Vec<_>>>()?;
    let exports: BTreeMap<&str, TypeExport<'_>> = infos
        .iter()
        .map(|(name, info)| {
            (
                *name,
                TypeExport {
                    base_type: info.base_kind,
                    display_hint: info.display_hint.as_deref(),
                    constraints: &info.constraints,
                    enums: info.enum_values.as_deref(),
                    ancestry: &info.ancestry,
                },
            )
        })
        .collect();
    Ok(serde_json::to_value(exports)?)
}
