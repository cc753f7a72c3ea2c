//! Object registration
//!
//! Instantiates every generated object inside the protocol engine at
//! startup. Failures are isolated: a scalar or column that cannot be
//! instantiated is skipped and reported, and only an index column failure
//! takes its whole table down. The report, not an error, is the result.
//!
//! ## Logging Ownership
//!
//! `register_object_space` owns the lifecycle events for the startup pass;
//! per-object skips are `warn!` detail events.

use mibtc_core::{
    log_op_end, log_op_start, ObjectEntry, ObjectSpace, Oid, RowState, TableDef, Value,
};
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use crate::engine::{Handle, ProtocolEngine, RepresentationKind};
use crate::errors::RegistrationFailure;
use crate::instances::{InstanceStore, RowKey, RowRecord};

/// An object (or table) left out, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedObject {
    pub object: String,
    pub failure: RegistrationFailure,
}

/// Outcome of registering an object space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationReport {
    /// Instance paths created, in registration order
    pub registered: Vec<Oid>,
    pub skipped: Vec<SkippedObject>,
}

impl RegistrationReport {
    pub fn skipped_object(&self, name: &str) -> Option<&RegistrationFailure> {
        self.skipped
            .iter()
            .find(|s| s.object == name)
            .map(|s| &s.failure)
    }

    pub fn is_registered(&self, path: &Oid) -> bool {
        self.registered.contains(path)
    }

    fn skip(&mut self, object: &str, failure: RegistrationFailure) {
        tracing::warn!(
            object,
            path = %failure.path(),
            error = %failure,
            "object not registered"
        );
        self.skipped.push(SkippedObject {
            object: object.to_string(),
            failure,
        });
    }
}

/// Registers objects with a protocol engine
pub struct Registrar<'a> {
    engine: &'a dyn ProtocolEngine,
    seed_rows: u32,
}

impl<'a> Registrar<'a> {
    pub fn new(engine: &'a dyn ProtocolEngine) -> Self {
        Self {
            engine,
            seed_rows: 1,
        }
    }

    /// Rows instantiated per table, indexed `1..=n`
    pub fn with_seed_rows(mut self, seed_rows: u32) -> Self {
        self.seed_rows = seed_rows;
        self
    }

    /// Register `entry` at `<path>.<instance>` with its initial value
    ///
    /// Scalars take the instance `[0]`, columns their row index.
    ///
    /// # Errors
    ///
    /// `MissingSymbol` if the engine has no definition covering the path,
    /// `ValueModelIncompatible` if it cannot hold the instance there.
    pub fn register(
        &self,
        entry: &ObjectEntry,
        instance: &[u32],
    ) -> Result<Handle, RegistrationFailure> {
        self.register_initial(entry, instance).map(|(_, handle, _)| handle)
    }

    /// Register every scalar, then every table's seed rows
    ///
    /// Returns the report and the committed instances the write engine
    /// starts from.
    pub fn register_object_space(&self, space: &ObjectSpace) -> (RegistrationReport, InstanceStore) {
        log_op_start!(
            "register_object_space",
            scalars = space.scalars.len(),
            tables = space.tables.len()
        );
        let start = Instant::now();

        let mut report = RegistrationReport::default();
        let mut store = InstanceStore::new();
        for scalar in &space.scalars {
            match self.register_initial(scalar, &[0]) {
                Ok((path, handle, value)) => {
                    store.insert(path.clone(), handle, value);
                    report.registered.push(path);
                }
                Err(failure) => report.skip(&scalar.name, failure),
            }
        }
        for table in &space.tables {
            self.register_table(table, &mut report, &mut store);
        }

        log_op_end!(
            "register_object_space",
            duration_ms = start.elapsed().as_millis() as u64,
            registered = report.registered.len(),
            skipped = report.skipped.len()
        );
        (report, store)
    }

    fn register_initial(
        &self,
        entry: &ObjectEntry,
        instance: &[u32],
    ) -> Result<(Oid, Handle, Value), RegistrationFailure> {
        let path = entry.path.join(instance);
        let value = entry.current_initial();
        let handle = self.instantiate(&path, entry, &value)?;
        Ok((path, handle, value))
    }

    fn instantiate(
        &self,
        path: &Oid,
        entry: &ObjectEntry,
        value: &Value,
    ) -> Result<Handle, RegistrationFailure> {
        let representation = RepresentationKind::from(entry.type_info.base_kind);
        self.engine
            .instantiate(path, representation, value)
            .map_err(|err| RegistrationFailure::from_engine(path.clone(), representation, err))
    }

    fn register_table(
        &self,
        table: &TableDef,
        report: &mut RegistrationReport,
        store: &mut InstanceStore,
    ) {
        let rows: Vec<Vec<u32>> = (1..=self.seed_rows)
            .map(|n| vec![n; table.index_columns.len()])
            .collect();

        let mut created: Vec<(Oid, Handle, Value)> = Vec::new();
        if let Err(failure) = self.register_index(table, &rows, &mut created) {
            for (path, handle, _) in created.into_iter().rev() {
                if let Err(err) = self.engine.remove(handle) {
                    tracing::warn!(%path, error = %err, "could not drop index instance");
                }
            }
            report.skip(&table.name, failure);
            return;
        }

        let status_arc = table.status_column().map(TableDef::column_arc);
        let mut failed: HashSet<u32> = HashSet::new();
        for index in &rows {
            let mut missing = BTreeSet::new();
            for column in &table.columns {
                let arc = TableDef::column_arc(column);
                if table.is_index(arc) || Some(arc) == status_arc {
                    continue;
                }
                if !failed.contains(&arc) {
                    match self.register_initial(column, index) {
                        Ok(instance) => {
                            created.push(instance);
                            continue;
                        }
                        Err(failure) => {
                            failed.insert(arc);
                            report.skip(&column.name, failure);
                        }
                    }
                }
                if column.mandatory {
                    missing.insert(arc);
                }
            }

            let state = if missing.is_empty() {
                RowState::Active
            } else {
                RowState::NotReady
            };
            if let (Some(status), Some(reported)) = (table.status_column(), state.reported()) {
                let arc = TableDef::column_arc(status);
                if !failed.contains(&arc) {
                    let path = status.path.join(index);
                    let value = Value::Integer(reported.value());
                    match self.instantiate(&path, status, &value) {
                        Ok(handle) => created.push((path, handle, value)),
                        Err(failure) => {
                            failed.insert(arc);
                            report.skip(&status.name, failure);
                        }
                    }
                }
            }
            store.set_row(RowKey::new(table, index), RowRecord { state, missing });
        }

        for (path, handle, value) in created {
            store.insert(path.clone(), handle, value);
            report.registered.push(path);
        }
        tracing::debug!(table = %table.name, rows = rows.len(), "table registered");
    }

    /// Index columns for every seed row; the first failure aborts the table
    fn register_index(
        &self,
        table: &TableDef,
        rows: &[Vec<u32>],
        created: &mut Vec<(Oid, Handle, Value)>,
    ) -> Result<(), RegistrationFailure> {
        for (position, &arc) in table.index_columns.iter().enumerate() {
            let column_path = table.entry_path.child(arc);
            let unavailable = |cause: String| RegistrationFailure::TableIndexUnavailable {
                table: table.name.clone(),
                column: column_path.clone(),
                cause,
            };
            let column = table
                .column(arc)
                .ok_or_else(|| unavailable("index column was not generated".to_string()))?;
            for index in rows {
                let n = index[position];
                let value = index_value(column, n).ok_or_else(|| {
                    unavailable(format!("{} cannot hold row index {}", column.type_info.name, n))
                })?;
                let path = column.path.join(index);
                let handle = self
                    .instantiate(&path, column, &value)
                    .map_err(|failure| unavailable(failure.to_string()))?;
                created.push((path, handle, value));
            }
        }
        Ok(())
    }
}

/// Value an index column holds for index arc `n`, if its type admits it
pub(crate) fn index_value(column: &ObjectEntry, n: u32) -> Option<Value> {
    Value::number(column.type_info.base_kind, i128::from(n))
        .filter(|v| column.type_info.check(v).is_ok())
}
