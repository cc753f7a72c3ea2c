//! Committed instance values and row states
//!
//! The write engine validates against this store and updates it only after
//! the protocol engine has accepted a whole commit.

use mibtc_core::{Oid, RowState, TableDef, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::Handle;

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub handle: Handle,
    pub value: Value,
}

/// Identity of one conceptual row: its entry node plus the index arcs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub entry: Oid,
    pub index: Vec<u32>,
}

impl RowKey {
    pub fn new(table: &TableDef, index: &[u32]) -> Self {
        Self {
            entry: table.entry_path.clone(),
            index: index.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub state: RowState,
    /// Mandatory column arcs still without a value
    pub missing: BTreeSet<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceStore {
    values: BTreeMap<Oid, Instance>,
    rows: BTreeMap<RowKey, RowRecord>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Oid) -> Option<&Instance> {
        self.values.get(path)
    }

    pub fn value(&self, path: &Oid) -> Option<&Value> {
        self.values.get(path).map(|i| &i.value)
    }

    pub fn insert(&mut self, path: Oid, handle: Handle, value: Value) {
        self.values.insert(path, Instance { handle, value });
    }

    /// Replace the value of an existing instance; false if there is none
    pub fn set_value(&mut self, path: &Oid, value: Value) -> bool {
        match self.values.get_mut(path) {
            Some(instance) => {
                instance.value = value;
                true
            }
            None => false,
        }
    }

    /// Point an existing instance at a new engine handle
    pub fn rebind(&mut self, path: &Oid, handle: Handle) {
        if let Some(instance) = self.values.get_mut(path) {
            instance.handle = handle;
        }
    }

    pub fn remove(&mut self, path: &Oid) -> Option<Instance> {
        self.values.remove(path)
    }

    pub fn row(&self, key: &RowKey) -> Option<&RowRecord> {
        self.rows.get(key)
    }

    pub fn row_state(&self, key: &RowKey) -> RowState {
        self.rows
            .get(key)
            .map_or(RowState::NonExistent, |r| r.state)
    }

    pub fn set_row(&mut self, key: RowKey, record: RowRecord) {
        self.rows.insert(key, record);
    }

    pub fn remove_row(&mut self, key: &RowKey) -> Option<RowRecord> {
        self.rows.remove(key)
    }

    /// Rows of the table at `entry`, in index order
    pub fn rows_of<'a>(&'a self, entry: &'a Oid) -> impl Iterator<Item = (&'a RowKey, &'a RowRecord)> {
        self.rows.iter().filter(move |(key, _)| &key.entry == entry)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Oid> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
