use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::oid::Oid;
use super::type_node::{CanonicalTypeInfo, ValueSemantics};
use super::value::Value;
use crate::dynamic::DynamicProvider;

/// MAX-ACCESS of a declared object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    ReadOnly,
    ReadWrite,
    ReadCreate,
    NotAccessible,
    AccessibleForNotify,
}

impl Access {
    pub fn is_writable(&self) -> bool {
        matches!(self, Access::ReadWrite | Access::ReadCreate)
    }

    /// Whether scalars with this access get an instance at all
    pub fn is_instantiable(&self) -> bool {
        !matches!(self, Access::NotAccessible | Access::AccessibleForNotify)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::ReadOnly => "read-only",
            Access::ReadWrite => "read-write",
            Access::ReadCreate => "read-create",
            Access::NotAccessible => "not-accessible",
            Access::AccessibleForNotify => "accessible-for-notify",
        })
    }
}

/// A declared scalar or table column, ready for registration
#[derive(Clone)]
pub struct ObjectEntry {
    pub name: String,
    /// Object identifier of the declaration (no instance suffix)
    pub path: Oid,
    pub type_info: Arc<CanonicalTypeInfo>,
    pub access: Access,
    pub initial_value: Value,
    pub dynamic_provider: Option<Arc<dyn DynamicProvider>>,
    /// Row creation without a value for this column leaves the row notReady
    pub mandatory: bool,
}

impl ObjectEntry {
    pub fn semantics(&self) -> ValueSemantics {
        self.type_info.semantics
    }

    /// Value to instantiate with: a dynamic sample, else the initial value
    pub fn current_initial(&self) -> Value {
        self.dynamic_provider
            .as_ref()
            .map(|p| p.sample())
            .unwrap_or_else(|| self.initial_value.clone())
    }
}

impl fmt::Debug for ObjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectEntry")
            .field("name", &self.name)
            .field("path", &self.path.to_string())
            .field("type", &self.type_info.name)
            .field("access", &self.access)
            .field("initial_value", &self.initial_value)
            .field(
                "dynamic_provider",
                &self.dynamic_provider.as_ref().map(|p| p.name().to_string()),
            )
            .field("mandatory", &self.mandatory)
            .finish()
    }
}

/// A conceptual table: its row (entry) node and the columns under it
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: String,
    pub path: Oid,
    pub entry_name: String,
    pub entry_path: Oid,
    /// Sorted by column arc
    pub columns: Vec<ObjectEntry>,
    /// Column arcs forming the row index, in index order
    pub index_columns: Vec<u32>,
}

impl TableDef {
    pub fn column_arc(column: &ObjectEntry) -> u32 {
        column.path.last_arc().unwrap_or_default()
    }

    pub fn column(&self, arc: u32) -> Option<&ObjectEntry> {
        self.columns.iter().find(|c| Self::column_arc(c) == arc)
    }

    pub fn is_index(&self, arc: u32) -> bool {
        self.index_columns.contains(&arc)
    }

    /// The RowStatus column, if the table has one
    pub fn status_column(&self) -> Option<&ObjectEntry> {
        self.columns
            .iter()
            .find(|c| c.semantics() == ValueSemantics::RowStatus)
    }

    /// Columns a creating request must supply
    pub fn mandatory_columns(&self) -> impl Iterator<Item = &ObjectEntry> {
        self.columns
            .iter()
            .filter(|c| c.mandatory && !self.is_index(Self::column_arc(c)))
    }
}

/// Where an instance path points inside the object space
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Scalar(&'a ObjectEntry),
    Column {
        table: &'a TableDef,
        column: &'a ObjectEntry,
    },
}

impl<'a> Target<'a> {
    pub fn entry(&self) -> &'a ObjectEntry {
        match self {
            Target::Scalar(entry) => entry,
            Target::Column { column, .. } => column,
        }
    }
}

/// Every object generated from the declarative records
#[derive(Debug, Clone, Default)]
pub struct ObjectSpace {
    pub scalars: Vec<ObjectEntry>,
    pub tables: Vec<TableDef>,
}

impl ObjectSpace {
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.tables.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn scalar(&self, name: &str) -> Option<&ObjectEntry> {
        self.scalars.iter().find(|s| s.name == name)
    }

    /// Resolve an instance path
    ///
    /// Scalars are addressed as `<path>.0`; columns as `<column>.<index>`
    /// where the index has one arc per index column.
    pub fn locate(&self, instance: &Oid) -> Option<(Target<'_>, Vec<u32>)> {
        for scalar in &self.scalars {
            if scalar.path.suffix_of(instance) == Some(&[0][..]) {
                return Some((Target::Scalar(scalar), Vec::new()));
            }
        }
        for table in &self.tables {
            let Some(rest) = table.entry_path.suffix_of(instance) else {
                continue;
            };
            let Some((arc, index)) = rest.split_first() else {
                continue;
            };
            if index.len() != table.index_columns.len() {
                continue;
            }
            if let Some(column) = table.column(*arc) {
                return Some((Target::Column { table, column }, index.to_vec()));
            }
        }
        None
    }
}
