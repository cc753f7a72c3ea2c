//! Domain model: base kinds, constraints, type nodes, values and objects

pub mod base_kind;
pub mod constraint;
pub mod object;
pub mod oid;
pub mod type_node;
pub mod value;

pub use base_kind::BaseKind;
pub use constraint::ConstraintNode;
pub use object::{Access, ObjectEntry, ObjectSpace, TableDef, Target};
pub use oid::{Oid, OidParseError};
pub use type_node::{CanonicalTypeInfo, EnumValue, TypeNode, ValueSemantics};
pub use value::Value;
