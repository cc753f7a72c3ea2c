use serde::{Deserialize, Serialize};

use super::base_kind::BaseKind;
use super::constraint::ConstraintNode;
use super::value::Value;
use crate::errors::{MibError, Result};

/// Named label of an enumerated integer value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    #[serde(rename = "name")]
    pub label: String,
    pub value: i64,
}

impl EnumValue {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A named type as supplied by the definition loader
///
/// `parent` is a by-name reference resolved by the registry. Only primitive
/// nodes have no parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, rename = "constraints")]
    pub own_constraints: Vec<ConstraintNode>,
    #[serde(default, rename = "enums")]
    pub enum_values: Option<Vec<EnumValue>>,
    #[serde(default)]
    pub display_hint: Option<String>,
}

impl TypeNode {
    /// The root node for a primitive kind, carrying its natural constraints
    pub fn primitive(kind: BaseKind) -> Self {
        Self {
            name: kind.name().to_string(),
            parent: None,
            own_constraints: kind.natural_constraints(),
            enum_values: None,
            display_hint: None,
        }
    }

    pub fn derived(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
            own_constraints: Vec::new(),
            enum_values: None,
            display_hint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: ConstraintNode) -> Self {
        self.own_constraints.push(constraint);
        self
    }

    pub fn with_enums(mut self, values: &[(&str, i64)]) -> Self {
        self.enum_values = Some(
            values
                .iter()
                .map(|(label, value)| EnumValue::new(*label, *value))
                .collect(),
        );
        self
    }

    pub fn with_display_hint(mut self, hint: impl Into<String>) -> Self {
        self.display_hint = Some(hint.into());
        self
    }
}

/// Write-time behaviour implied by a type's ancestry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueSemantics {
    Plain,
    /// Row lifecycle column
    RowStatus,
    /// Spinlock: a SET must present the current value
    TestAndIncr,
}

impl ValueSemantics {
    pub(crate) fn from_ancestry(ancestry: &[String]) -> Self {
        if ancestry.iter().any(|n| n == "RowStatus") {
            ValueSemantics::RowStatus
        } else if ancestry.iter().any(|n| n == "TestAndIncr") {
            ValueSemantics::TestAndIncr
        } else {
            ValueSemantics::Plain
        }
    }
}

/// Resolved, canonical description of a named type
///
/// Computed once by the registry and shared behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalTypeInfo {
    pub name: String,
    pub base_kind: BaseKind,
    pub constraints: Vec<ConstraintNode>,
    /// Sorted by value; the nearest declaration in the chain wins
    pub enum_values: Option<Vec<EnumValue>>,
    pub display_hint: Option<String>,
    /// Leaf first, primitive last
    pub ancestry: Vec<String>,
    pub semantics: ValueSemantics,
}

impl CanonicalTypeInfo {
    pub fn ranges(&self) -> impl Iterator<Item = (i128, i128)> + '_ {
        self.constraints.iter().filter_map(ConstraintNode::as_range)
    }

    pub fn sizes(&self) -> impl Iterator<Item = (i128, i128)> + '_ {
        self.constraints.iter().filter_map(ConstraintNode::as_size)
    }

    /// Label for an enumerated value, if the type is an enumeration
    pub fn enum_label(&self, value: i64) -> Option<&str> {
        self.enum_values
            .as_ref()?
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.label.as_str())
    }

    /// Check `value` against the base kind and every declared restriction
    ///
    /// Surviving ranges (and sizes) are alternatives: one must admit the
    /// value. Every single-value set must contain it. Enumerations restrict
    /// to their declared values.
    ///
    /// # Errors
    ///
    /// `InvalidValue` if the value does not have the base kind's shape,
    /// `ConstraintViolation` naming the first restriction that rejects it.
    pub fn check(&self, value: &Value) -> Result<()> {
        if !value.fits(self.base_kind) {
            return Err(MibError::InvalidValue {
                type_name: self.name.clone(),
                reason: format!("{} is not a valid {}", value, self.base_kind),
            });
        }
        let violation = |constraint: String| MibError::ConstraintViolation {
            type_name: self.name.clone(),
            constraint,
            value: value.to_string(),
        };

        if let Some(n) = value.as_number() {
            if let Some(enums) = &self.enum_values {
                if !enums.iter().any(|e| i128::from(e.value) == n) {
                    return Err(violation("enumeration".to_string()));
                }
            }
            for c in &self.constraints {
                if let ConstraintNode::SingleValue { values } = c {
                    if !values.contains(&n) {
                        return Err(violation(c.to_string()));
                    }
                }
            }
            let mut ranges = self.ranges().peekable();
            if ranges.peek().is_some() && !ranges.any(|(min, max)| n >= min && n <= max) {
                return Err(violation(describe(self.constraints.iter().filter(|c| c.is_range()))));
            }
        }

        if let Some(len) = value.octet_len() {
            let len = len as i128;
            let mut sizes = self.sizes().peekable();
            if sizes.peek().is_some() && !sizes.any(|(min, max)| len >= min && len <= max) {
                return Err(violation(describe(self.constraints.iter().filter(|c| c.is_size()))));
            }
        }
        Ok(())
    }
}

fn describe<'a>(constraints: impl Iterator<Item = &'a ConstraintNode>) -> String {
    constraints
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}
