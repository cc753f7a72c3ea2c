//! Type registry
//!
//! Type nodes live in an arena and refer to their parent by name. `build()`
//! resolves every node once: it follows the parent chain to a primitive,
//! concatenates constraints root to leaf, canonicalizes them and stores the
//! result. After that the registry is read-only and can be shared freely.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::canonical::canonicalize;
use crate::errors::{MibError, Result};
use crate::model::{BaseKind, CanonicalTypeInfo, ConstraintNode, TypeNode, ValueSemantics};

/// Stable handle of a node in the builder's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

/// SMI names that are plain aliases of a primitive
const ALIASES: [(&str, BaseKind); 7] = [
    ("INTEGER", BaseKind::Integer32),
    ("Integer", BaseKind::Integer32),
    ("OCTET STRING", BaseKind::OctetString),
    ("OBJECT IDENTIFIER", BaseKind::ObjectIdentifier),
    ("Counter", BaseKind::Counter32),
    ("Gauge", BaseKind::Gauge32),
    ("NetworkAddress", BaseKind::IpAddress),
];

/// Textual conventions of SNMPv2-TC
fn standard_conventions() -> Vec<TypeNode> {
    let i32_max = i128::from(i32::MAX);
    vec![
        TypeNode::derived("DisplayString", "OctetString")
            .with_constraint(ConstraintNode::size(0, 255))
            .with_display_hint("255a"),
        TypeNode::derived("PhysAddress", "OctetString").with_display_hint("1x:"),
        TypeNode::derived("MacAddress", "OctetString")
            .with_constraint(ConstraintNode::size(6, 6))
            .with_display_hint("1x:"),
        TypeNode::derived("TruthValue", "Integer32").with_enums(&[("true", 1), ("false", 2)]),
        TypeNode::derived("TestAndIncr", "Integer32")
            .with_constraint(ConstraintNode::range(0, i32_max)),
        TypeNode::derived("AutonomousType", "ObjectIdentifier"),
        TypeNode::derived("InstancePointer", "ObjectIdentifier"),
        TypeNode::derived("VariablePointer", "ObjectIdentifier"),
        TypeNode::derived("RowPointer", "ObjectIdentifier"),
        TypeNode::derived("RowStatus", "Integer32").with_enums(&[
            ("active", 1),
            ("notInService", 2),
            ("notReady", 3),
            ("createAndGo", 4),
            ("createAndWait", 5),
            ("destroy", 6),
        ]),
        TypeNode::derived("TimeStamp", "TimeTicks"),
        TypeNode::derived("TimeInterval", "Integer32")
            .with_constraint(ConstraintNode::range(0, i32_max)),
        TypeNode::derived("DateAndTime", "OctetString")
            .with_constraint(ConstraintNode::size(8, 8))
            .with_constraint(ConstraintNode::size(11, 11))
            .with_display_hint("2d-1d-1d,1d:1d:1d.1d,1a1d:1d"),
        TypeNode::derived("StorageType", "Integer32").with_enums(&[
            ("other", 1),
            ("volatile", 2),
            ("nonVolatile", 3),
            ("permanent", 4),
            ("readOnly", 5),
        ]),
        TypeNode::derived("TDomain", "ObjectIdentifier"),
        TypeNode::derived("TAddress", "OctetString")
            .with_constraint(ConstraintNode::size(1, 255)),
    ]
}

/// Collects type nodes in any order, then resolves them all at once
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    nodes: Vec<TypeNode>,
    index: HashMap<String, TypeId>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitive nodes for every base kind plus the SMI aliases
    pub fn with_primitives(mut self) -> Self {
        for kind in BaseKind::ALL {
            self.insert_builtin(TypeNode::primitive(kind));
        }
        for (alias, kind) in ALIASES {
            self.insert_builtin(TypeNode::derived(alias, kind.name()));
        }
        self
    }

    /// The SNMPv2-TC textual conventions (`DisplayString`, `RowStatus`, ...)
    pub fn with_standard_conventions(mut self) -> Self {
        for node in standard_conventions() {
            self.insert_builtin(node);
        }
        self
    }

    /// Builder seeded with primitives and standard conventions
    pub fn standard() -> Self {
        Self::new().with_primitives().with_standard_conventions()
    }

    fn insert_builtin(&mut self, node: TypeNode) {
        if !self.index.contains_key(&node.name) {
            let id = TypeId(self.nodes.len());
            self.index.insert(node.name.clone(), id);
            self.nodes.push(node);
        }
    }

    /// Add one node; parents may be added later
    ///
    /// # Errors
    ///
    /// `DuplicateType` if a node with this name is already present.
    pub fn add(&mut self, node: TypeNode) -> Result<TypeId> {
        if self.index.contains_key(&node.name) {
            return Err(MibError::DuplicateType {
                type_name: node.name,
            });
        }
        let id = TypeId(self.nodes.len());
        self.index.insert(node.name.clone(), id);
        self.nodes.push(node);
        Ok(id)
    }

    /// # Errors
    ///
    /// `DuplicateType` on the first repeated name; earlier nodes stay added.
    pub fn extend<I: IntoIterator<Item = TypeNode>>(&mut self, nodes: I) -> Result<()> {
        for node in nodes {
            self.add(node)?;
        }
        Ok(())
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve every node
    ///
    /// Nodes whose chain is dangling or cyclic are recorded as failures and
    /// do not stop the others.
    pub fn build(self) -> TypeRegistry {
        let mut resolver = Resolver {
            nodes: &self.nodes,
            index: &self.index,
            done: vec![None; self.nodes.len()],
        };
        for id in 0..self.nodes.len() {
            resolver.resolve_from(TypeId(id));
        }

        let mut resolved = HashMap::new();
        let mut failures = BTreeMap::new();
        for (node, outcome) in self.nodes.iter().zip(resolver.done) {
            match outcome {
                Some(Ok(step)) => {
                    resolved.insert(node.name.clone(), step.info);
                }
                Some(Err(err)) => {
                    tracing::warn!(type_name = %node.name, error = %err, "type left unresolved");
                    failures.insert(node.name.clone(), err);
                }
                None => {
                    failures.insert(
                        node.name.clone(),
                        MibError::UnresolvedBaseType {
                            type_name: node.name.clone(),
                            reason: "resolution did not reach this node".to_string(),
                        },
                    );
                }
            }
        }
        tracing::debug!(
            resolved = resolved.len(),
            failed = failures.len(),
            "type registry built"
        );
        TypeRegistry { resolved, failures }
    }
}

/// Per-node resolution result; `raw` is the uncanonicalized accumulation
#[derive(Clone)]
struct Resolved {
    raw: Vec<ConstraintNode>,
    info: Arc<CanonicalTypeInfo>,
}

struct Resolver<'a> {
    nodes: &'a [TypeNode],
    index: &'a HashMap<String, TypeId>,
    done: Vec<Option<std::result::Result<Resolved, MibError>>>,
}

enum ChainEnd {
    /// Reached a node resolved by an earlier walk
    Resolved(TypeId),
    Primitive(BaseKind),
    Broken(String),
}

impl Resolver<'_> {
    fn resolve_from(&mut self, start: TypeId) {
        if self.done[start.0].is_some() {
            return;
        }

        // Walk up until something already known, a primitive or a break
        let mut chain: Vec<TypeId> = Vec::new();
        let mut on_path: HashSet<TypeId> = HashSet::new();
        let mut current = start;
        let end = loop {
            if self.done[current.0].is_some() {
                break ChainEnd::Resolved(current);
            }
            if !on_path.insert(current) {
                break ChainEnd::Broken(format!(
                    "inheritance cycle through {}",
                    self.nodes[current.0].name
                ));
            }
            chain.push(current);
            let node = &self.nodes[current.0];
            match &node.parent {
                None => match BaseKind::from_name(&node.name) {
                    Some(kind) => break ChainEnd::Primitive(kind),
                    None => {
                        break ChainEnd::Broken(format!(
                            "{} has no parent and is not a primitive",
                            node.name
                        ))
                    }
                },
                Some(parent) => match self.index.get(parent) {
                    Some(&pid) => current = pid,
                    None => break ChainEnd::Broken(format!("parent {} is not defined", parent)),
                },
            }
        };

        // Resolve downward, root-most node first
        let mut primitive = None;
        let mut above: Option<std::result::Result<Resolved, MibError>> = match end {
            ChainEnd::Resolved(id) => self.done[id.0].clone(),
            ChainEnd::Primitive(kind) => {
                primitive = Some(kind);
                None
            }
            ChainEnd::Broken(reason) => Some(Err(MibError::UnresolvedBaseType {
                type_name: String::new(),
                reason,
            })),
        };
        for id in chain.into_iter().rev() {
            let node = &self.nodes[id.0];
            let outcome = match (&above, primitive) {
                (None, Some(kind)) => Ok(self.finish(
                    node,
                    kind,
                    node.own_constraints.clone(),
                    Vec::new(),
                    None,
                )),
                (None, None) => Err(MibError::UnresolvedBaseType {
                    type_name: node.name.clone(),
                    reason: "chain ended without a primitive".to_string(),
                }),
                (Some(Ok(parent)), _) => Ok(self.resolve_child(node, parent)),
                (Some(Err(MibError::UnresolvedBaseType { reason, .. })), _) => {
                    Err(MibError::UnresolvedBaseType {
                        type_name: node.name.clone(),
                        reason: reason.clone(),
                    })
                }
                (Some(Err(other)), _) => Err(other.clone()),
            };
            self.done[id.0] = Some(outcome.clone());
            above = Some(outcome);
        }
    }

    fn resolve_child(&self, node: &TypeNode, parent: &Resolved) -> Resolved {
        let mut raw = parent.raw.clone();
        raw.extend(node.own_constraints.iter().cloned());
        self.finish(
            node,
            parent.info.base_kind,
            raw,
            parent.info.ancestry.clone(),
            Some(&parent.info),
        )
    }

    fn finish(
        &self,
        node: &TypeNode,
        base_kind: BaseKind,
        raw: Vec<ConstraintNode>,
        parent_ancestry: Vec<String>,
        parent: Option<&CanonicalTypeInfo>,
    ) -> Resolved {
        let mut enum_values = node
            .enum_values
            .clone()
            .or_else(|| parent.and_then(|p| p.enum_values.clone()));
        if let Some(values) = enum_values.as_mut() {
            values.sort_by_key(|e| e.value);
        }
        let display_hint = node
            .display_hint
            .clone()
            .or_else(|| parent.and_then(|p| p.display_hint.clone()));

        let mut ancestry = Vec::with_capacity(parent_ancestry.len() + 1);
        ancestry.push(node.name.clone());
        ancestry.extend(parent_ancestry);

        let constraints = canonicalize(base_kind, &raw, enum_values.is_some());
        let semantics = ValueSemantics::from_ancestry(&ancestry);
        Resolved {
            raw,
            info: Arc::new(CanonicalTypeInfo {
                name: node.name.clone(),
                base_kind,
                constraints,
                enum_values,
                display_hint,
                ancestry,
                semantics,
            }),
        }
    }
}

/// Immutable, fully resolved set of types
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    resolved: HashMap<String, Arc<CanonicalTypeInfo>>,
    failures: BTreeMap<String, MibError>,
}

impl TypeRegistry {
    /// Canonical description of `name`
    ///
    /// # Errors
    ///
    /// `UnresolvedBaseType` if the type is unknown or its chain never
    /// reaches a primitive.
    pub fn resolve(&self, name: &str) -> Result<Arc<CanonicalTypeInfo>> {
        if let Some(info) = self.resolved.get(name) {
            return Ok(Arc::clone(info));
        }
        Err(self
            .failures
            .get(name)
            .cloned()
            .unwrap_or_else(|| MibError::UnresolvedBaseType {
                type_name: name.to_string(),
                reason: "type is not defined".to_string(),
            }))
    }

    /// Types that failed to resolve, by name
    pub fn failures(&self) -> &BTreeMap<String, MibError> {
        &self.failures
    }

    /// Names of every resolved type, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resolved.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
