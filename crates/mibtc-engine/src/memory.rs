//! In-process reference engine
//!
//! Holds a symbol table of loaded definitions and a map of live instances.
//! It enforces the same instantiation rules a real agent framework does:
//! scalars are instantiated only as `<symbol>.0`, columns only with a
//! non-empty index, and the value model must match the definition.

use mibtc_core::{ObjectSpace, Oid, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::engine::{Handle, ProtocolEngine, RepresentationKind};
use crate::errors::EngineError;

/// Position a definition occupies in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Scalar,
    Column,
}

#[derive(Debug, Clone, Copy)]
struct Symbol {
    kind: SymbolKind,
    representation: RepresentationKind,
}

#[derive(Debug)]
struct LiveInstance {
    path: Oid,
    value: Value,
}

#[derive(Debug, Default)]
struct State {
    symbols: BTreeMap<Oid, Symbol>,
    instances: HashMap<Handle, LiveInstance>,
    by_path: BTreeMap<Oid, Handle>,
    frozen: Vec<Oid>,
    next_handle: u64,
}

impl State {
    fn is_frozen(&self, path: &Oid) -> bool {
        self.frozen.iter().any(|prefix| prefix.is_prefix_of(path))
    }

    fn check_frozen(&self, path: &Oid) -> Result<(), EngineError> {
        if self.is_frozen(path) {
            return Err(EngineError::Rejected {
                path: Some(path.clone()),
                detail: "instance is frozen".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEngine {
    state: Mutex<State>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a definition for every scalar and column of `space`
    pub fn from_object_space(space: &ObjectSpace) -> Self {
        let engine = Self::new();
        for scalar in &space.scalars {
            engine.define(
                scalar.path.clone(),
                SymbolKind::Scalar,
                scalar.type_info.base_kind.into(),
            );
        }
        for column in space.tables.iter().flat_map(|t| &t.columns) {
            engine.define(
                column.path.clone(),
                SymbolKind::Column,
                column.type_info.base_kind.into(),
            );
        }
        engine
    }

    /// Load (or replace) the definition at `path`
    pub fn define(&self, path: Oid, kind: SymbolKind, representation: RepresentationKind) {
        self.lock().symbols.insert(
            path,
            Symbol {
                kind,
                representation,
            },
        );
    }

    /// Unload the definition at `path`
    pub fn forget(&self, path: &Oid) {
        self.lock().symbols.remove(path);
    }

    /// Refuse every change to instances under `prefix` from now on
    pub fn freeze(&self, prefix: Oid) {
        self.lock().frozen.push(prefix);
    }

    pub fn value(&self, path: &Oid) -> Option<Value> {
        let state = self.lock();
        let handle = state.by_path.get(path)?;
        state.instances.get(handle).map(|i| i.value.clone())
    }

    pub fn instance_count(&self) -> usize {
        self.lock().instances.len()
    }

    /// Paths of every live instance, in tree order
    pub fn instance_paths(&self) -> Vec<Oid> {
        self.lock().by_path.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProtocolEngine for InMemoryEngine {
    fn instantiate(
        &self,
        path: &Oid,
        representation: RepresentationKind,
        initial: &Value,
    ) -> Result<Handle, EngineError> {
        let mut state = self.lock();
        let (symbol_path, symbol) = state
            .symbols
            .iter()
            .filter(|(p, _)| p.is_prefix_of(path))
            .max_by_key(|(p, _)| p.len())
            .map(|(p, s)| (p.clone(), *s))
            .ok_or_else(|| EngineError::UnknownSymbol {
                path: path.clone(),
                detail: "no definition loaded for this subtree".to_string(),
            })?;

        let mismatch = |detail: String| EngineError::InstanceModelMismatch {
            path: path.clone(),
            detail,
        };
        let suffix = symbol_path.suffix_of(path).unwrap_or_default();
        match symbol.kind {
            SymbolKind::Scalar if suffix != [0] => {
                return Err(mismatch(format!(
                    "{} is a scalar; its only instance is {}.0",
                    symbol_path, symbol_path
                )));
            }
            SymbolKind::Column if suffix.is_empty() => {
                return Err(mismatch(format!("{} is a column; an index is required", symbol_path)));
            }
            _ => {}
        }
        if symbol.representation != representation {
            return Err(mismatch(format!(
                "{} holds {} values, not {}",
                symbol_path, symbol.representation, representation
            )));
        }
        if !representation.accepts(initial) {
            return Err(mismatch(format!("{} cannot hold {}", representation, initial)));
        }
        state.check_frozen(path)?;
        if state.by_path.contains_key(path) {
            return Err(EngineError::Rejected {
                path: Some(path.clone()),
                detail: "instance already exists".to_string(),
            });
        }

        let handle = Handle(state.next_handle);
        state.next_handle += 1;
        state.by_path.insert(path.clone(), handle);
        state.instances.insert(
            handle,
            LiveInstance {
                path: path.clone(),
                value: initial.clone(),
            },
        );
        tracing::trace!(%path, ?handle, "instance created");
        Ok(handle)
    }

    fn update(&self, handle: Handle, value: &Value) -> Result<(), EngineError> {
        let mut state = self.lock();
        let path = state
            .instances
            .get(&handle)
            .map(|i| i.path.clone())
            .ok_or(EngineError::UnknownHandle(handle))?;
        state.check_frozen(&path)?;
        if let Some(instance) = state.instances.get_mut(&handle) {
            instance.value = value.clone();
        }
        Ok(())
    }

    fn remove(&self, handle: Handle) -> Result<(), EngineError> {
        let mut state = self.lock();
        let path = state
            .instances
            .get(&handle)
            .map(|i| i.path.clone())
            .ok_or(EngineError::UnknownHandle(handle))?;
        state.check_frozen(&path)?;
        state.instances.remove(&handle);
        state.by_path.remove(&path);
        Ok(())
    }
}
