//! Transactional write engine
//!
//! A write request is a batch of varbinds. The default path is atomic:
//! every varbind is validated against committed state with no intermediate
//! mutation, then the whole batch is pushed to the protocol engine. If the
//! engine refuses any change, the changes already pushed are undone.
//!
//! TestAndIncr and RowStatus objects only validate against an instance that
//! already exists. When a batch fails for that reason alone (a spinlock in
//! the row being created, or a second write to such an object), the batch is
//! retried one varbind at a time in request order. A row-creating status
//! write carries the plain columns of its row into its own step. Each step
//! is atomic; the batch as a whole is not, and the outcome says so.
//!
//! Any other path written twice in one batch keeps its last value.
//!
//! ## Logging Ownership
//!
//! `apply` owns the `write_apply` lifecycle events. Fallbacks and lost
//! change notifications are `warn!` detail events.

use chrono::Utc;
use mibtc_core::config::WriteConfig;
use mibtc_core::errors::{ExError, MibError};
use mibtc_core::model::Target;
use mibtc_core::row_status::transition;
use mibtc_core::{
    log_op_end, log_op_error, log_op_start, ObjectEntry, ObjectSpace, Oid, RowState, RowStatus,
    TableDef, Value, ValueSemantics,
};
use mibtc_core_types::RequestContext;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::engine::{Handle, ProtocolEngine, RepresentationKind};
use crate::errors::WriteFailure;
use crate::instances::{InstanceStore, RowKey, RowRecord};
use crate::locks::{self, LockKey, PathLocks};
use crate::registration::index_value;
use crate::sink::{ChangeNotification, ChangeSink};

/// One `(instance path, value)` pair of a request
#[derive(Debug, Clone, PartialEq)]
pub struct Varbind {
    pub path: Oid,
    pub value: Value,
}

impl Varbind {
    pub fn new(path: Oid, value: Value) -> Self {
        Self { path, value }
    }
}

/// How a successful request was committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WriteMode {
    Atomic,
    /// One varbind at a time; earlier steps stay committed if a later one fails
    Sequential,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub mode: WriteMode,
    /// Instance paths whose value changed, in commit order
    pub changes: Vec<Oid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub sequential_fallback: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sequential_fallback: true,
        }
    }
}

impl From<&WriteConfig> for WriteOptions {
    fn from(config: &WriteConfig) -> Self {
        Self {
            sequential_fallback: config.sequential_fallback,
        }
    }
}

/// A change to push to the protocol engine
#[derive(Debug)]
enum Op {
    Instantiate {
        path: Oid,
        representation: RepresentationKind,
        value: Value,
    },
    Update {
        path: Oid,
        handle: Handle,
        old: Value,
        value: Value,
    },
    Remove {
        path: Oid,
        handle: Handle,
        representation: RepresentationKind,
        old: Value,
    },
}

impl Op {
    fn path(&self) -> &Oid {
        match self {
            Op::Instantiate { path, .. } | Op::Update { path, .. } | Op::Remove { path, .. } => {
                path
            }
        }
    }
}

/// Inverse of an applied `Op`
enum Undo {
    Drop(Handle),
    Restore(Handle, Value),
    Reinstate {
        path: Oid,
        representation: RepresentationKind,
        value: Value,
    },
}

/// Everything a validated request will change
#[derive(Debug, Default)]
struct Plan {
    ops: Vec<Op>,
    /// `None` removes the row
    rows: Vec<(RowKey, Option<RowRecord>)>,
}

#[derive(Debug)]
enum PlanError {
    Hard(WriteFailure),
    /// Valid only once an instance the batch itself creates exists
    NeedsPriorInstance(Oid),
}

impl From<WriteFailure> for PlanError {
    fn from(err: WriteFailure) -> Self {
        PlanError::Hard(err)
    }
}

/// Varbinds of one request that address the same row
struct RowDraft<'s> {
    table: &'s TableDef,
    index: Vec<u32>,
    status: Option<(Oid, RowStatus)>,
    values: BTreeMap<u32, (Oid, &'s ObjectEntry, Value)>,
}

pub struct WriteEngine {
    space: Arc<ObjectSpace>,
    store: RwLock<InstanceStore>,
    locks: PathLocks,
    engine: Arc<dyn ProtocolEngine>,
    sink: Arc<dyn ChangeSink>,
    options: WriteOptions,
}

impl WriteEngine {
    /// `store` holds the instances registration created in `engine`
    pub fn new(
        space: Arc<ObjectSpace>,
        store: InstanceStore,
        engine: Arc<dyn ProtocolEngine>,
        sink: Arc<dyn ChangeSink>,
        options: WriteOptions,
    ) -> Self {
        Self {
            space,
            store: RwLock::new(store),
            locks: PathLocks::new(),
            engine,
            sink,
            options,
        }
    }

    /// Validate and commit a batch of varbinds
    ///
    /// # Errors
    ///
    /// The first `WriteFailure` found. Nothing is committed unless the
    /// failure is `SequentialAborted`.
    pub fn apply(
        &self,
        varbinds: &[Varbind],
        ctx: &RequestContext,
    ) -> Result<WriteOutcome, WriteFailure> {
        log_op_start!(
            "write_apply",
            request_id = ctx.request_id.as_str(),
            varbinds = varbinds.len()
        );
        let start = Instant::now();

        let outcome = self.apply_locked(varbinds, ctx).map_err(|e| {
            log_op_error!(
                "write_apply",
                ExError::from(e.clone()).with_request_id(ctx.request_id.clone()),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str()
            );
            e
        })?;

        log_op_end!(
            "write_apply",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = ctx.request_id.as_str(),
            write_mode = ?outcome.mode,
            changes = outcome.changes.len()
        );
        Ok(outcome)
    }

    /// Committed value of an instance; dynamic objects are sampled
    pub fn read(&self, path: &Oid) -> Option<Value> {
        let store = self.read_store();
        let value = store.value(path)?;
        let provider = self
            .space
            .locate(path)
            .and_then(|(target, _)| target.entry().dynamic_provider.clone());
        Some(provider.map_or_else(|| value.clone(), |p| p.sample()))
    }

    /// State of a row; `NonExistent` for unknown tables too
    pub fn row_state(&self, table: &str, index: &[u32]) -> RowState {
        self.space.table(table).map_or(RowState::NonExistent, |t| {
            self.read_store().row_state(&RowKey::new(t, index))
        })
    }

    /// Copy of the committed state
    pub fn snapshot(&self) -> InstanceStore {
        self.read_store().clone()
    }

    pub fn space(&self) -> &ObjectSpace {
        &self.space
    }

    /// Lock entries held for requests in flight
    pub fn lock_entries(&self) -> usize {
        self.locks.len()
    }

    fn apply_locked(
        &self,
        varbinds: &[Varbind],
        ctx: &RequestContext,
    ) -> Result<WriteOutcome, WriteFailure> {
        let keys: BTreeSet<LockKey> = varbinds
            .iter()
            .filter_map(|vb| self.lock_key(&vb.path))
            .collect();
        let handles = self.locks.handles(&keys);
        let result = {
            let _guards = locks::acquire(&handles);
            self.apply_held(varbinds, ctx)
        };
        drop(handles);
        self.locks.release(&keys);
        result
    }

    /// `apply` once every row and scalar lock of the batch is held
    fn apply_held(
        &self,
        varbinds: &[Varbind],
        ctx: &RequestContext,
    ) -> Result<WriteOutcome, WriteFailure> {
        let planned = {
            let store = self.read_store();
            self.plan(&store, varbinds)
        };
        match planned {
            Ok(plan) => Ok(WriteOutcome {
                mode: WriteMode::Atomic,
                changes: self.commit(plan)?,
            }),
            Err(PlanError::Hard(failure)) => Err(failure),
            Err(PlanError::NeedsPriorInstance(path)) if !self.options.sequential_fallback => {
                Err(WriteFailure::MissingInstance { path })
            }
            Err(PlanError::NeedsPriorInstance(path)) => {
                tracing::warn!(
                    request_id = ctx.request_id.as_str(),
                    %path,
                    "batch needs an instance it creates itself; committing varbinds one at a time"
                );
                self.apply_sequential(varbinds)
            }
        }
    }

    fn apply_sequential(&self, varbinds: &[Varbind]) -> Result<WriteOutcome, WriteFailure> {
        let mut committed = Vec::new();
        let mut changes = Vec::new();
        for step in self.sequential_steps(varbinds) {
            let planned = {
                let store = self.read_store();
                self.plan(&store, &step)
            };
            let outcome = planned
                .map_err(|e| match e {
                    PlanError::Hard(failure) => failure,
                    PlanError::NeedsPriorInstance(path) => WriteFailure::MissingInstance { path },
                })
                .and_then(|plan| self.commit(plan));
            match outcome {
                Ok(paths) => {
                    changes.extend(paths);
                    committed.extend(step.into_iter().map(|vb| vb.path));
                }
                Err(cause) => {
                    return Err(WriteFailure::SequentialAborted {
                        committed,
                        cause: Box::new(cause),
                    })
                }
            }
        }
        Ok(WriteOutcome {
            mode: WriteMode::Sequential,
            changes,
        })
    }

    /// Split a batch into the steps of the sequential fallback
    ///
    /// Each varbind is its own step, except that a row-creating status write
    /// takes along the plain columns the batch sets in the same row, so a
    /// createAndGo sees the mandatory values it needs. Test-and-increment
    /// columns stay behind for a later step, once the row exists.
    fn sequential_steps(&self, varbinds: &[Varbind]) -> Vec<Vec<Varbind>> {
        let mut taken = vec![false; varbinds.len()];
        let mut steps = Vec::new();
        for (i, vb) in varbinds.iter().enumerate() {
            if taken[i] {
                continue;
            }
            let mut step = vec![vb.clone()];
            if let Some(row) = self.created_row(vb) {
                for (j, other) in varbinds.iter().enumerate().skip(i + 1) {
                    if !taken[j] && self.plain_column_of(other, &row) {
                        taken[j] = true;
                        step.push(other.clone());
                    }
                }
            }
            steps.push(step);
        }
        steps
    }

    /// The row a createAndGo or createAndWait varbind asks for
    fn created_row(&self, vb: &Varbind) -> Option<RowKey> {
        let (target, index) = self.space.locate(&vb.path)?;
        let Target::Column { table, column } = target else {
            return None;
        };
        let requested = vb
            .value
            .as_number()
            .and_then(|n| i64::try_from(n).ok())
            .and_then(RowStatus::from_value)?;
        (column.semantics() == ValueSemantics::RowStatus && requested.is_create())
            .then(|| RowKey::new(table, &index))
    }

    fn plain_column_of(&self, vb: &Varbind, row: &RowKey) -> bool {
        match self.space.locate(&vb.path) {
            Some((Target::Column { table, column }, index)) => {
                !depends_on_current(column) && RowKey::new(table, &index) == *row
            }
            _ => false,
        }
    }

    fn lock_key(&self, path: &Oid) -> Option<LockKey> {
        self.space.locate(path).map(|(target, index)| match target {
            Target::Scalar(_) => LockKey::Scalar(path.clone()),
            Target::Column { table, .. } => LockKey::Row(RowKey::new(table, &index)),
        })
    }

    // ---- validation ----

    fn plan(&self, store: &InstanceStore, varbinds: &[Varbind]) -> Result<Plan, PlanError> {
        let mut plan = Plan::default();
        let mut deferred: Option<Oid> = None;
        let mut seen = HashSet::new();
        let mut drafts: BTreeMap<RowKey, RowDraft<'_>> = BTreeMap::new();
        let last: HashMap<&Oid, usize> = varbinds
            .iter()
            .enumerate()
            .map(|(i, vb)| (&vb.path, i))
            .collect();

        for (i, vb) in varbinds.iter().enumerate() {
            let (target, index) =
                self.space
                    .locate(&vb.path)
                    .ok_or_else(|| WriteFailure::NoSuchObject {
                        path: vb.path.clone(),
                    })?;
            let entry = target.entry();
            if !entry.access.is_writable() {
                return Err(WriteFailure::NotWritable {
                    path: vb.path.clone(),
                }
                .into());
            }
            entry
                .type_info
                .check(&vb.value)
                .map_err(|e| violation(&vb.path, entry, e))?;
            if depends_on_current(entry) {
                // validates against the batch's own earlier write
                if !seen.insert(vb.path.clone()) {
                    deferred.get_or_insert_with(|| vb.path.clone());
                    continue;
                }
            } else if last.get(&vb.path) != Some(&i) {
                // superseded by a later write to the same path
                continue;
            }

            match target {
                Target::Scalar(scalar) => plan_scalar(store, vb, scalar, &mut plan)?,
                Target::Column { table, column } => {
                    let draft = drafts
                        .entry(RowKey::new(table, &index))
                        .or_insert_with(|| RowDraft {
                            table,
                            index: index.clone(),
                            status: None,
                            values: BTreeMap::new(),
                        });
                    if column.semantics() == ValueSemantics::RowStatus {
                        let requested = vb
                            .value
                            .as_number()
                            .and_then(|n| i64::try_from(n).ok())
                            .and_then(RowStatus::from_value)
                            .ok_or_else(|| WriteFailure::ConstraintViolation {
                                path: vb.path.clone(),
                                column: column.name.clone(),
                                constraint: "enumeration".to_string(),
                            })?;
                        draft.status = Some((vb.path.clone(), requested));
                    } else {
                        draft.values.insert(
                            TableDef::column_arc(column),
                            (vb.path.clone(), column, vb.value.clone()),
                        );
                    }
                }
            }
        }

        for (key, draft) in drafts {
            match plan_row(store, key, draft, &mut plan) {
                Ok(()) => {}
                Err(PlanError::NeedsPriorInstance(path)) => {
                    deferred.get_or_insert(path);
                }
                Err(hard) => return Err(hard),
            }
        }

        match deferred {
            Some(path) => Err(PlanError::NeedsPriorInstance(path)),
            None => Ok(plan),
        }
    }

    // ---- commit ----

    /// Push `plan` to the engine, then to the store; notify the sink
    fn commit(&self, plan: Plan) -> Result<Vec<Oid>, WriteFailure> {
        let changes = {
            let mut store = self.write_store();
            self.commit_locked(&mut store, plan)?
        };
        for change in &changes {
            if let Err(err) = self.sink.record(change) {
                tracing::warn!(path = %change.path, error = %err, "change notification lost");
            }
        }
        Ok(changes.into_iter().map(|c| c.path).collect())
    }

    fn commit_locked(
        &self,
        store: &mut InstanceStore,
        plan: Plan,
    ) -> Result<Vec<ChangeNotification>, WriteFailure> {
        let mut undo = Vec::with_capacity(plan.ops.len());
        let mut created = Vec::with_capacity(plan.ops.len());
        for op in &plan.ops {
            let result = match op {
                Op::Instantiate {
                    path,
                    representation,
                    value,
                } => self
                    .engine
                    .instantiate(path, *representation, value)
                    .map(|handle| {
                        undo.push(Undo::Drop(handle));
                        Some(handle)
                    }),
                Op::Update {
                    handle, old, value, ..
                } => self.engine.update(*handle, value).map(|()| {
                    undo.push(Undo::Restore(*handle, old.clone()));
                    None
                }),
                Op::Remove {
                    path,
                    handle,
                    representation,
                    old,
                } => self.engine.remove(*handle).map(|()| {
                    undo.push(Undo::Reinstate {
                        path: path.clone(),
                        representation: *representation,
                        value: old.clone(),
                    });
                    None
                }),
            };
            match result {
                Ok(handle) => created.push(handle),
                Err(err) => {
                    self.rollback(store, undo);
                    return Err(WriteFailure::EngineRejected {
                        path: op.path().clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let at = Utc::now();
        let mut changes = Vec::with_capacity(plan.ops.len());
        for (op, handle) in plan.ops.into_iter().zip(created) {
            let (path, value) = match op {
                Op::Instantiate { path, value, .. } => {
                    if let Some(handle) = handle {
                        store.insert(path.clone(), handle, value.clone());
                    }
                    (path, Some(value))
                }
                Op::Update { path, value, .. } => {
                    store.set_value(&path, value.clone());
                    (path, Some(value))
                }
                Op::Remove { path, .. } => {
                    store.remove(&path);
                    (path, None)
                }
            };
            changes.push(ChangeNotification { path, value, at });
        }
        for (key, row) in plan.rows {
            match row {
                Some(record) => store.set_row(key, record),
                None => {
                    store.remove_row(&key);
                }
            }
        }
        Ok(changes)
    }

    fn rollback(&self, store: &mut InstanceStore, undo: Vec<Undo>) {
        for step in undo.into_iter().rev() {
            let result = match step {
                Undo::Drop(handle) => self.engine.remove(handle),
                Undo::Restore(handle, value) => self.engine.update(handle, &value),
                Undo::Reinstate {
                    path,
                    representation,
                    value,
                } => self
                    .engine
                    .instantiate(&path, representation, &value)
                    .map(|handle| store.rebind(&path, handle)),
            };
            if let Err(err) = result {
                tracing::warn!(error = %err, "rollback step failed");
            }
        }
    }

    fn read_store(&self) -> RwLockReadGuard<'_, InstanceStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, InstanceStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn plan_scalar(
    store: &InstanceStore,
    vb: &Varbind,
    entry: &ObjectEntry,
    plan: &mut Plan,
) -> Result<(), PlanError> {
    if store.get(&vb.path).is_none() {
        return Err(WriteFailure::NoSuchObject {
            path: vb.path.clone(),
        }
        .into());
    }
    let value = if entry.semantics() == ValueSemantics::TestAndIncr {
        advance_spinlock(store, &vb.path, entry, &vb.value)?
    } else {
        vb.value.clone()
    };
    set_op(store, &vb.path, entry, value, &mut plan.ops);
    Ok(())
}

fn plan_row(
    store: &InstanceStore,
    key: RowKey,
    draft: RowDraft<'_>,
    plan: &mut Plan,
) -> Result<(), PlanError> {
    let RowDraft {
        table,
        index,
        status,
        values,
    } = draft;
    let record = store.row(&key).cloned();
    let state = record.as_ref().map_or(RowState::NonExistent, |r| r.state);
    let denied = |path: &Oid, requested: RowStatus| WriteFailure::IllegalTransition {
        path: path.clone(),
        from: state,
        requested,
    };

    if let Some((_, RowStatus::Destroy)) = &status {
        if state.exists() {
            for column in &table.columns {
                let path = column.path.join(&index);
                if let Some(instance) = store.get(&path) {
                    plan.ops.push(Op::Remove {
                        path,
                        handle: instance.handle,
                        representation: column.type_info.base_kind.into(),
                        old: instance.value.clone(),
                    });
                }
            }
            plan.rows.push((key, None));
        }
        return Ok(());
    }

    let Some(record) = record else {
        return match status {
            Some((path, requested)) if requested.is_create() => {
                plan_create(table, &index, key, &path, requested, &values, plan)
            }
            Some((path, requested)) => Err(denied(&path, requested).into()),
            None => {
                let path = values
                    .values()
                    .next()
                    .map_or_else(|| key.entry.clone(), |(path, _, _)| path.clone());
                Err(WriteFailure::MissingInstance { path }.into())
            }
        };
    };

    let provided: BTreeSet<u32> = values.keys().copied().collect();
    let missing: BTreeSet<u32> = record.missing.difference(&provided).copied().collect();
    let complete = missing.is_empty();
    let next = match &status {
        Some((path, requested)) => {
            transition(state, *requested, complete).map_err(|_| denied(path, *requested))?
        }
        None if state == RowState::NotReady && complete => RowState::NotInService,
        None => state,
    };

    for (path, column, value) in values.into_values() {
        let value = if column.semantics() == ValueSemantics::TestAndIncr {
            advance_spinlock(store, &path, column, &value)?
        } else {
            value
        };
        set_op(store, &path, column, value, &mut plan.ops);
    }
    if let (Some(column), Some(reported)) = (table.status_column(), next.reported()) {
        let path = column.path.join(&index);
        set_op(store, &path, column, Value::Integer(reported.value()), &mut plan.ops);
    }
    plan.rows.push((
        key,
        Some(RowRecord {
            state: next,
            missing,
        }),
    ));
    Ok(())
}

/// Instantiate every column of a new row
///
/// Index columns take their value from the index arcs. Mandatory columns
/// the request leaves out stay uninstantiated and keep the row `notReady`.
fn plan_create(
    table: &TableDef,
    index: &[u32],
    key: RowKey,
    status_path: &Oid,
    requested: RowStatus,
    values: &BTreeMap<u32, (Oid, &ObjectEntry, Value)>,
    plan: &mut Plan,
) -> Result<(), PlanError> {
    if let Some((path, _, _)) = values
        .values()
        .find(|(_, column, _)| column.semantics() == ValueSemantics::TestAndIncr)
    {
        return Err(PlanError::NeedsPriorInstance(path.clone()));
    }

    let complete = table
        .mandatory_columns()
        .all(|c| values.contains_key(&TableDef::column_arc(c)));
    let next = transition(RowState::NonExistent, requested, complete).map_err(|_| {
        WriteFailure::IllegalTransition {
            path: status_path.clone(),
            from: RowState::NonExistent,
            requested,
        }
    })?;

    let status_arc = table.status_column().map(TableDef::column_arc);
    let mut missing = BTreeSet::new();
    for column in &table.columns {
        let arc = TableDef::column_arc(column);
        let path = column.path.join(index);
        let value = if let Some(position) = table.index_columns.iter().position(|a| *a == arc) {
            if !column.type_info.base_kind.is_numeric() {
                continue;
            }
            index_value(column, index[position]).ok_or_else(|| {
                WriteFailure::ConstraintViolation {
                    path: path.clone(),
                    column: column.name.clone(),
                    constraint: format!("row index {}", index[position]),
                }
            })?
        } else if Some(arc) == status_arc {
            match next.reported() {
                Some(reported) => Value::Integer(reported.value()),
                None => continue,
            }
        } else if let Some((_, _, value)) = values.get(&arc) {
            value.clone()
        } else if column.mandatory {
            missing.insert(arc);
            continue;
        } else {
            column.current_initial()
        };
        plan.ops.push(Op::Instantiate {
            path,
            representation: column.type_info.base_kind.into(),
            value,
        });
    }
    plan.rows.push((
        key,
        Some(RowRecord {
            state: next,
            missing,
        }),
    ));
    Ok(())
}

/// Update, instantiate, or nothing if the value is unchanged
fn set_op(store: &InstanceStore, path: &Oid, entry: &ObjectEntry, value: Value, ops: &mut Vec<Op>) {
    match store.get(path) {
        Some(instance) if instance.value == value => {}
        Some(instance) => ops.push(Op::Update {
            path: path.clone(),
            handle: instance.handle,
            old: instance.value.clone(),
            value,
        }),
        None => ops.push(Op::Instantiate {
            path: path.clone(),
            representation: entry.type_info.base_kind.into(),
            value,
        }),
    }
}

/// A TestAndIncr write must offer the current value; it stores the next one
fn advance_spinlock(
    store: &InstanceStore,
    path: &Oid,
    entry: &ObjectEntry,
    offered: &Value,
) -> Result<Value, WriteFailure> {
    let current = store
        .value(path)
        .ok_or_else(|| WriteFailure::MissingInstance { path: path.clone() })?;
    if current != offered {
        return Err(WriteFailure::ConstraintViolation {
            path: path.clone(),
            column: entry.name.clone(),
            constraint: format!("spinlock value {}", current),
        });
    }
    Ok(next_spinlock(current))
}

/// Whether a write is checked against the instance's current value
fn depends_on_current(entry: &ObjectEntry) -> bool {
    matches!(entry.semantics(), ValueSemantics::TestAndIncr | ValueSemantics::RowStatus)
}

fn next_spinlock(current: &Value) -> Value {
    match current {
        Value::Integer(n) if *n >= i64::from(i32::MAX) => Value::Integer(0),
        Value::Integer(n) => Value::Integer(n + 1),
        other => other.clone(),
    }
}

fn violation(path: &Oid, entry: &ObjectEntry, err: MibError) -> WriteFailure {
    let constraint = match err {
        MibError::ConstraintViolation { constraint, .. } => constraint,
        other => other.to_string(),
    };
    WriteFailure::ConstraintViolation {
        path: path.clone(),
        column: entry.name.clone(),
        constraint,
    }
}
