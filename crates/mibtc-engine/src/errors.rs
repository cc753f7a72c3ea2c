//! Errors of the registration layer and the write engine
//!
//! Each enum converts into the canonical [`ExError`] so callers can match on
//! a stable `ERR_*` code regardless of which layer failed.

use mibtc_core::errors::{ExError, ExErrorKind};
use mibtc_core::{Oid, RowState, RowStatus};
use thiserror::Error;

use crate::engine::{Handle, RepresentationKind};

pub type Result<T> = std::result::Result<T, ExError>;

/// What the protocol engine reports back
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No loaded definition covers the path
    #[error("No symbol covers {path}: {detail}")]
    UnknownSymbol { path: Oid, detail: String },

    /// The definition exists but cannot hold this instance
    #[error("Instance {path} does not match its definition: {detail}")]
    InstanceModelMismatch { path: Oid, detail: String },

    #[error("Engine rejected the change: {detail}")]
    Rejected { path: Option<Oid>, detail: String },

    #[error("Unknown instance handle {0:?}")]
    UnknownHandle(Handle),
}

/// Why an object (or a whole table) was not registered
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationFailure {
    #[error("Missing symbol for {path}: {detail}")]
    MissingSymbol { path: Oid, detail: String },

    #[error("Engine cannot hold a {representation} instance at {path}: {detail}")]
    ValueModelIncompatible {
        path: Oid,
        representation: RepresentationKind,
        detail: String,
    },

    /// An index column could not be instantiated; the table is skipped
    #[error("Table {table} skipped, index column {column} unavailable: {cause}")]
    TableIndexUnavailable {
        table: String,
        column: Oid,
        cause: String,
    },
}

impl RegistrationFailure {
    /// Classify an engine error raised while instantiating `path`
    pub fn from_engine(path: Oid, representation: RepresentationKind, err: EngineError) -> Self {
        match err {
            EngineError::UnknownSymbol { detail, .. } => {
                RegistrationFailure::MissingSymbol { path, detail }
            }
            other => RegistrationFailure::ValueModelIncompatible {
                path,
                representation,
                detail: other.to_string(),
            },
        }
    }

    pub fn path(&self) -> &Oid {
        match self {
            RegistrationFailure::MissingSymbol { path, .. }
            | RegistrationFailure::ValueModelIncompatible { path, .. } => path,
            RegistrationFailure::TableIndexUnavailable { column, .. } => column,
        }
    }
}

/// Why a write request was refused
///
/// Nothing was committed unless the variant is `SequentialAborted`, which
/// lists the varbinds that were.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriteFailure {
    #[error("No such object {path}")]
    NoSuchObject { path: Oid },

    #[error("Object {path} is not writable")]
    NotWritable { path: Oid },

    #[error("{column} ({path}) rejects the value: {constraint}")]
    ConstraintViolation {
        path: Oid,
        column: String,
        constraint: String,
    },

    #[error("Row of {path} in state {from} cannot accept {requested}")]
    IllegalTransition {
        path: Oid,
        from: RowState,
        requested: RowStatus,
    },

    /// The value validates only against an instance that does not exist
    #[error("No instance at {path}")]
    MissingInstance { path: Oid },

    #[error("Engine rejected the change at {path}: {reason}")]
    EngineRejected { path: Oid, reason: String },

    #[error("Sequential write stopped after {} committed varbinds: {cause}", .committed.len())]
    SequentialAborted {
        committed: Vec<Oid>,
        cause: Box<WriteFailure>,
    },
}

impl WriteFailure {
    /// Path of the varbind that triggered the failure
    pub fn path(&self) -> &Oid {
        match self {
            WriteFailure::NoSuchObject { path }
            | WriteFailure::NotWritable { path }
            | WriteFailure::ConstraintViolation { path, .. }
            | WriteFailure::IllegalTransition { path, .. }
            | WriteFailure::MissingInstance { path }
            | WriteFailure::EngineRejected { path, .. } => path,
            WriteFailure::SequentialAborted { cause, .. } => cause.path(),
        }
    }

    fn kind(&self) -> ExErrorKind {
        match self {
            WriteFailure::NoSuchObject { .. } => ExErrorKind::NoSuchObject,
            WriteFailure::NotWritable { .. } => ExErrorKind::NotWritable,
            WriteFailure::ConstraintViolation { .. } => ExErrorKind::ConstraintViolation,
            WriteFailure::IllegalTransition { .. } => ExErrorKind::IllegalTransition,
            WriteFailure::MissingInstance { .. } => ExErrorKind::MissingInstance,
            WriteFailure::EngineRejected { .. } => ExErrorKind::EngineRejected,
            WriteFailure::SequentialAborted { .. } => ExErrorKind::SequentialAborted,
        }
    }
}

impl From<WriteFailure> for ExError {
    fn from(err: WriteFailure) -> Self {
        let ex = ExError::new(err.kind())
            .with_op("write_apply")
            .with_path(err.path().to_string())
            .with_message(err.to_string());
        match err {
            WriteFailure::ConstraintViolation { column, .. } => ex.with_entity_id(column),
            WriteFailure::SequentialAborted { cause, .. } => ex.with_source(ExError::from(*cause)),
            _ => ex,
        }
    }
}

impl From<RegistrationFailure> for ExError {
    fn from(err: RegistrationFailure) -> Self {
        let kind = match &err {
            RegistrationFailure::MissingSymbol { .. } => ExErrorKind::MissingSymbol,
            RegistrationFailure::ValueModelIncompatible { .. } => {
                ExErrorKind::ValueModelIncompatible
            }
            RegistrationFailure::TableIndexUnavailable { .. } => ExErrorKind::TableIndexUnavailable,
        };
        let ex = ExError::new(kind)
            .with_op("register_object_space")
            .with_path(err.path().to_string())
            .with_message(err.to_string());
        match err {
            RegistrationFailure::TableIndexUnavailable { table, .. } => ex.with_entity_id(table),
            _ => ex,
        }
    }
}

impl From<EngineError> for ExError {
    fn from(err: EngineError) -> Self {
        let ex = ExError::new(ExErrorKind::EngineRejected).with_message(err.to_string());
        match err {
            EngineError::UnknownSymbol { path, .. }
            | EngineError::InstanceModelMismatch { path, .. }
            | EngineError::Rejected {
                path: Some(path), ..
            } => ex.with_path(path.to_string()),
            _ => ex,
        }
    }
}
