//! Seam to the external protocol engine
//!
//! The engine owns the wire protocol and the live instance tree. This crate
//! only asks it to create, update and drop instances.

use mibtc_core::{BaseKind, Oid, Value};
use serde::Serialize;
use std::fmt;

use crate::errors::EngineError;

/// Native value model the engine stores an instance in
///
/// `Unsigned32` and `Gauge32` share one wire type and therefore one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RepresentationKind {
    Integer,
    Gauge,
    Counter,
    Counter64,
    TimeTicks,
    OctetString,
    ObjectName,
    IpAddress,
    Opaque,
}

impl From<BaseKind> for RepresentationKind {
    fn from(kind: BaseKind) -> Self {
        match kind {
            BaseKind::Integer32 => RepresentationKind::Integer,
            BaseKind::Unsigned32 | BaseKind::Gauge32 => RepresentationKind::Gauge,
            BaseKind::Counter32 => RepresentationKind::Counter,
            BaseKind::Counter64 => RepresentationKind::Counter64,
            BaseKind::TimeTicks => RepresentationKind::TimeTicks,
            BaseKind::OctetString => RepresentationKind::OctetString,
            BaseKind::ObjectIdentifier => RepresentationKind::ObjectName,
            BaseKind::IpAddress => RepresentationKind::IpAddress,
            BaseKind::Opaque => RepresentationKind::Opaque,
        }
    }
}

impl RepresentationKind {
    /// Whether `value` can be stored in this model
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            RepresentationKind::Integer => value.fits(BaseKind::Integer32),
            RepresentationKind::Gauge
            | RepresentationKind::Counter
            | RepresentationKind::TimeTicks => value.fits(BaseKind::Unsigned32),
            RepresentationKind::Counter64 => value.fits(BaseKind::Counter64),
            RepresentationKind::OctetString => value.fits(BaseKind::OctetString),
            RepresentationKind::ObjectName => value.fits(BaseKind::ObjectIdentifier),
            RepresentationKind::IpAddress => value.fits(BaseKind::IpAddress),
            RepresentationKind::Opaque => value.fits(BaseKind::Opaque),
        }
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Engine-side identity of one live instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Handle(pub u64);

/// Capabilities the registration layer and write engine need
///
/// Implementations are shared across request threads.
pub trait ProtocolEngine: Send + Sync {
    /// Create the instance at `path`
    ///
    /// # Errors
    ///
    /// `UnknownSymbol` when no loaded definition covers `path`,
    /// `InstanceModelMismatch` when the definition cannot hold an instance
    /// of `representation` at that position, `Rejected` otherwise.
    fn instantiate(
        &self,
        path: &Oid,
        representation: RepresentationKind,
        initial: &Value,
    ) -> Result<Handle, EngineError>;

    /// Replace the value of a live instance
    ///
    /// # Errors
    ///
    /// `UnknownHandle` or `Rejected`.
    fn update(&self, handle: Handle, value: &Value) -> Result<(), EngineError>;

    /// Drop a live instance
    ///
    /// # Errors
    ///
    /// `UnknownHandle` or `Rejected`.
    fn remove(&self, handle: Handle) -> Result<(), EngineError>;
}
