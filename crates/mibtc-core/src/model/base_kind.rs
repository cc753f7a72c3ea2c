use serde::{Deserialize, Serialize};
use std::fmt;

use super::constraint::ConstraintNode;

/// Primitive representation categories every type resolves to
///
/// SMIv2 splits "counter" and "gauge" into their width variants; the
/// network address category is `IpAddress` and time intervals are `TimeTicks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseKind {
    Integer32,
    Unsigned32,
    Counter32,
    Counter64,
    Gauge32,
    TimeTicks,
    OctetString,
    ObjectIdentifier,
    IpAddress,
    Opaque,
}

impl BaseKind {
    pub const ALL: [BaseKind; 10] = [
        BaseKind::Integer32,
        BaseKind::Unsigned32,
        BaseKind::Counter32,
        BaseKind::Counter64,
        BaseKind::Gauge32,
        BaseKind::TimeTicks,
        BaseKind::OctetString,
        BaseKind::ObjectIdentifier,
        BaseKind::IpAddress,
        BaseKind::Opaque,
    ];

    /// Name of the primitive type node seeded for this kind
    pub fn name(&self) -> &'static str {
        match self {
            BaseKind::Integer32 => "Integer32",
            BaseKind::Unsigned32 => "Unsigned32",
            BaseKind::Counter32 => "Counter32",
            BaseKind::Counter64 => "Counter64",
            BaseKind::Gauge32 => "Gauge32",
            BaseKind::TimeTicks => "TimeTicks",
            BaseKind::OctetString => "OctetString",
            BaseKind::ObjectIdentifier => "ObjectIdentifier",
            BaseKind::IpAddress => "IpAddress",
            BaseKind::Opaque => "Opaque",
        }
    }

    pub fn from_name(name: &str) -> Option<BaseKind> {
        BaseKind::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn is_numeric(&self) -> bool {
        self.natural_range().is_some()
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, BaseKind::Integer32)
    }

    /// Values representable by the kind itself, before any declared restriction
    pub fn natural_range(&self) -> Option<(i128, i128)> {
        match self {
            BaseKind::Integer32 => Some((i128::from(i32::MIN), i128::from(i32::MAX))),
            BaseKind::Unsigned32 | BaseKind::Counter32 | BaseKind::Gauge32 | BaseKind::TimeTicks => {
                Some((0, i128::from(u32::MAX)))
            }
            BaseKind::Counter64 => Some((0, i128::from(u64::MAX))),
            BaseKind::OctetString
            | BaseKind::ObjectIdentifier
            | BaseKind::IpAddress
            | BaseKind::Opaque => None,
        }
    }

    /// Lengths representable by the kind, for octet-based kinds
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match self {
            BaseKind::OctetString | BaseKind::Opaque => Some((0, 65535)),
            BaseKind::IpAddress => Some((4, 4)),
            _ => None,
        }
    }

    /// Constraints the seeded primitive node declares
    ///
    /// `IpAddress` carries no size constraint here: its values are typed
    /// addresses, not byte strings.
    pub fn natural_constraints(&self) -> Vec<ConstraintNode> {
        if let Some((min, max)) = self.natural_range() {
            vec![ConstraintNode::range(min, max)]
        } else {
            match self {
                BaseKind::OctetString | BaseKind::Opaque => self
                    .natural_size()
                    .map(|(min, max)| vec![ConstraintNode::size(min, max)])
                    .unwrap_or_default(),
                _ => Vec::new(),
            }
        }
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
