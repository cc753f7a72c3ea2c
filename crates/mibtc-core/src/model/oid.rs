use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Object identifier: a sequence of non-negative arcs
///
/// Serialized as a plain array of arcs, the shape the behaviour records use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn new(arcs: Vec<u32>) -> Self {
        Self(arcs)
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.0.clone();
        arcs.push(arc);
        Oid(arcs)
    }

    /// Append several arcs, e.g. a row index
    pub fn join(&self, suffix: &[u32]) -> Oid {
        let mut arcs = self.0.clone();
        arcs.extend_from_slice(suffix);
        Oid(arcs)
    }

    pub fn parent(&self) -> Option<Oid> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Oid(rest.to_vec())),
            _ => None,
        }
    }

    pub fn last_arc(&self) -> Option<u32> {
        self.0.last().copied()
    }

    /// True if `self` is a proper or improper prefix of `other`
    pub fn is_prefix_of(&self, other: &Oid) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Arcs of `other` after `self`, if `self` is a prefix of it
    pub fn suffix_of<'a>(&self, other: &'a Oid) -> Option<&'a [u32]> {
        other.0.strip_prefix(self.0.as_slice())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid object identifier {input:?}: {reason}")]
pub struct OidParseError {
    pub input: String,
    pub reason: String,
}

impl FromStr for Oid {
    type Err = OidParseError;

    /// Parse dotted notation; a single leading dot is accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().strip_prefix('.').unwrap_or(s.trim());
        if trimmed.is_empty() {
            return Err(OidParseError {
                input: s.to_string(),
                reason: "no arcs".to_string(),
            });
        }
        trimmed
            .split('.')
            .map(|arc| {
                arc.parse::<u32>().map_err(|e| OidParseError {
                    input: s.to_string(),
                    reason: format!("arc {:?}: {}", arc, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Oid)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Oid(arcs.to_vec())
    }
}
