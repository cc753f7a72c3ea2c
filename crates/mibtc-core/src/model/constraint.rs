use serde::{Deserialize, Serialize};
use std::fmt;

/// One declared value restriction
///
/// Bounds are `i128` so that the full `Counter64` range and negative
/// `Integer32` ranges share one representation. In records the variants use
/// the SMI constraint names (`ValueRangeConstraint` etc.) as the `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConstraintNode {
    /// Inclusive numeric range
    #[serde(rename = "ValueRangeConstraint")]
    ValueRange {
        #[serde(with = "bound")]
        min: i128,
        #[serde(with = "bound")]
        max: i128,
    },
    /// Inclusive length range for octet strings
    #[serde(rename = "ValueSizeConstraint")]
    Size { min: u32, max: u32 },
    /// Explicit allowed set
    #[serde(rename = "SingleValueConstraint")]
    SingleValue {
        #[serde(with = "bound_list")]
        values: Vec<i128>,
    },
}

impl ConstraintNode {
    pub fn range(min: impl Into<i128>, max: impl Into<i128>) -> Self {
        ConstraintNode::ValueRange {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn size(min: u32, max: u32) -> Self {
        ConstraintNode::Size { min, max }
    }

    pub fn single<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<i128>,
    {
        ConstraintNode::SingleValue {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn as_range(&self) -> Option<(i128, i128)> {
        match self {
            ConstraintNode::ValueRange { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<(i128, i128)> {
        match self {
            ConstraintNode::Size { min, max } => Some((i128::from(*min), i128::from(*max))),
            _ => None,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, ConstraintNode::ValueRange { .. })
    }

    pub fn is_size(&self) -> bool {
        matches!(self, ConstraintNode::Size { .. })
    }

    pub fn is_single_value(&self) -> bool {
        matches!(self, ConstraintNode::SingleValue { .. })
    }
}

impl fmt::Display for ConstraintNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintNode::ValueRange { min, max } => write!(f, "range {}..{}", min, max),
            ConstraintNode::Size { min, max } => write!(f, "size {}..{}", min, max),
            ConstraintNode::SingleValue { values } => {
                f.write_str("values (")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// `i128` bounds travel as `i64` or `u64`, whichever holds the value
mod bound {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
        if let Ok(v) = i64::try_from(*value) {
            serializer.serialize_i64(v)
        } else if let Ok(v) = u64::try_from(*value) {
            serializer.serialize_u64(v)
        } else {
            Err(serde::ser::Error::custom(format!(
                "bound {} is outside the 64-bit range",
                value
            )))
        }
    }

    pub(super) struct BoundVisitor;

    impl<'de> Visitor<'de> for BoundVisitor {
        type Value = i128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer bound")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i128, E> {
            Ok(i128::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i128, E> {
            Ok(i128::from(v))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        deserializer.deserialize_any(BoundVisitor)
    }
}

mod bound_list {
    use serde::de::{SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    struct Wrapped(i128);

    impl serde::Serialize for Wrapped {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            super::bound::serialize(&self.0, serializer)
        }
    }

    impl<'de> serde::Deserialize<'de> for Wrapped {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer
                .deserialize_any(super::bound::BoundVisitor)
                .map(Wrapped)
        }
    }

    pub fn serialize<S: Serializer>(values: &[i128], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for v in values {
            seq.serialize_element(&Wrapped(*v))?;
        }
        seq.end()
    }

    struct ListVisitor;

    impl<'de> Visitor<'de> for ListVisitor {
        type Value = Vec<i128>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of integers")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<i128>, A::Error> {
            let mut out = Vec::new();
            while let Some(Wrapped(v)) = seq.next_element()? {
                out.push(v);
            }
            Ok(out)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i128>, D::Error> {
        deserializer.deserialize_seq(ListVisitor)
    }
}
