use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

use super::base_kind::BaseKind;
use super::oid::Oid;
use crate::errors::{MibError, Result};

/// A concrete object value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    /// `Integer32` and its derivations
    Integer(i64),
    /// Unsigned kinds: counters, gauges, time ticks
    Unsigned(u64),
    OctetString(Vec<u8>),
    ObjectIdentifier(Oid),
    IpAddress(Ipv4Addr),
    Opaque(Vec<u8>),
}

impl Value {
    /// Numeric view used for range, single-value and enum checks
    pub fn as_number(&self) -> Option<i128> {
        match self {
            Value::Integer(v) => Some(i128::from(*v)),
            Value::Unsigned(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Length used for size checks
    pub fn octet_len(&self) -> Option<usize> {
        match self {
            Value::OctetString(b) | Value::Opaque(b) => Some(b.len()),
            _ => None,
        }
    }

    /// Whether the value has the shape `kind` stores, including its native width
    pub fn fits(&self, kind: BaseKind) -> bool {
        match (self, kind) {
            (Value::Integer(_), BaseKind::Integer32)
            | (
                Value::Unsigned(_),
                BaseKind::Unsigned32
                | BaseKind::Counter32
                | BaseKind::Counter64
                | BaseKind::Gauge32
                | BaseKind::TimeTicks,
            ) => match (self.as_number(), kind.natural_range()) {
                (Some(n), Some((min, max))) => n >= min && n <= max,
                _ => false,
            },
            (Value::OctetString(_), BaseKind::OctetString)
            | (Value::Opaque(_), BaseKind::Opaque)
            | (Value::ObjectIdentifier(_), BaseKind::ObjectIdentifier)
            | (Value::IpAddress(_), BaseKind::IpAddress) => true,
            _ => false,
        }
    }

    /// Number in the variant `kind` uses
    pub fn number(kind: BaseKind, n: i128) -> Option<Value> {
        let value = if kind.is_signed() {
            Value::Integer(i64::try_from(n).ok()?)
        } else if kind.is_numeric() {
            Value::Unsigned(u64::try_from(n).ok()?)
        } else {
            return None;
        };
        value.fits(kind).then_some(value)
    }

    /// Coerce a JSON record value into the shape `kind` stores
    ///
    /// Numbers may be given as JSON numbers or numeric strings, octet
    /// strings as text or byte arrays, object identifiers as dotted text or
    /// arc arrays, addresses as dotted quads.
    ///
    /// # Errors
    ///
    /// `InvalidValue` naming `type_name` when the JSON cannot represent a
    /// value of `kind`.
    pub fn from_json(type_name: &str, kind: BaseKind, json: &serde_json::Value) -> Result<Value> {
        let invalid = |reason: String| MibError::InvalidValue {
            type_name: type_name.to_string(),
            reason,
        };
        match kind {
            k if k.is_numeric() => {
                let n: i128 = match json {
                    serde_json::Value::Number(n) => n
                        .as_i64()
                        .map(i128::from)
                        .or_else(|| n.as_u64().map(i128::from))
                        .ok_or_else(|| invalid(format!("{} is not an integer", n)))?,
                    serde_json::Value::String(s) => s
                        .trim()
                        .parse::<i128>()
                        .map_err(|_| invalid(format!("{:?} is not an integer", s)))?,
                    other => return Err(invalid(format!("expected an integer, got {}", other))),
                };
                Value::number(k, n)
                    .ok_or_else(|| invalid(format!("{} does not fit {}", n, k)))
            }
            BaseKind::OctetString | BaseKind::Opaque => {
                let bytes = match json {
                    serde_json::Value::String(s) => s.as_bytes().to_vec(),
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|item| {
                            item.as_u64()
                                .and_then(|b| u8::try_from(b).ok())
                                .ok_or_else(|| invalid(format!("{} is not a byte", item)))
                        })
                        .collect::<Result<Vec<u8>>>()?,
                    other => {
                        return Err(invalid(format!("expected text or bytes, got {}", other)))
                    }
                };
                Ok(if kind == BaseKind::Opaque {
                    Value::Opaque(bytes)
                } else {
                    Value::OctetString(bytes)
                })
            }
            BaseKind::ObjectIdentifier => match json {
                serde_json::Value::String(s) => s
                    .parse::<Oid>()
                    .map(Value::ObjectIdentifier)
                    .map_err(|e| invalid(e.to_string())),
                serde_json::Value::Array(_) => serde_json::from_value::<Oid>(json.clone())
                    .map(Value::ObjectIdentifier)
                    .map_err(|e| invalid(e.to_string())),
                other => Err(invalid(format!(
                    "expected an object identifier, got {}",
                    other
                ))),
            },
            BaseKind::IpAddress => json
                .as_str()
                .and_then(|s| s.trim().parse::<Ipv4Addr>().ok())
                .map(Value::IpAddress)
                .ok_or_else(|| invalid(format!("{} is not an IPv4 address", json))),
            // numeric kinds are handled by the guard above
            _ => Err(invalid(format!("unsupported kind {}", kind))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Unsigned(v) => write!(f, "{}", v),
            Value::OctetString(b) | Value::Opaque(b) => {
                match std::str::from_utf8(b) {
                    Ok(text) if text.chars().all(|c| !c.is_control()) => write!(f, "{:?}", text),
                    _ => {
                        f.write_str("0x")?;
                        for byte in b {
                            write!(f, "{:02x}", byte)?;
                        }
                        Ok(())
                    }
                }
            }
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => write!(f, "{}", addr),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fits_checks_native_width() {
        assert!(Value::Integer(-5).fits(BaseKind::Integer32));
        assert!(!Value::Integer(i64::from(i32::MAX) + 1).fits(BaseKind::Integer32));
        assert!(Value::Unsigned(u64::from(u32::MAX)).fits(BaseKind::Gauge32));
        assert!(!Value::Unsigned(u64::from(u32::MAX) + 1).fits(BaseKind::Gauge32));
        assert!(Value::Unsigned(u64::MAX).fits(BaseKind::Counter64));
        assert!(!Value::Integer(1).fits(BaseKind::Unsigned32));
    }

    #[test]
    fn test_from_json_numbers() {
        let v = Value::from_json("T", BaseKind::Integer32, &json!(-3)).unwrap();
        assert_eq!(v, Value::Integer(-3));
        let v = Value::from_json("T", BaseKind::TimeTicks, &json!("42")).unwrap();
        assert_eq!(v, Value::Unsigned(42));
        assert!(Value::from_json("T", BaseKind::Counter32, &json!(-1)).is_err());
        assert!(Value::from_json("T", BaseKind::Integer32, &json!(1.5)).is_err());
    }

    #[test]
    fn test_from_json_octets_and_oids() {
        let v = Value::from_json("T", BaseKind::OctetString, &json!("abc")).unwrap();
        assert_eq!(v, Value::OctetString(b"abc".to_vec()));
        let v = Value::from_json("T", BaseKind::OctetString, &json!([0, 255])).unwrap();
        assert_eq!(v, Value::OctetString(vec![0, 255]));
        let v = Value::from_json("T", BaseKind::ObjectIdentifier, &json!("0.0")).unwrap();
        assert_eq!(v, Value::ObjectIdentifier(Oid::new(vec![0, 0])));
        let v = Value::from_json("T", BaseKind::IpAddress, &json!("10.0.0.1")).unwrap();
        assert_eq!(v, Value::IpAddress(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_from_json_error_names_type() {
        let err = Value::from_json("MacAddress", BaseKind::OctetString, &json!(true)).unwrap_err();
        assert!(matches!(err, MibError::InvalidValue { ref type_name, .. } if type_name == "MacAddress"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::OctetString(b"eth0".to_vec()).to_string(), "\"eth0\"");
        assert_eq!(Value::OctetString(vec![0, 1]).to_string(), "0x0001");
    }
}
