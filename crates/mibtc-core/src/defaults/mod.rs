//! Default value synthesis
//!
//! Numeric and octet-string kinds have built-in defaults. Object identifiers
//! and network addresses have none, so an ordered chain of providers is
//! consulted for them; the first concrete value wins.

pub mod providers;

use crate::config::DefaultsConfig;
use crate::errors::{MibError, Result};
use crate::model::{BaseKind, CanonicalTypeInfo, ConstraintNode, Value};

pub use providers::{FnProvider, UnspecifiedAddressProvider, ZeroDotZeroProvider};

/// Strategy for types without a built-in default
///
/// Implementations must be pure: the same inputs always give the same answer.
pub trait DefaultProvider: Send + Sync {
    fn name(&self) -> &str;

    /// A value for the type, or `None` to let the next provider try
    fn provide(&self, type_name: &str, info: &CanonicalTypeInfo) -> Option<Value>;
}

/// Turns canonical type descriptions into initial values
#[derive(Default)]
pub struct DefaultSynthesizer {
    providers: Vec<Box<dyn DefaultProvider>>,
}

impl DefaultSynthesizer {
    /// A synthesizer with an empty provider chain
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl DefaultProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Append a provider to the end of the chain
    pub fn register(&mut self, provider: Box<dyn DefaultProvider>) {
        self.providers.push(provider);
    }

    /// Chain built from the configured provider names, in order
    ///
    /// # Errors
    ///
    /// `Config` naming the first unknown provider.
    pub fn from_config(config: &DefaultsConfig) -> Result<Self> {
        let mut synth = Self::new();
        for name in &config.providers {
            let provider = providers::by_name(name).ok_or_else(|| MibError::Config {
                reason: format!("unknown default provider {:?}", name),
            })?;
            synth.register(provider);
        }
        Ok(synth)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Initial value for `info`
    ///
    /// # Errors
    ///
    /// `NoDefaultAvailable` naming the type when there is no built-in
    /// default and every provider declines.
    pub fn synthesize(&self, info: &CanonicalTypeInfo) -> Result<Value> {
        if let Some(value) = builtin_default(info) {
            return Ok(value);
        }
        for provider in &self.providers {
            if let Some(value) = provider.provide(&info.name, info) {
                tracing::debug!(
                    type_name = %info.name,
                    provider = provider.name(),
                    value = %value,
                    "default supplied by provider"
                );
                return Ok(value);
            }
        }
        Err(MibError::NoDefaultAvailable {
            type_name: info.name.clone(),
        })
    }
}

/// Built-in default, chosen to satisfy the type's constraints
///
/// Numbers: the smallest enumerated or single value if the type is discrete,
/// else zero if admitted, else the smallest range minimum. Octet strings:
/// zero bytes of the smallest admitted length. `None` for kinds without a
/// built-in default and for constraint sets nothing satisfies.
fn builtin_default(info: &CanonicalTypeInfo) -> Option<Value> {
    let kind = info.base_kind;
    if kind.is_numeric() {
        let discrete: Option<Vec<i128>> = match &info.enum_values {
            Some(enums) => Some(enums.iter().map(|e| i128::from(e.value)).collect()),
            None => info.constraints.iter().find_map(|c| match c {
                ConstraintNode::SingleValue { values } => Some(values.clone()),
                _ => None,
            }),
        };
        let candidates: Vec<i128> = match discrete {
            Some(mut values) => {
                values.sort_unstable();
                values
            }
            None => {
                let mut mins: Vec<i128> = info.ranges().map(|(min, _)| min).collect();
                mins.sort_unstable();
                std::iter::once(0).chain(mins).collect()
            }
        };
        return candidates
            .into_iter()
            .filter_map(|n| Value::number(kind, n))
            .find(|v| info.check(v).is_ok());
    }

    if matches!(kind, BaseKind::OctetString | BaseKind::Opaque) {
        let mut lengths: Vec<i128> = info.sizes().map(|(min, _)| min).collect();
        lengths.sort_unstable();
        return std::iter::once(0)
            .chain(lengths)
            .filter_map(|len| usize::try_from(len).ok())
            .map(|len| octets(kind, vec![0; len]))
            .find(|v| info.check(v).is_ok());
    }
    None
}

fn octets(kind: BaseKind, bytes: Vec<u8>) -> Value {
    if kind == BaseKind::Opaque {
        Value::Opaque(bytes)
    } else {
        Value::OctetString(bytes)
    }
}
