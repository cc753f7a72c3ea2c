//! Stock default-value providers

use std::net::Ipv4Addr;

use super::DefaultProvider;
use crate::model::{BaseKind, CanonicalTypeInfo, Oid, Value};

/// `0.0` for object identifiers, the SMI "null" identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroDotZeroProvider;

impl DefaultProvider for ZeroDotZeroProvider {
    fn name(&self) -> &str {
        "zero-dot-zero"
    }

    fn provide(&self, _type_name: &str, info: &CanonicalTypeInfo) -> Option<Value> {
        (info.base_kind == BaseKind::ObjectIdentifier)
            .then(|| Value::ObjectIdentifier(Oid::new(vec![0, 0])))
    }
}

/// `0.0.0.0` for network addresses
#[derive(Debug, Clone, Copy, Default)]
pub struct UnspecifiedAddressProvider;

impl DefaultProvider for UnspecifiedAddressProvider {
    fn name(&self) -> &str {
        "unspecified-address"
    }

    fn provide(&self, _type_name: &str, info: &CanonicalTypeInfo) -> Option<Value> {
        (info.base_kind == BaseKind::IpAddress).then_some(Value::IpAddress(Ipv4Addr::UNSPECIFIED))
    }
}

/// Adapter turning a closure into a provider
pub struct FnProvider<F> {
    name: String,
    f: F,
}

impl<F> FnProvider<F>
where
    F: Fn(&str, &CanonicalTypeInfo) -> Option<Value> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> DefaultProvider for FnProvider<F>
where
    F: Fn(&str, &CanonicalTypeInfo) -> Option<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn provide(&self, type_name: &str, info: &CanonicalTypeInfo) -> Option<Value> {
        (self.f)(type_name, info)
    }
}

/// Provider for a configured name
pub(crate) fn by_name(name: &str) -> Option<Box<dyn DefaultProvider>> {
    match name {
        "zero-dot-zero" => Some(Box::new(ZeroDotZeroProvider)),
        "unspecified-address" => Some(Box::new(UnspecifiedAddressProvider)),
        _ => None,
    }
}
