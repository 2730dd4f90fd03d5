//! Generic action invocation: typed arguments in, typed results out
//!
//! ```rust,ignore
//! let client = ServiceClient::new(SoapClient::new(), Service::AVTransport, control_url);
//! let result = client.invoke(
//!     "GetTransportInfo",
//!     ActionArgs::new().int("InstanceID", 0),
//! )?;
//! let state: TransportState = result.lenient("CurrentTransportState");
//! ```

use std::time::Duration;

use tracing::debug;

use crate::didl::DirContent;
use crate::duration::parse_duration;
use crate::property_set::PropertySet;
use crate::service::Service;
use crate::transport::ActionTransport;
use crate::types::{Lenient, WireToken};
use crate::{ApiError, Result};

/// Ordered input arguments of an action, already encoded as strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionArgs {
    args: Vec<(String, String)>,
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string argument
    pub fn string(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.push((name.to_string(), value.into()));
        self
    }

    /// Add an integer argument, encoded in decimal
    pub fn int(self, name: &str, value: i64) -> Self {
        self.string(name, value.to_string())
    }

    /// Add an enumerated argument, encoded as its canonical wire token
    ///
    /// Values without a wire form (the `Unknown` fallbacks) are rejected.
    pub fn token<T: WireToken + std::fmt::Debug>(self, name: &str, value: T) -> Result<Self> {
        match value.as_wire() {
            Some(token) => Ok(self.string(name, token)),
            None => Err(ApiError::InvalidParameter(format!(
                "{:?} has no {} wire token",
                value,
                T::FAMILY
            ))),
        }
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Output arguments of a successful action
///
/// Every getter tolerates a missing key by returning the type's default, so
/// result records may be partially populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionResult {
    values: PropertySet,
}

impl ActionResult {
    pub fn new(values: PropertySet) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// String value, empty if absent
    pub fn string(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Integer value, 0 if absent or malformed
    pub fn int(&self, name: &str) -> i64 {
        self.get(name).map(parse_int).unwrap_or(0)
    }

    /// Duration value, zero if absent or malformed
    pub fn duration(&self, name: &str) -> Duration {
        self.get(name).map(parse_duration).unwrap_or_default()
    }

    /// Enumerated value; absent or unrecognized tokens give the fallback
    ///
    /// Only an unrecognized token is logged; absence is legal.
    pub fn lenient<T: Lenient>(&self, name: &str) -> T {
        match self.get(name) {
            Some(token) => T::decode(name, token),
            None => T::UNKNOWN,
        }
    }

    /// Embedded DIDL-Lite metadata, empty if absent or broken
    pub fn metadata(&self, name: &str) -> DirContent {
        DirContent::parse_lenient(self.get(name).unwrap_or_default())
    }

    pub fn into_inner(self) -> PropertySet {
        self.values
    }
}

/// Permissive integer decoding: optional sign and leading digits, anything
/// after is ignored, no digits at all gives 0
pub fn parse_int(value: &str) -> i64 {
    let value = value.trim();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..end].parse().unwrap_or(0);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Invokes actions on one remote service instance
///
/// The outcome of the transport is returned verbatim: no retry is made and
/// no result is interpreted beyond what the typed getters do.
#[derive(Debug, Clone)]
pub struct ServiceClient<T> {
    transport: T,
    service: Service,
    control_url: String,
}

impl<T: ActionTransport> ServiceClient<T> {
    pub fn new(transport: T, service: Service, control_url: impl Into<String>) -> Self {
        Self {
            transport,
            service,
            control_url: control_url.into(),
        }
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `action` with `args`
    pub fn invoke(&self, action: &str, args: ActionArgs) -> Result<ActionResult> {
        debug!(service = self.service.name(), action, args = args.len(), "invoking action");
        let values = self.transport.invoke_action(
            &self.control_url,
            self.service.service_type(),
            action,
            args.as_slice(),
        )?;
        Ok(ActionResult::new(values))
    }
}
