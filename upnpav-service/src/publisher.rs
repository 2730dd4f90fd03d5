//! Evented state: snapshots of a service's variables and the diffs between
//! consecutive snapshots
//!
//! A service rebuilds its full state on demand ([`EventedService::make_state`]).
//! The [`EventPublisher`] remembers the last snapshot it saw and reports only
//! the variables whose values changed since then, unless a full dump is
//! requested (initial event to a new subscriber).

use tracing::debug;
use upnpav_api::PropertySet;

use crate::error::Result;

/// Ordered variable name to value map
///
/// Variables keep the position of their first insertion, so event batches
/// list them in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSnapshot {
    entries: Vec<(String, String)>,
}

impl ServiceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous value in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`ServiceSnapshot::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for ServiceSnapshot {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut snapshot = ServiceSnapshot::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

/// Change detector between successive snapshots of one service
#[derive(Debug, Clone, Default)]
pub struct EventPublisher {
    last: ServiceSnapshot,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables to send in the next event
    ///
    /// With `force_all` every variable of `current` is returned; otherwise
    /// only those that are new or whose value differs from the previous
    /// snapshot. Either way `current` becomes the new reference.
    pub fn compute_event_batch(
        &mut self,
        current: ServiceSnapshot,
        force_all: bool,
    ) -> Vec<(String, String)> {
        let batch: Vec<(String, String)> = current
            .iter()
            .filter(|(name, value)| force_all || self.last.get(name) != Some(*value))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        for (name, value) in &batch {
            debug!(%name, %value, "evented variable changed");
        }

        self.last = current;
        batch
    }

    /// The snapshot the next batch will be compared against
    pub fn last_snapshot(&self) -> &ServiceSnapshot {
        &self.last
    }
}

/// Hook that lets the device's event loop know state may have changed
pub trait LoopWaker {
    fn wake(&self);
}

impl<F: Fn()> LoopWaker for F {
    fn wake(&self) {
        self()
    }
}

/// A device-side service with evented state and SOAP actions
pub trait EventedService {
    /// Versioned service type, e.g. `urn:av-openhome-org:service:Receiver:1`
    fn service_type(&self) -> &str;

    /// Service identifier within the device description
    fn service_id(&self) -> &str;

    /// Current values of every evented variable
    fn make_state(&self) -> ServiceSnapshot;

    /// The publisher owned by this service
    fn publisher_mut(&mut self) -> &mut EventPublisher;

    /// Execute `action`, returning its output arguments
    fn handle_action(&mut self, action: &str, args: &PropertySet) -> Result<Vec<(String, String)>>;

    /// Variables to send in the next event, see
    /// [`EventPublisher::compute_event_batch`]
    fn event_data(&mut self, force_all: bool) -> Vec<(String, String)> {
        let state = self.make_state();
        self.publisher_mut().compute_event_batch(state, force_all)
    }
}
