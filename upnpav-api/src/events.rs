//! Typed state-variable changes delivered to a subscriber
//!
//! Service decoders turn raw event property sets into [`StateValue`]s and hand
//! each one, synchronously and in decode order, to a single [`ChangeReporter`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::didl::DirContent;
use crate::types::{PlayMode, TransportState, TransportStatus};

/// Decoded value of one state variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateValue {
    TransportState(TransportState),
    TransportStatus(TransportStatus),
    PlayMode(PlayMode),
    Integer(i64),
    Duration(Duration),
    Metadata(DirContent),
    Text(String),
}

impl StateValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StateValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            StateValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            StateValue::Duration(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_metadata(&self) -> Option<&DirContent> {
        match self {
            StateValue::Metadata(content) => Some(content),
            _ => None,
        }
    }
}

/// Receives state changes from an event decoder
pub trait ChangeReporter {
    fn changed(&mut self, name: &str, value: StateValue);
}

impl<F> ChangeReporter for F
where
    F: FnMut(&str, StateValue),
{
    fn changed(&mut self, name: &str, value: StateValue) {
        self(name, value)
    }
}

/// Outcome of decoding one event notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSummary {
    /// Values handed to the reporter
    pub delivered: usize,
    /// Variables skipped because they carried no value
    pub malformed: usize,
    /// The embedded state document was unusable and the batch was discarded
    pub dropped: bool,
}
