//! AVTransport event decoding
//!
//! AVTransport moderates its events: every change is folded into a single
//! `LastChange` variable holding an escaped document, e.g.
//!
//! ```xml
//! <Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/">
//!   <InstanceID val="0">
//!     <TransportState val="PLAYING"/>
//!     <CurrentTrackDuration val="0:03:58"/>
//!     <CurrentTrackMetaData val="&lt;DIDL-Lite ...&gt;"/>
//!   </InstanceID>
//! </Event>
//! ```
//!
//! [`AVTransportEvents`] unpacks that document and sends every variable in it
//! to the registered [`ChangeReporter`] as a typed [`StateValue`].

use tracing::{debug, error, info, warn};

use crate::action::parse_int;
use crate::didl::DirContent;
use crate::duration::parse_duration;
use crate::events::{ChangeReporter, EventSummary, StateValue};
use crate::property_set::{decode_last_change, PropertySet};
use crate::types::{Lenient, PlayMode, TransportState, TransportStatus};

const DURATION_VARIABLES: &[&str] = &[
    "CurrentMediaDuration",
    "CurrentTrackDuration",
    "RelativeTimePosition",
    "AbsoluteTimePosition",
];

const INTEGER_VARIABLES: &[&str] = &[
    "TransportPlaySpeed",
    "CurrentTrack",
    "NumberOfTracks",
    "RelativeCounterPosition",
    "AbsoluteCounterPosition",
    "InstanceID",
];

const METADATA_VARIABLES: &[&str] = &[
    "AVTransportURIMetaData",
    "NextAVTransportURIMetaData",
    "CurrentTrackMetaData",
];

const TEXT_VARIABLES: &[&str] = &[
    "CurrentTransportActions",
    "CurrentTrackURI",
    "AVTransportURI",
    "NextAVTransportURI",
    "PlaybackStorageMedium",
    "PossiblePlaybackStorageMedium",
    "RecordStorageMedium",
    "PossibleRecordStorageMedium",
    "RecordMediumWriteStatus",
    "CurrentRecordQualityMode",
    "PossibleRecordQualityModes",
];

/// Convert one AVTransport state variable to its typed value
///
/// Never fails: malformed values decode to the type's default and are
/// logged, variables this table does not know pass through as text.
pub fn decode_variable(name: &str, value: &str) -> StateValue {
    match name {
        "TransportState" => StateValue::TransportState(TransportState::decode(name, value)),
        "TransportStatus" => StateValue::TransportStatus(TransportStatus::decode(name, value)),
        "CurrentPlayMode" => StateValue::PlayMode(PlayMode::decode(name, value)),
        _ if DURATION_VARIABLES.contains(&name) => StateValue::Duration(parse_duration(value)),
        _ if INTEGER_VARIABLES.contains(&name) => StateValue::Integer(parse_int(value)),
        _ if METADATA_VARIABLES.contains(&name) => {
            StateValue::Metadata(DirContent::parse_lenient(value))
        }
        _ => {
            if !TEXT_VARIABLES.contains(&name) {
                warn!(variable = name, value, "unknown AVTransport variable");
            }
            StateValue::Text(value.to_string())
        }
    }
}

/// Event sink for one AVTransport service
#[derive(Default)]
pub struct AVTransportEvents {
    reporter: Option<Box<dyn ChangeReporter + Send>>,
}

impl std::fmt::Debug for AVTransportEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AVTransportEvents")
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}

impl AVTransportEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the subscriber, replacing any previous one
    pub fn set_reporter(&mut self, reporter: impl ChangeReporter + Send + 'static) {
        self.reporter = Some(Box::new(reporter));
    }

    pub fn clear_reporter(&mut self) -> bool {
        self.reporter.take().is_some()
    }

    pub fn has_reporter(&self) -> bool {
        self.reporter.is_some()
    }

    /// Handle an event notification
    ///
    /// Only the `LastChange` variable is interpreted. If its document cannot
    /// be decoded, nothing from this notification is delivered.
    pub fn on_event(&mut self, props: &PropertySet) -> EventSummary {
        let mut summary = EventSummary::default();

        for (name, raw) in props {
            if name != "LastChange" {
                info!(variable = %name, "ignoring AVTransport event variable");
                continue;
            }

            let last_change = match decode_last_change(raw) {
                Ok(decoded) => decoded,
                Err(e) => {
                    error!(error = %e, "undecodable LastChange, dropping event");
                    summary.dropped = true;
                    continue;
                }
            };
            summary.malformed += last_change.malformed.len();

            for (variable, value) in &last_change.properties {
                let typed = decode_variable(variable, value);
                match self.reporter.as_mut() {
                    Some(reporter) => {
                        reporter.changed(variable, typed);
                        summary.delivered += 1;
                    }
                    None => debug!(%variable, "no reporter, discarding change"),
                }
            }
        }

        summary
    }
}
