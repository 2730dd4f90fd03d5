//! AVTransport actions
//!
//! Queries fill a result record from the output arguments; a record is only
//! returned when the action succeeded, and keys the device left out keep
//! their default values. Mutations return nothing beyond their status.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{ActionArgs, ActionResult, ServiceClient};
use crate::didl::DirContent;
use crate::duration::format_duration;
use crate::service::Service;
use crate::transport::ActionTransport;
use crate::types::{PlayMode, SeekMode, TransportState, TransportStatus};
use crate::Result;

// =============================================================================
// RESULT RECORDS
// =============================================================================

/// Output of `GetMediaInfo`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub nr_tracks: i64,
    pub media_duration: Duration,
    pub current_uri: String,
    pub current_uri_metadata: DirContent,
    pub next_uri: String,
    pub next_uri_metadata: DirContent,
    pub play_medium: String,
    pub record_medium: String,
    pub write_status: String,
}

/// Output of `GetTransportInfo`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportInfo {
    pub state: TransportState,
    pub status: TransportStatus,
    pub speed: i64,
}

/// Output of `GetPositionInfo`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub track: i64,
    pub track_duration: Duration,
    pub track_metadata: DirContent,
    pub track_uri: String,
    pub rel_time: Duration,
    pub abs_time: Duration,
    pub rel_count: i64,
    pub abs_count: i64,
}

/// Output of `GetDeviceCapabilities`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    pub play_media: String,
    pub rec_media: String,
    pub rec_quality_modes: String,
}

/// Output of `GetTransportSettings`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportSettings {
    pub play_mode: PlayMode,
    pub rec_quality_mode: String,
}

impl From<ActionResult> for MediaInfo {
    fn from(result: ActionResult) -> Self {
        Self {
            nr_tracks: result.int("NrTracks"),
            media_duration: result.duration("MediaDuration"),
            current_uri: result.string("CurrentURI"),
            current_uri_metadata: result.metadata("CurrentURIMetaData"),
            next_uri: result.string("NextURI"),
            next_uri_metadata: result.metadata("NextURIMetaData"),
            play_medium: result.string("PlayMedium"),
            record_medium: result.string("RecordMedium"),
            write_status: result.string("WriteStatus"),
        }
    }
}

impl From<ActionResult> for TransportInfo {
    fn from(result: ActionResult) -> Self {
        Self {
            state: result.lenient("CurrentTransportState"),
            status: result.lenient("CurrentTransportStatus"),
            speed: result.int("CurrentSpeed"),
        }
    }
}

impl From<ActionResult> for PositionInfo {
    fn from(result: ActionResult) -> Self {
        Self {
            track: result.int("Track"),
            track_duration: result.duration("TrackDuration"),
            track_metadata: result.metadata("TrackMetaData"),
            track_uri: result.string("TrackURI"),
            rel_time: result.duration("RelTime"),
            abs_time: result.duration("AbsTime"),
            rel_count: result.int("RelCount"),
            abs_count: result.int("AbsCount"),
        }
    }
}

impl From<ActionResult> for DeviceCapabilities {
    fn from(result: ActionResult) -> Self {
        Self {
            play_media: result.string("PlayMedia"),
            rec_media: result.string("RecMedia"),
            rec_quality_modes: result.string("RecQualityModes"),
        }
    }
}

impl From<ActionResult> for TransportSettings {
    fn from(result: ActionResult) -> Self {
        Self {
            play_mode: result.lenient("PlayMode"),
            rec_quality_mode: result.string("RecQualityMode"),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Control point for one AVTransport instance on a renderer
#[derive(Debug, Clone)]
pub struct AVTransportService<T> {
    client: ServiceClient<T>,
    instance_id: i64,
}

impl<T: ActionTransport> AVTransportService<T> {
    /// Drive instance 0 of the service at `control_url`
    pub fn new(transport: T, control_url: impl Into<String>) -> Self {
        Self {
            client: ServiceClient::new(transport, Service::AVTransport, control_url),
            instance_id: 0,
        }
    }

    pub fn with_instance_id(mut self, instance_id: i64) -> Self {
        self.instance_id = instance_id;
        self
    }

    pub fn instance_id(&self) -> i64 {
        self.instance_id
    }

    pub fn client(&self) -> &ServiceClient<T> {
        &self.client
    }

    fn args(&self) -> ActionArgs {
        ActionArgs::new().int("InstanceID", self.instance_id)
    }

    fn run(&self, action: &str, args: ActionArgs) -> Result<ActionResult> {
        self.client.invoke(action, args)
    }

    // ---- queries ------------------------------------------------------------

    pub fn get_media_info(&self) -> Result<MediaInfo> {
        self.run("GetMediaInfo", self.args()).map(MediaInfo::from)
    }

    pub fn get_transport_info(&self) -> Result<TransportInfo> {
        self.run("GetTransportInfo", self.args()).map(TransportInfo::from)
    }

    pub fn get_position_info(&self) -> Result<PositionInfo> {
        self.run("GetPositionInfo", self.args()).map(PositionInfo::from)
    }

    pub fn get_device_capabilities(&self) -> Result<DeviceCapabilities> {
        self.run("GetDeviceCapabilities", self.args())
            .map(DeviceCapabilities::from)
    }

    pub fn get_transport_settings(&self) -> Result<TransportSettings> {
        self.run("GetTransportSettings", self.args())
            .map(TransportSettings::from)
    }

    /// Comma-separated list of the actions currently allowed
    pub fn get_current_transport_actions(&self) -> Result<String> {
        self.run("GetCurrentTransportActions", self.args())
            .map(|result| result.string("Actions"))
    }

    // ---- mutations ----------------------------------------------------------

    pub fn play(&self, speed: i64) -> Result<()> {
        self.run("Play", self.args().int("Speed", speed)).map(drop)
    }

    pub fn stop(&self) -> Result<()> {
        self.run("Stop", self.args()).map(drop)
    }

    pub fn pause(&self) -> Result<()> {
        self.run("Pause", self.args()).map(drop)
    }

    pub fn next(&self) -> Result<()> {
        self.run("Next", self.args()).map(drop)
    }

    pub fn previous(&self) -> Result<()> {
        self.run("Previous", self.args()).map(drop)
    }

    /// Seek using a mode given by its wire token (`REL_TIME`, `TRACK_NR`, ...)
    ///
    /// The mode is checked before anything is sent; an unmapped mode fails
    /// with [`crate::ApiError::InvalidParameter`].
    pub fn seek(&self, mode: &str, target: i64) -> Result<()> {
        let mode: SeekMode = mode.parse()?;
        self.seek_to(mode, target)
    }

    /// Seek to `target`
    ///
    /// For the time modes `target` is a number of seconds and is sent as
    /// `H:MM:SS`; other modes send it as a plain number.
    pub fn seek_to(&self, mode: SeekMode, target: i64) -> Result<()> {
        let target = match mode {
            SeekMode::AbsTime | SeekMode::RelTime => {
                format_duration(Duration::from_secs(target.max(0).unsigned_abs()))
            }
            _ => target.to_string(),
        };
        debug!(%mode, %target, "seek");
        let args = self.args().token("Unit", mode)?.string("Target", target);
        self.run("Seek", args).map(drop)
    }

    pub fn set_av_transport_uri(&self, uri: &str, metadata: &str) -> Result<()> {
        self.set_uri(false, uri, metadata)
    }

    pub fn set_next_av_transport_uri(&self, uri: &str, metadata: &str) -> Result<()> {
        self.set_uri(true, uri, metadata)
    }

    fn set_uri(&self, next: bool, uri: &str, metadata: &str) -> Result<()> {
        let (action, uri_arg, meta_arg) = if next {
            ("SetNextAVTransportURI", "NextURI", "NextURIMetaData")
        } else {
            ("SetAVTransportURI", "CurrentURI", "CurrentURIMetaData")
        };
        let args = self.args().string(uri_arg, uri).string(meta_arg, metadata);
        self.run(action, args).map(drop)
    }

    /// Set the play mode; [`PlayMode::Unknown`] is rejected locally
    pub fn set_play_mode(&self, mode: PlayMode) -> Result<()> {
        let args = self.args().token("NewPlayMode", mode)?;
        self.run("SetPlayMode", args).map(drop)
    }
}
