//! Wire token tables for the AVTransport enumerated state variables
//!
//! Each family maps canonical uppercase tokens to enum values through a
//! process-wide constant table. Decoding is case-insensitive; encoding always
//! yields the first (canonical) token listed for a value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::ApiError;

/// An enum with a fixed set of UPnP wire tokens
pub trait WireToken: Sized + Copy + PartialEq + 'static {
    /// Family name used in log messages
    const FAMILY: &'static str;

    /// Token table; a value may appear several times (aliases), the first
    /// occurrence is canonical
    const TABLE: &'static [(&'static str, Self)];

    /// Case-insensitive lookup
    fn from_wire(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::TABLE
            .iter()
            .find(|(wire, _)| wire.eq_ignore_ascii_case(token))
            .map(|(_, value)| *value)
    }

    /// Canonical token, `None` for values that have no wire form
    fn as_wire(&self) -> Option<&'static str> {
        Self::TABLE
            .iter()
            .find(|(_, value)| value == self)
            .map(|(wire, _)| *wire)
    }
}

/// A wire enum with a soft fallback for unrecognized tokens
pub trait Lenient: WireToken {
    const UNKNOWN: Self;

    /// Decode `token` received for `property`; unrecognized tokens are
    /// logged and yield [`Lenient::UNKNOWN`]
    fn decode(property: &str, token: &str) -> Self {
        Self::from_wire(token).unwrap_or_else(|| {
            error!(
                property,
                value = token,
                "bad value for {}",
                Self::FAMILY
            );
            Self::UNKNOWN
        })
    }
}

/// AVTransport `TransportState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransportState {
    Stopped,
    Playing,
    Transitioning,
    PausedPlayback,
    PausedRecording,
    Recording,
    NoMediaPresent,
    #[default]
    Unknown,
}

impl WireToken for TransportState {
    const FAMILY: &'static str = "TransportState";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("STOPPED", TransportState::Stopped),
        ("PLAYING", TransportState::Playing),
        ("TRANSITIONING", TransportState::Transitioning),
        ("PAUSED_PLAYBACK", TransportState::PausedPlayback),
        ("PAUSED_RECORDING", TransportState::PausedRecording),
        ("RECORDING", TransportState::Recording),
        ("NO_MEDIA_PRESENT", TransportState::NoMediaPresent),
        ("NO MEDIA PRESENT", TransportState::NoMediaPresent),
    ];
}

impl Lenient for TransportState {
    const UNKNOWN: Self = TransportState::Unknown;
}

/// AVTransport `TransportStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransportStatus {
    Ok,
    Error,
    #[default]
    Unknown,
}

impl WireToken for TransportStatus {
    const FAMILY: &'static str = "TransportStatus";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("OK", TransportStatus::Ok),
        ("ERROR_OCCURRED", TransportStatus::Error),
    ];
}

impl Lenient for TransportStatus {
    const UNKNOWN: Self = TransportStatus::Unknown;
}

/// AVTransport `CurrentPlayMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayMode {
    Normal,
    Shuffle,
    RepeatOne,
    RepeatAll,
    Random,
    Direct1,
    #[default]
    Unknown,
}

impl WireToken for PlayMode {
    const FAMILY: &'static str = "PlayMode";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("NORMAL", PlayMode::Normal),
        ("SHUFFLE", PlayMode::Shuffle),
        ("REPEAT_ONE", PlayMode::RepeatOne),
        ("REPEAT_ALL", PlayMode::RepeatAll),
        ("RANDOM", PlayMode::Random),
        ("DIRECT_1", PlayMode::Direct1),
    ];
}

impl Lenient for PlayMode {
    const UNKNOWN: Self = PlayMode::Unknown;
}

/// AVTransport `A_ARG_TYPE_SeekMode`
///
/// Seek modes are supplied by the caller, never decoded from events, so there
/// is no fallback: an unmapped mode is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeekMode {
    TrackNr,
    AbsTime,
    RelTime,
    AbsCount,
    RelCount,
    ChannelFreq,
    TapeIndex,
    Frame,
}

impl WireToken for SeekMode {
    const FAMILY: &'static str = "SeekMode";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("TRACK_NR", SeekMode::TrackNr),
        ("ABS_TIME", SeekMode::AbsTime),
        ("REL_TIME", SeekMode::RelTime),
        ("ABS_COUNT", SeekMode::AbsCount),
        ("REL_COUNT", SeekMode::RelCount),
        ("CHANNEL_FREQ", SeekMode::ChannelFreq),
        ("TAPE-INDEX", SeekMode::TapeIndex),
        ("FRAME", SeekMode::Frame),
    ];
}

impl FromStr for SeekMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown seek mode '{}'", s)))
    }
}

macro_rules! display_wire {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.as_wire() {
                    Some(token) => f.write_str(token),
                    None => write!(f, "{:?}", self),
                }
            }
        })*
    };
}

display_wire!(TransportState, TransportStatus, PlayMode, SeekMode);
