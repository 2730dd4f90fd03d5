//! OpenHome Receiver service
//!
//! Lets a Songcast sender push audio to this renderer. The control point sets
//! the sender (`SetSender`) and then calls `Play`; the service starts a helper
//! program that receives the multicast/unicast stream and serves it as a WAV
//! file on a local HTTP port, queues that local URL at the head of the
//! player's playlist and starts playback from it.

use quick_xml::escape::unescape;
use tracing::{debug, error, info, warn};
use upnpav_api::PropertySet;

use crate::error::{PlayerError, Result, ServiceError};
use crate::helper::{HelperSlot, ProcessLauncher};
use crate::publisher::{EventPublisher, EventedService, LoopWaker, ServiceSnapshot};

pub const SERVICE_TYPE: &str = "urn:av-openhome-org:service:Receiver:1";
pub const SERVICE_ID: &str = "urn:av-openhome-org:serviceId:Receiver";

/// Protocols a Songcast receiver accepts
pub const DEFAULT_PROTOCOL_INFO: &str = "ohz:*:*:*,ohm:*:*:*,ohu:*.*.*";

/// Receiver settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// Program relaying the Songcast stream to local HTTP, run as
    /// `<helper_program> -u <sender uri>`
    pub helper_program: String,
    /// Port the helper serves `/Songcast.wav` on
    pub http_port: u16,
    /// Value of the `ProtocolInfo` variable
    pub protocol_info: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            helper_program: "scmpdcli".to_string(),
            http_port: 8768,
            protocol_info: DEFAULT_PROTOCOL_INFO.to_string(),
        }
    }
}

impl ReceiverConfig {
    /// Local URL the helper serves the stream on
    pub fn stream_uri(&self) -> String {
        format!("http://localhost:{}/Songcast.wav", self.http_port)
    }
}

/// Playback state reported by the local player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    Playing,
    Paused,
    #[default]
    Stopped,
    Unknown,
}

impl PlayerState {
    /// Receiver `TransportState` token; anything but playing reads as stopped
    pub fn receiver_token(self) -> &'static str {
        match self {
            PlayerState::Playing => "Playing",
            _ => "Stopped",
        }
    }
}

/// Local player transport
pub trait PlayerControl {
    fn state(&self) -> PlayerState;
    fn play(&mut self, position: u32) -> std::result::Result<(), PlayerError>;
    fn stop(&mut self) -> std::result::Result<(), PlayerError>;
}

/// Local player queue
pub trait Playlist {
    /// Insert an entry at `position`, returning its id
    fn insert_uri(
        &mut self,
        position: u32,
        uri: &str,
        metadata: &str,
    ) -> std::result::Result<u32, PlayerError>;

    fn remove(&mut self, id: u32) -> std::result::Result<(), PlayerError>;
}

/// The Receiver service with its collaborators
pub struct ReceiverService {
    config: ReceiverConfig,
    player: Box<dyn PlayerControl>,
    playlist: Box<dyn Playlist>,
    launcher: Box<dyn ProcessLauncher>,
    waker: Box<dyn LoopWaker>,
    helper: HelperSlot,
    uri: String,
    metadata: String,
    publisher: EventPublisher,
}

impl std::fmt::Debug for ReceiverService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverService")
            .field("config", &self.config)
            .field("helper", &self.helper)
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

impl ReceiverService {
    pub fn new(
        config: ReceiverConfig,
        player: Box<dyn PlayerControl>,
        playlist: Box<dyn Playlist>,
        launcher: Box<dyn ProcessLauncher>,
        waker: Box<dyn LoopWaker>,
    ) -> Self {
        Self {
            config,
            player,
            playlist,
            launcher,
            waker,
            helper: HelperSlot::new(),
            uri: String::new(),
            metadata: String::new(),
            publisher: EventPublisher::new(),
        }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Current sender uri and metadata
    pub fn sender(&self) -> (&str, &str) {
        (&self.uri, &self.metadata)
    }

    pub fn helper_pid(&self) -> Option<u32> {
        self.helper.pid()
    }

    pub fn transport_state(&self) -> &'static str {
        self.player.state().receiver_token()
    }

    /// Remember the sender to play from
    pub fn set_sender(&mut self, uri: &str, metadata: &str) {
        debug!(uri, metadata, "receiver sender set");
        self.uri = uri.to_string();
        self.metadata = metadata.to_string();
        self.waker.wake();
    }

    /// Start relaying the current sender
    ///
    /// Requires a sender with non-empty uri and metadata. On any failure the
    /// helper is stopped and the queued entry removed, so nothing is left
    /// behind.
    pub fn play(&mut self) -> Result<()> {
        if self.uri.is_empty() {
            error!("receiver play: no sender uri");
            return Err(ServiceError::Internal("no sender uri".to_string()));
        }
        if self.metadata.is_empty() {
            error!("receiver play: no sender metadata");
            return Err(ServiceError::Internal("no sender metadata".to_string()));
        }

        let mut inserted = None;
        let outcome = self.start_relay(&mut inserted);
        if let Err(e) = &outcome {
            error!(error = %e, "receiver play failed, cleaning up");
            self.helper.release();
            if let Some(id) = inserted {
                if let Err(e) = self.playlist.remove(id) {
                    warn!(id, error = %e, "could not remove stream entry");
                }
            }
        } else {
            self.waker.wake();
        }
        outcome
    }

    fn start_relay(&mut self, inserted: &mut Option<u32>) -> Result<()> {
        let args = vec!["-u".to_string(), self.uri.clone()];
        let pid = self
            .helper
            .replace(self.launcher.as_ref(), &self.config.helper_program, &args)?;
        info!(pid, program = %self.config.helper_program, "receiver helper running");

        let metadata = unescape_metadata(&self.metadata);
        let id = self
            .playlist
            .insert_uri(0, &self.config.stream_uri(), &metadata)?;
        *inserted = Some(id);

        self.player.play(0)?;
        Ok(())
    }

    /// Stop relaying
    ///
    /// Stopping without a running helper is allowed: the player is still
    /// told to stop.
    pub fn stop(&mut self) -> Result<()> {
        if !self.helper.release() {
            warn!("receiver stop: no helper running");
        }
        self.player.stop()?;
        self.waker.wake();
        Ok(())
    }
}

fn unescape_metadata(metadata: &str) -> String {
    match unescape(metadata) {
        Ok(text) => text.into_owned(),
        Err(e) => {
            warn!(error = %e, "metadata is not valid escaped XML, using as is");
            metadata.to_string()
        }
    }
}

fn required<'a>(args: &'a PropertySet, name: &str) -> Result<&'a str> {
    args.get(name)
        .map(String::as_str)
        .ok_or_else(|| ServiceError::InvalidArgs(format!("missing {}", name)))
}

impl EventedService for ReceiverService {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn service_id(&self) -> &str {
        SERVICE_ID
    }

    fn make_state(&self) -> ServiceSnapshot {
        ServiceSnapshot::new()
            .with("Uri", self.uri.as_str())
            .with("Metadata", self.metadata.as_str())
            .with("TransportState", self.transport_state())
            .with("ProtocolInfo", self.config.protocol_info.as_str())
    }

    fn publisher_mut(&mut self) -> &mut EventPublisher {
        &mut self.publisher
    }

    fn handle_action(&mut self, action: &str, args: &PropertySet) -> Result<Vec<(String, String)>> {
        debug!(action, "receiver action");
        match action {
            "SetSender" => {
                let uri = required(args, "Uri")?.to_string();
                let metadata = required(args, "Metadata")?.to_string();
                self.set_sender(&uri, &metadata);
                Ok(Vec::new())
            }
            "Sender" => Ok(vec![
                ("Uri".to_string(), self.uri.clone()),
                ("Metadata".to_string(), self.metadata.clone()),
            ]),
            "ProtocolInfo" => Ok(vec![(
                "Value".to_string(),
                self.config.protocol_info.clone(),
            )]),
            "TransportState" => Ok(vec![(
                "Value".to_string(),
                self.transport_state().to_string(),
            )]),
            "Play" => self.play().map(|()| Vec::new()),
            "Stop" => self.stop().map(|()| Vec::new()),
            other => Err(ServiceError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PlayerState::Playing, "Playing")]
    #[case(PlayerState::Paused, "Stopped")]
    #[case(PlayerState::Stopped, "Stopped")]
    #[case(PlayerState::Unknown, "Stopped")]
    fn test_transport_state_token(#[case] state: PlayerState, #[case] token: &str) {
        assert_eq!(state.receiver_token(), token);
    }

    #[test]
    fn test_stream_uri() {
        let config = ReceiverConfig {
            http_port: 9000,
            ..Default::default()
        };
        assert_eq!(config.stream_uri(), "http://localhost:9000/Songcast.wav");
    }

    #[test]
    fn test_unescape_metadata() {
        assert_eq!(
            unescape_metadata("&lt;DIDL-Lite&gt;&amp;&lt;/DIDL-Lite&gt;"),
            "<DIDL-Lite>&</DIDL-Lite>"
        );
        assert_eq!(unescape_metadata("a & b"), "a & b");
    }
}
