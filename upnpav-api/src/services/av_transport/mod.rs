//! AVTransport service: playback control and transport events
//!
//! # Control Operations
//! ```rust,ignore
//! use upnpav_api::services::av_transport::AVTransportService;
//!
//! let avt = AVTransportService::new(SoapClient::new(), control_url);
//! avt.play(1)?;
//! avt.seek("REL_TIME", 90)?;
//! ```
//!
//! # Event Handling
//! ```rust,ignore
//! use upnpav_api::services::av_transport::AVTransportEvents;
//!
//! let mut events = AVTransportEvents::new();
//! events.set_reporter(|name: &str, value: StateValue| println!("{name} = {value:?}"));
//! events.on_event(&parse_event_body(body)?);
//! ```

pub mod events;
pub mod operations;

pub use events::{decode_variable, AVTransportEvents};
pub use operations::*;
