//! UPnP AV control point
//!
//! Typed access to remote AVTransport and ContentDirectory services. Actions
//! go out through an [`ActionTransport`] (normally
//! [`soap_client::SoapClient`]); events come back in as property sets and
//! are decoded into [`StateValue`]s for a single [`ChangeReporter`].
//!
//! ```rust,ignore
//! use upnpav_api::{AVTransportService, SoapClient};
//!
//! let avt = AVTransportService::new(SoapClient::new(), "http://192.168.1.20:49152/ctl/AVTransport");
//! let info = avt.get_transport_info()?;
//! println!("{} ({})", info.state, info.status);
//! ```
//!
//! Every failure carries a status code in the UPnP library's integer space,
//! see [`error::status`] and [`ApiError::code`].

pub mod action;
pub mod didl;
pub mod duration;
pub mod error;
pub mod events;
pub mod property_set;
pub mod service;
pub mod services;
pub mod transport;
pub mod types;

pub use action::{ActionArgs, ActionResult, ServiceClient};
pub use didl::{DirContent, DirObject, DirResource, ObjectKind};
pub use duration::{format_duration, parse_duration};
pub use error::{status, status_of, ApiError, Result};
pub use events::{ChangeReporter, EventSummary, StateValue};
pub use property_set::{decode_last_change, parse_event_body, LastChange, PropertySet};
pub use service::Service;
pub use services::av_transport::{
    AVTransportEvents, AVTransportService, DeviceCapabilities, MediaInfo, PositionInfo,
    TransportInfo, TransportSettings,
};
pub use services::content_directory::{BrowseConfig, ContentDirectoryService};
pub use soap_client::{SoapClient, SoapConfig, SoapError};
pub use transport::ActionTransport;
pub use types::{Lenient, PlayMode, SeekMode, TransportState, TransportStatus, WireToken};
