//! Control points for the individual UPnP services

pub mod av_transport;
pub mod content_directory;

pub use av_transport::*;
pub use content_directory::{BrowseConfig, ContentDirectoryService};
