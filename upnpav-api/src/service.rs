/// UPnP services this crate can drive as a control point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// AVTransport service - playback control (play, pause, stop, seek, etc.)
    AVTransport,

    /// ContentDirectory service - browsing and searching a media server
    ContentDirectory,
}

impl Service {
    /// Get the name of this service as a string
    pub fn name(&self) -> &'static str {
        match self {
            Service::AVTransport => "AVTransport",
            Service::ContentDirectory => "ContentDirectory",
        }
    }

    /// Versioned service type used in SOAP requests
    pub fn service_type(&self) -> &'static str {
        match self {
            Service::AVTransport => "urn:schemas-upnp-org:service:AVTransport:1",
            Service::ContentDirectory => "urn:schemas-upnp-org:service:ContentDirectory:1",
        }
    }
}
