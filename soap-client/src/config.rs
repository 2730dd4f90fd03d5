//! Configuration for the SOAP client

use std::time::Duration;

/// HTTP settings used by [`SoapClient`](crate::SoapClient)
///
/// The client performs no retries; these values only bound how long a single
/// action may block the caller.
#[derive(Debug, Clone)]
pub struct SoapConfig {
    /// Timeout for establishing the TCP connection
    /// Default: 5 seconds
    pub connect_timeout: Duration,

    /// Timeout for reading the response
    /// Default: 10 seconds
    pub read_timeout: Duration,

    /// Value of the `User-Agent` header
    /// Default: "upnpav/<crate version> UPnP/1.0"
    pub user_agent: String,
}

impl Default for SoapConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            user_agent: format!("upnpav/{} UPnP/1.0", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SoapConfig {
    /// Create a new SoapConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorter timeouts for interactive tools talking to a local network
    pub fn interactive() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }
}
