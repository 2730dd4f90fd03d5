//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur while invoking a UPnP action over SOAP
#[derive(Debug, Error)]
pub enum SoapError {
    /// Connection refused, timeout, or any other transport-level failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// Non-success HTTP status without a decodable SOAP fault body
    #[error("HTTP status {0}")]
    Http(u16),

    /// Response body is not a usable SOAP envelope
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// UPnP error code carried by a SOAP fault
    #[error("SOAP fault: error code {0}")]
    Fault(u16),
}

impl SoapError {
    /// Whether the device answered with a UPnP error (as opposed to the
    /// request never completing)
    pub fn is_fault(&self) -> bool {
        matches!(self, SoapError::Fault(_))
    }
}
