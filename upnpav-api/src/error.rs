use soap_client::SoapError;
use thiserror::Error;

/// Status codes reported to callers, in the UPnP library's integer space
///
/// `SUCCESS` is the only non-error value. Positive values are UPnP error
/// codes returned by the remote device in a SOAP fault and are passed through
/// unchanged.
pub mod status {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_PARAM: i32 = -101;
    pub const BAD_RESPONSE: i32 = -113;
    pub const SOCKET_CONNECT: i32 = -204;
    pub const INTERNAL_ERROR: i32 = -911;
}

/// Errors returned by control point operations
///
/// Every variant resolves to a status code through [`ApiError::code`], so
/// callers that only care about the integer status can discard the rest.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not reach the device or the request timed out
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The device answered with something that is not a usable response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault: error code {0}")]
    SoapFault(u16),

    /// A caller-supplied argument was rejected before contacting the device
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Local failure not attributable to the caller or the device
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// The status code for this error
    pub fn code(&self) -> i32 {
        match self {
            ApiError::NetworkError(_) => status::SOCKET_CONNECT,
            ApiError::ParseError(_) => status::BAD_RESPONSE,
            ApiError::SoapFault(code) => i32::from(*code),
            ApiError::InvalidParameter(_) => status::INVALID_PARAM,
            ApiError::InternalError(_) => status::INTERNAL_ERROR,
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Status code of an operation outcome: `0` on success, the error's code
/// otherwise
pub fn status_of<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => status::SUCCESS,
        Err(e) => e.code(),
    }
}

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => ApiError::NetworkError(msg),
            SoapError::Http(code) => ApiError::NetworkError(format!("HTTP status {}", code)),
            SoapError::Parse(msg) => ApiError::ParseError(msg),
            SoapError::Fault(code) => ApiError::SoapFault(code),
        }
    }
}
