use thiserror::Error;
use upnpav_api::status;

/// UPnP "Invalid Action" error code
pub const INVALID_ACTION: i32 = 401;

/// Errors returned by service action handlers
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required input argument is missing or unusable
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// The service does not implement this action
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The action could not be carried out
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Status code reported back to the control point
    pub fn code(&self) -> i32 {
        match self {
            ServiceError::InvalidArgs(_) => status::INVALID_PARAM,
            ServiceError::UnknownAction(_) => INVALID_ACTION,
            ServiceError::Internal(_) => status::INTERNAL_ERROR,
        }
    }
}

impl From<ProcessError> for ServiceError {
    fn from(error: ProcessError) -> Self {
        ServiceError::Internal(error.to_string())
    }
}

impl From<PlayerError> for ServiceError {
    fn from(error: PlayerError) -> Self {
        ServiceError::Internal(error.to_string())
    }
}

/// Helper process failures
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to terminate process {pid}: {source}")]
    TerminateFailed {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by the local player or its playlist
#[derive(Debug, Error)]
#[error("Player error: {0}")]
pub struct PlayerError(pub String);

/// Type alias for action handler results
pub type Result<T> = std::result::Result<T, ServiceError>;
