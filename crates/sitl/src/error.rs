use subsumption_core::behavior::ArenaError;
use subsumption_rover::parameters::ParameterError;
use subsumption_rover::platform::PlatformError;

/// Errors that can occur while wiring or running the simulated rover.
#[derive(Debug, thiserror::Error)]
pub enum SitlError {
    #[error("Behavior wiring failed: {0}")]
    Wiring(ArenaError),

    #[error("Parameter error: {0}")]
    Parameter(ParameterError),

    #[error("Platform error: {0}")]
    Platform(PlatformError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ArenaError> for SitlError {
    fn from(error: ArenaError) -> Self {
        SitlError::Wiring(error)
    }
}

impl From<ParameterError> for SitlError {
    fn from(error: ParameterError) -> Self {
        SitlError::Parameter(error)
    }
}

impl From<PlatformError> for SitlError {
    fn from(error: PlatformError) -> Self {
        SitlError::Platform(error)
    }
}
