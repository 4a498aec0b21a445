//! Error types for the measurement core

use thiserror::Error;

/// Result type alias for measurement operations
pub type Result<T> = std::result::Result<T, MeasureError>;

#[derive(Error, Debug)]
pub enum MeasureError {
    /// Acquisition device could not be opened; fatal at startup
    #[error("camera unavailable: {reason}")]
    DeviceUnavailable { reason: String },

    /// Acquisition device stopped yielding frames mid-session; fatal
    #[error("camera stream ended")]
    EndOfStream,

    /// Zero/negative reference length or coincident calibration points;
    /// recoverable, the user retries
    #[error("invalid calibration input: {reason}")]
    InvalidCalibrationInput { reason: String },
}

impl MeasureError {
    /// Whether the session can continue after reporting this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MeasureError::InvalidCalibrationInput { .. })
    }
}
