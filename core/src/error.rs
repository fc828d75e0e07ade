use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FfttError {
    #[error("Input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("Malformed WAV container: {0}")]
    MalformedContainer(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Payload of {0} samples does not fit in a WAV data chunk")]
    PayloadTooLarge(usize),

    #[error("WAV encoding failed: {0}")]
    WavEncode(hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for FfttError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => FfttError::Io(e),
            other => FfttError::WavEncode(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FfttError>;
