use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("{0}")]
    Error(String),
    #[error("InvalidArgument {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Connection(#[from] xcb::ConnError),
    #[error(transparent)]
    Xcb(#[from] xcb::Error),
}

impl CaptureError {
    pub fn new<S: ToString>(err: S) -> Self {
        CaptureError::Error(err.to_string())
    }

    pub fn invalid_argument<S: ToString>(err: S) -> Self {
        CaptureError::InvalidArgument(err.to_string())
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;
