/// Convenience result type used across the renderer and its wire protocol.
pub type SirenResult<T> = Result<T, SirenError>;

/// Top-level error taxonomy used by raster, protocol and service APIs.
#[derive(thiserror::Error, Debug)]
pub enum SirenError {
    /// A pixel buffer was requested with a non-positive width or height.
    #[error("invalid dimension: {width}x{height} (both must be > 0)")]
    InvalidDimension {
        /// Requested width.
        width: i64,
        /// Requested height.
        height: i64,
    },

    /// The socket was closed or reset while reading or writing.
    #[error("transport failure: {0}")]
    Transport(#[source] std::io::Error),

    /// Declared sizes in the byte stream do not match what was actually sent.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// Invalid user-provided configuration or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or file IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SirenError {
    /// Build a [`SirenError::InvalidDimension`] value.
    pub fn invalid_dimension(width: impl Into<i64>, height: impl Into<i64>) -> Self {
        Self::InvalidDimension {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Build a [`SirenError::MalformedStream`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedStream(msg.into())
    }

    /// Build a [`SirenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Classify a socket-level error.
    ///
    /// An early end of stream means the peer declared more data than it sent, so it is
    /// reported as [`SirenError::MalformedStream`]; anything else is a transport failure.
    pub fn from_io(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::MalformedStream(format!("stream ended early: {err}"))
        } else {
            Self::Transport(err)
        }
    }

    /// True for failures caused by the peer or the connection rather than local state.
    pub fn is_connection_fault(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::MalformedStream(_))
    }
}

impl From<std::io::Error> for SirenError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io(err)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
