//! Error types for rawgram

use thiserror::Error;

/// Result type alias for rawgram operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rawgram
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying send/receive primitive reported an OS-level failure
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload would overflow a 16-bit on-wire length field
    #[error("Payload of {len} bytes exceeds the {max}-byte UDP maximum")]
    BufferTooLarge { len: usize, max: usize },

    /// Received bytes end before the offsets demanded by on-wire length fields
    #[error("Frame truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    /// Valid frame, but not from the expected peer.
    ///
    /// Never surfaced to callers of `Session::receive`; the receive loop
    /// recovers by reading the next frame.
    #[error("Frame not from the expected peer")]
    NotFromPeer,

    /// Zero-length read: the transport was closed on the other side
    #[error("Transport closed by peer")]
    TransportClosed,

    /// Frame construction error
    #[error("Frame construction error: {0}")]
    FrameConstruction(String),

    /// Frame parsing error
    #[error("Frame parsing error: {0}")]
    FrameParsing(String),

    /// Network interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Endpoint is missing a field required by the active socket mode
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl Error {
    /// Create a frame construction error with a custom message
    pub fn construction<S: Into<String>>(msg: S) -> Self {
        Error::FrameConstruction(msg.into())
    }

    /// Create a frame parsing error with a custom message
    pub fn parsing<S: Into<String>>(msg: S) -> Self {
        Error::FrameParsing(msg.into())
    }
}
