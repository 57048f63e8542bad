/// Errors that stop the reactor loop.
///
/// Framing failures never show up here; they are reported per frame through
/// [`LineHandler::on_frame_received`](crate::LineHandler::on_frame_received).
#[derive(Debug, thiserror::Error)]
pub enum ReactorError {
    /// Opening or configuring the link failed.
    #[error("transport error: {0}")]
    Transport(#[from] trivdl_transport::TransportError),

    /// A wait, read, write or drain call failed.
    #[error("reactor I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link reported end of file.
    #[error("link closed")]
    Closed,
}

/// Result alias for reactor operations.
pub type Result<T> = std::result::Result<T, ReactorError>;
