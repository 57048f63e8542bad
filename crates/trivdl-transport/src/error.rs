use std::path::PathBuf;

/// Errors that can occur while opening or driving a serial link.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to apply line settings to the device.
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested baud rate has no termios equivalent.
    #[error("unsupported baud rate {0}")]
    UnsupportedBaud(u32),

    /// An I/O error occurred on the link.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for serial transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
