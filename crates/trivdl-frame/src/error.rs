/// Errors reported synchronously to the caller that prepares an outgoing frame.
///
/// Per-byte receive failures are not errors; they surface as a
/// [`FrameStatus`](crate::FrameStatus) from [`incoming_char`](crate::incoming_char).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The payload does not fit in the frame buffer.
    #[error("payload too large to encode ({size} bytes, max {max})")]
    EncodeOverflow { size: usize, max: usize },

    /// No complete frame has been encoded for transmission.
    #[error("no encoded frame to transmit")]
    NotBuilt,

    /// The outgoing frame is still being transmitted.
    #[error("outgoing frame is still owned by the transmitter")]
    Busy,
}

/// Result alias for framing operations.
pub type Result<T> = core::result::Result<T, FrameError>;
