/// Baud rate used when none is configured.
pub const DEFAULT_BAUD: u32 = 9600;

/// Line settings applied when a serial device is opened.
///
/// The port is always put in raw 8N1 mode without flow control; only the
/// speed and the termios read thresholds are configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line speed in bits per second.
    pub baud: u32,
    /// `VMIN`: minimum bytes for a blocking read to return.
    pub min_bytes: u8,
    /// `VTIME`: read timeout in tenths of a second.
    pub read_timeout_deciseconds: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: DEFAULT_BAUD,
            min_bytes: 0,
            read_timeout_deciseconds: 5,
        }
    }
}

impl SerialConfig {
    /// Default settings at a different speed.
    pub fn with_baud(baud: u32) -> Self {
        Self {
            baud,
            ..Self::default()
        }
    }
}
