use core::fmt;

/// Outcome of a completed frame, handed to the receive/transmit completion
/// handlers.
///
/// The numeric codes are stable and match the ones peers log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FrameStatus {
    /// Frame received (or sent) intact.
    Ok = 0,
    /// Structural violation: stray unescaped delimiter or impossible length.
    Malformed = 1,
    /// Structure was fine but the checksum does not match the content.
    BadChecksum = 2,
    /// The frame did not end before the buffer filled up.
    TooLong = 3,
}

impl FrameStatus {
    /// Stable numeric code of this status.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parse a numeric status code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::Malformed),
            2 => Some(Self::BadChecksum),
            3 => Some(Self::TooLong),
            _ => None,
        }
    }

    /// Short human-readable label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Malformed => "malformed",
            Self::BadChecksum => "checksum mismatch",
            Self::TooLong => "too long frame",
        }
    }

    /// True only for a frame that passed the checksum.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
