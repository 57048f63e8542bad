use core::fmt;

use crate::error::{FrameError, Result};
use crate::frame::{Frame, FrameFlags, DELIMITER, LENGTH_INDEX, MESSAGE, OVERHEAD, SIGNATURE};

/// Largest payload a `Frame<N>` can carry (checksum lands on `N - 1`).
pub const fn max_payload<const N: usize>() -> usize {
    N - OVERHEAD
}

/// 8-bit wrapping sum over the length byte and every message byte.
pub fn compute_checksum<const N: usize>(frame: &Frame<N>) -> u8 {
    let end = frame.declared_len().min(N);
    frame
        .buffer
        .get(LENGTH_INDEX..end)
        .unwrap_or_default()
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Encode `payload` into `frame`.
///
/// Buffer layout after a successful call:
/// ```text
/// ┌────────────┬──────────┬──────────────────┬──────────┐
/// │ 0xBA       │ LENGTH   │ payload          │ CHECKSUM │
/// │ offset 0   │ offset 1 │ offset 2..LENGTH │ LENGTH   │
/// └────────────┴──────────┴──────────────────┴──────────┘
/// ```
///
/// The payload is copied as-is; delimiter doubling happens byte by byte in
/// [`outgoing_char`](crate::outgoing_char), so the buffer never needs room
/// for escapes. The frame is reset first, so a failed call leaves it empty
/// with the cursor at the signature and not [`built`](Frame::is_built).
pub fn build_frame<const N: usize>(frame: &mut Frame<N>, payload: &[u8]) -> Result<()> {
    frame.reset();

    let max = max_payload::<N>();
    if payload.len() > max {
        log_warn!(size = payload.len(), max, "payload does not fit in frame");
        return Err(FrameError::EncodeOverflow {
            size: payload.len(),
            max,
        });
    }

    let last = MESSAGE + payload.len();
    let length = u8::try_from(last).map_err(|_| FrameError::EncodeOverflow {
        size: payload.len(),
        max,
    })?;

    frame.buffer[SIGNATURE] = DELIMITER;
    frame.buffer[LENGTH_INDEX] = length;
    frame.buffer[MESSAGE..last].copy_from_slice(payload);
    frame.buffer[last] = compute_checksum(frame);
    frame.flags.insert(FrameFlags::BUILT);
    Ok(())
}

/// Number of buffer bytes in a built frame, signature through checksum.
pub fn encoded_len<const N: usize>(frame: &Frame<N>) -> usize {
    frame.as_bytes().len()
}

/// Number of bytes [`outgoing_char`](crate::outgoing_char) emits for a built
/// frame, counting the doubled delimiters.
pub fn wire_len<const N: usize>(frame: &Frame<N>) -> usize {
    let doubled = frame.message().iter().filter(|&&b| b == DELIMITER).count();
    encoded_len(frame) + doubled
}

/// Displays bytes as ` 0xba 0x5 ...`, the format used in frame diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct FrameHex<'a>(&'a [u8]);

impl<'a> FrameHex<'a> {
    /// Wrap arbitrary bytes, e.g. a received message.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for FrameHex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, " 0x{byte:x}")?;
        }
        Ok(())
    }
}

/// Hex dump of a frame's unescaped bytes, signature through checksum.
pub fn frame_hex<const N: usize>(frame: &Frame<N>) -> FrameHex<'_> {
    FrameHex::new(frame.as_bytes())
}
