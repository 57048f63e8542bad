use crate::frame::{Frame, FrameFlags, DELIMITER, MESSAGE};

/// Produce the next wire byte of a built frame.
///
/// Call once per free transmit slot until it returns `None`. A message byte
/// equal to [`DELIMITER`] is emitted twice: the first call returns the
/// doubling byte and leaves the cursor in place, the second emits the stored
/// byte and advances. Signature, length and checksum are sent verbatim.
pub fn outgoing_char<const N: usize>(frame: &mut Frame<N>) -> Option<u8> {
    if frame.is_drained() {
        return None;
    }

    let byte = frame.buffer[frame.cursor];
    let in_message = (MESSAGE..frame.declared_len()).contains(&frame.cursor);
    if in_message && byte == DELIMITER {
        if frame.half_delimiter() {
            frame.flags.remove(FrameFlags::HALF_DELIMITER);
        } else {
            frame.flags.insert(FrameFlags::HALF_DELIMITER);
            return Some(DELIMITER);
        }
    }

    frame.cursor += 1;
    Some(byte)
}
