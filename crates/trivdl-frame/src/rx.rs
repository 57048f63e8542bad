use crate::codec::compute_checksum;
use crate::frame::{Frame, FrameFlags, DELIMITER, LENGTH_INDEX, MESSAGE, SIGNATURE};
use crate::status::FrameStatus;

/// Feed one raw wire byte into the receive state machine.
///
/// Returns `None` while a frame is still being assembled and `Some(status)`
/// on every terminal transition. On a terminal transition the frame is
/// marked READY (the consumer owns it) and the machine goes back to waiting
/// for a signature; the buffer keeps the completed frame until the next
/// signature byte arrives, so consume it before feeding more bytes.
///
/// States are keyed by the cursor:
/// - `0`: only a [`DELIMITER`] starts a frame, anything else is noise.
/// - `1`: the length byte (offset of the checksum).
/// - `2..`: message bytes with doubled delimiters collapsed, then the
///   checksum at the declared offset.
pub fn incoming_char<const N: usize>(frame: &mut Frame<N>, byte: u8) -> Option<FrameStatus> {
    match frame.cursor {
        SIGNATURE => {
            if byte == DELIMITER {
                frame.push(byte);
            } else {
                log_trace!(byte, "garbage outside of frame");
            }
            None
        }
        LENGTH_INDEX => accept_length(frame, byte),
        _ => accept_body(frame, byte),
    }
}

fn accept_length<const N: usize>(frame: &mut Frame<N>, byte: u8) -> Option<FrameStatus> {
    if byte == DELIMITER {
        // Known limitation: a length equal to the delimiter is indistinguishable
        // from a new signature. Valid lengths stay below N, so this only shows
        // up on noise or with buffers larger than 0xBA bytes.
        log_warn!("length byte equals frame delimiter, dropping frame");
        frame.cursor = SIGNATURE;
        frame.flags.remove(FrameFlags::HALF_DELIMITER);
        return None;
    }

    if usize::from(byte) >= N {
        log_warn!(length = byte, capacity = N, "invalid checksum position, frame skipped");
        // Nothing of this frame was stored; make sure the previous message
        // does not show through.
        frame.buffer[LENGTH_INDEX] = MESSAGE as u8;
        return Some(complete(frame, FrameStatus::Malformed));
    }

    frame.push(byte);
    None
}

fn accept_body<const N: usize>(frame: &mut Frame<N>, byte: u8) -> Option<FrameStatus> {
    if frame.half_delimiter() {
        frame.flags.remove(FrameFlags::HALF_DELIMITER);
        if byte == DELIMITER {
            // Second half of a doubled delimiter; the first one is already stored.
            return None;
        }

        // A lone delimiter inside a frame most likely started a new frame.
        // Restart there, taking this byte as its length.
        log_warn!(byte, "single delimiter in the middle of frame, resetting frame");
        frame.flags.insert(FrameFlags::READY);
        frame.buffer[SIGNATURE] = DELIMITER;
        frame.cursor = LENGTH_INDEX;
        // An invalid length here ends the re-seeded frame too; both are
        // covered by the single Malformed below.
        let _reseeded = accept_length(frame, byte);
        return Some(FrameStatus::Malformed);
    }

    if frame.cursor >= N {
        log_warn!(capacity = N, "incoming frame buffer overrun");
        return Some(complete(frame, FrameStatus::TooLong));
    }

    if frame.cursor == frame.declared_len() {
        frame.push(byte);
        let expected = compute_checksum(frame);
        if expected != byte {
            log_warn!(
                received = byte,
                expected,
                "checksum mismatch, frame skipped"
            );
            return Some(complete(frame, FrameStatus::BadChecksum));
        }
        log_debug!(len = frame.message().len(), "frame received");
        return Some(complete(frame, FrameStatus::Ok));
    }

    if byte == DELIMITER {
        frame.flags.insert(FrameFlags::HALF_DELIMITER);
    }
    frame.push(byte);
    None
}

fn complete<const N: usize>(frame: &mut Frame<N>, status: FrameStatus) -> FrameStatus {
    frame.flags.insert(FrameFlags::READY);
    frame.flags.remove(FrameFlags::HALF_DELIMITER);
    frame.cursor = SIGNATURE;
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_CAPACITY;

    fn feed<const N: usize>(frame: &mut Frame<N>, bytes: &[u8]) -> Vec<FrameStatus> {
        bytes
            .iter()
            .filter_map(|&b| incoming_char(frame, b))
            .collect()
    }

    #[test]
    fn scenario_frame_decodes() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        let statuses = feed(&mut frame, &[0xBA, 0x05, 0x10, 0xBA, 0xBA, 0x41, 0x10]);

        assert_eq!(statuses, vec![FrameStatus::Ok]);
        assert!(frame.is_ready());
        assert_eq!(frame.message(), &[0x10, 0xBA, 0x41]);
        assert_eq!(frame.cursor(), 0);
    }

    #[test]
    fn noise_before_signature_is_ignored() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        let statuses = feed(&mut frame, &[0x00, 0x13, 0xFF, 0xBA, 0x03, 0x10, 0x13]);
        assert_eq!(statuses, vec![FrameStatus::Ok]);
        assert_eq!(frame.message(), &[0x10]);
    }

    #[test]
    fn empty_message() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        assert_eq!(feed(&mut frame, &[0xBA, 0x02, 0x02]), vec![FrameStatus::Ok]);
        assert!(frame.message().is_empty());
    }

    #[test]
    fn leading_delimiter_in_message() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        // message [0xBA, 0x01], length 4, checksum 4 + 0xBA + 1 = 0xBF
        let statuses = feed(&mut frame, &[0xBA, 0x04, 0xBA, 0xBA, 0x01, 0xBF]);
        assert_eq!(statuses, vec![FrameStatus::Ok]);
        assert_eq!(frame.message(), &[0xBA, 0x01]);
    }

    #[test]
    fn checksum_byte_equal_to_delimiter() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        assert_eq!(
            feed(&mut frame, &[0xBA, 0x03, 0xB7, 0xBA]),
            vec![FrameStatus::Ok]
        );
        assert_eq!(frame.message(), &[0xB7]);
    }

    #[test]
    fn bad_checksum() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        let statuses = feed(&mut frame, &[0xBA, 0x03, 0x10, 0x14]);
        assert_eq!(statuses, vec![FrameStatus::BadChecksum]);
        assert!(frame.is_ready());
        assert_eq!(frame.cursor(), 0);
    }

    #[test]
    fn length_beyond_capacity_is_malformed() {
        let mut frame = Frame::<8>::new();
        assert_eq!(feed(&mut frame, &[0xBA, 0x08]), vec![FrameStatus::Malformed]);
        assert_eq!(frame.cursor(), 0);
    }

    #[test]
    fn invalid_length_hides_previous_message() {
        let mut frame = Frame::<8>::new();
        assert_eq!(feed(&mut frame, &[0xBA, 0x03, 0x10, 0x13]), vec![FrameStatus::Ok]);
        assert_eq!(frame.message(), &[0x10]);

        frame.release();
        assert_eq!(feed(&mut frame, &[0xBA, 0x09]), vec![FrameStatus::Malformed]);
        assert!(frame.message().is_empty());
    }

    #[test]
    fn length_equal_to_delimiter_resyncs_silently() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        assert!(feed(&mut frame, &[0xBA, 0xBA]).is_empty());
        assert_eq!(frame.cursor(), 0);
        assert!(!frame.is_ready());

        assert_eq!(feed(&mut frame, &[0xBA, 0x03, 0x10, 0x13]), vec![FrameStatus::Ok]);
    }

    #[test]
    fn length_below_message_runs_into_overrun() {
        let mut frame = Frame::<8>::new();
        let mut bytes = vec![0xBA, 0x01];
        bytes.extend_from_slice(&[0x11; 7]);
        assert_eq!(feed(&mut frame, &bytes), vec![FrameStatus::TooLong]);
        assert_eq!(frame.cursor(), 0);
    }

    #[test]
    fn stray_delimiter_restarts_frame() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        // A frame cut short by a fresh one: BA 06 10 | BA 03 20 23
        let statuses = feed(&mut frame, &[0xBA, 0x06, 0x10, 0xBA, 0x03, 0x20, 0x23]);
        assert_eq!(statuses, vec![FrameStatus::Malformed, FrameStatus::Ok]);
        assert_eq!(frame.message(), &[0x20]);
    }

    #[test]
    fn stray_delimiter_with_invalid_length_resyncs() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        let statuses = feed(&mut frame, &[0xBA, 0x06, 0x10, 0xBA, 0x41]);
        assert_eq!(statuses, vec![FrameStatus::Malformed]);
        assert_eq!(frame.cursor(), 0);
        assert!(frame.is_ready());
        assert!(frame.message().is_empty());

        assert_eq!(feed(&mut frame, &[0xBA, 0x03, 0x10, 0x13]), vec![FrameStatus::Ok]);
    }

    #[test]
    fn recovers_after_every_error() {
        let mut frame = Frame::<FRAME_CAPACITY>::new();
        let good = [0xBA, 0x03, 0x10, 0x13];

        for garbage in [
            &[0xBA, 0x03, 0x10, 0x99][..],
            &[0xBA, 0x7F][..],
            &[0xBA, 0x06, 0x01, 0xBA, 0x50][..],
        ] {
            let statuses = feed(&mut frame, garbage);
            assert_eq!(statuses.len(), 1);
            assert!(!statuses[0].is_ok());

            frame.release();
            assert_eq!(feed(&mut frame, &good), vec![FrameStatus::Ok]);
            assert_eq!(frame.message(), &[0x10]);
        }
    }
}
