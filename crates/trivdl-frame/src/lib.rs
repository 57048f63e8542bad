//! Byte-stuffed, checksummed framing for a single UART link.
//!
//! This is the engine of trivdl. Every message travels as:
//! - A signature byte [`DELIMITER`] (`0xBA`)
//! - A length byte holding the buffer offset of the checksum
//! - The message bytes, with every `0xBA` doubled on the wire
//! - An 8-bit wrapping checksum over the length byte and the message
//!
//! The crate never allocates. [`rx::incoming_char`] and [`tx::outgoing_char`]
//! work one byte at a time over an explicit [`Frame`], so the same code runs
//! from a UART interrupt handler or from the host reactor in `trivdl-reactor`.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod codec;
pub mod error;
pub mod frame;
pub mod line;
pub mod rx;
pub mod status;
pub mod tx;

pub use codec::{
    build_frame, compute_checksum, encoded_len, frame_hex, max_payload, wire_len, FrameHex,
};
pub use error::{FrameError, Result};
pub use frame::{
    Frame, FrameFlags, DELIMITER, FRAME_CAPACITY, LENGTH_INDEX, MESSAGE, MIN_FRAME_SIZE, OVERHEAD,
    SIGNATURE,
};
pub use line::{Line, LineFlags, TxByte};
pub use rx::incoming_char;
pub use status::FrameStatus;
pub use tx::outgoing_char;
