use crate::codec::build_frame;
use crate::error::{FrameError, Result};
use crate::frame::{Frame, FRAME_CAPACITY};
use crate::rx::incoming_char;
use crate::status::FrameStatus;
use crate::tx::outgoing_char;

/// Control bits of a [`Line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LineFlags(u8);

impl LineFlags {
    /// Ask the host reactor to return after the current iteration.
    pub const EXIT_REQUESTED: Self = Self(0b100);

    /// No bits set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

/// One byte handed out by [`Line::pull_tx_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxByte {
    /// Raw wire byte.
    pub byte: u8,
    /// This was the final byte of the frame; the frame is released.
    pub last: bool,
}

/// One managed serial link: a receive frame, a transmit frame, control flags
/// and an opaque user context.
///
/// The line holds no I/O handle. Interrupt handlers call
/// [`receive_byte`](Self::receive_byte) and [`pull_tx_byte`](Self::pull_tx_byte)
/// directly; on a host the reactor pairs a line with a serial link.
#[derive(Debug, Clone)]
pub struct Line<U = (), const N: usize = FRAME_CAPACITY> {
    rx: Frame<N>,
    tx: Frame<N>,
    flags: LineFlags,
    user: U,
}

impl<U, const N: usize> Line<U, N> {
    /// A line with empty frames, carrying `user` for the callbacks.
    pub const fn new(user: U) -> Self {
        Self {
            rx: Frame::new(),
            tx: Frame::new(),
            flags: LineFlags::empty(),
            user,
        }
    }

    /// Receive-side frame.
    pub fn rx(&self) -> &Frame<N> {
        &self.rx
    }

    /// Mutable receive-side frame.
    pub fn rx_mut(&mut self) -> &mut Frame<N> {
        &mut self.rx
    }

    /// Transmit-side frame.
    pub fn tx(&self) -> &Frame<N> {
        &self.tx
    }

    /// Mutable transmit-side frame.
    pub fn tx_mut(&mut self) -> &mut Frame<N> {
        &mut self.tx
    }

    /// The user context.
    pub fn user(&self) -> &U {
        &self.user
    }

    /// Mutable user context.
    pub fn user_mut(&mut self) -> &mut U {
        &mut self.user
    }

    /// Consume the line and return the user context.
    pub fn into_user(self) -> U {
        self.user
    }

    /// Current control bits.
    pub fn flags(&self) -> LineFlags {
        self.flags
    }

    /// Encode `payload` into the transmit frame without starting transmission.
    ///
    /// Fails with [`FrameError::Busy`] while a previous frame is still being
    /// sent.
    pub fn encode(&mut self, payload: &[u8]) -> Result<()> {
        if self.tx.is_ready() {
            return Err(FrameError::Busy);
        }
        build_frame(&mut self.tx, payload)
    }

    /// Hand the transmit frame to the transmitter, starting from its first byte.
    ///
    /// Fails with [`FrameError::NotBuilt`] unless the last
    /// [`encode`](Self::encode) succeeded, and with [`FrameError::Busy`]
    /// while the frame is still being sent.
    pub fn mark_tx_ready(&mut self) -> Result<()> {
        if self.tx.is_ready() {
            return Err(FrameError::Busy);
        }
        if !self.tx.is_built() {
            return Err(FrameError::NotBuilt);
        }
        self.tx.rewind();
        self.tx.set_ready();
        Ok(())
    }

    /// Encode `payload` and mark it ready for transmission.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.encode(payload)?;
        self.mark_tx_ready()
    }

    /// Whether the transmitter still owns an unfinished frame.
    pub fn tx_pending(&self) -> bool {
        self.tx.is_ready() && !self.tx.is_drained()
    }

    /// Next wire byte of the transmit frame, if one is ready.
    ///
    /// After the last byte the frame is released back to the producer, so an
    /// interrupt-driven transmitter disables its TX interrupt on
    /// [`TxByte::last`].
    pub fn pull_tx_byte(&mut self) -> Option<TxByte> {
        if !self.tx.is_ready() {
            return None;
        }
        let byte = outgoing_char(&mut self.tx)?;
        let last = self.tx.is_drained();
        if last {
            self.tx.release();
        }
        Some(TxByte { byte, last })
    }

    /// Feed one received wire byte. See [`incoming_char`].
    pub fn receive_byte(&mut self, byte: u8) -> Option<FrameStatus> {
        incoming_char(&mut self.rx, byte)
    }

    /// Whether a completed receive frame is waiting for the consumer.
    pub fn rx_owned_by_consumer(&self) -> bool {
        self.rx.is_ready()
    }

    /// Message of the last completed receive frame.
    pub fn rx_message(&self) -> &[u8] {
        self.rx.message()
    }

    /// Give the receive frame back to the engine after consuming it.
    pub fn release_rx(&mut self) {
        self.rx.release();
    }

    /// Ask the host loop to stop after the current iteration.
    pub fn request_exit(&mut self) {
        self.flags.insert(LineFlags::EXIT_REQUESTED);
    }

    /// Whether an exit request is pending.
    pub fn exit_requested(&self) -> bool {
        self.flags.contains(LineFlags::EXIT_REQUESTED)
    }

    /// Check and clear the exit request.
    pub fn take_exit_request(&mut self) -> bool {
        let requested = self.exit_requested();
        self.flags.remove(LineFlags::EXIT_REQUESTED);
        requested
    }
}

impl<U: Default, const N: usize> Default for Line<U, N> {
    fn default() -> Self {
        Self::new(U::default())
    }
}
