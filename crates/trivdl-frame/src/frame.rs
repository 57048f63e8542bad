use core::fmt;

/// Signature byte opening every frame; doubled when it appears in a message.
pub const DELIMITER: u8 = 0xBA;

/// Default frame buffer capacity in bytes.
pub const FRAME_CAPACITY: usize = 64;

/// Buffer offset of the signature byte.
pub const SIGNATURE: usize = 0;
/// Buffer offset of the length byte (which holds the checksum offset).
pub const LENGTH_INDEX: usize = 1;
/// Buffer offset of the first message byte.
pub const MESSAGE: usize = 2;

/// Signature + length + checksum.
pub const OVERHEAD: usize = 3;
/// Smallest buffer able to carry a one-byte message.
pub const MIN_FRAME_SIZE: usize = OVERHEAD + 1;

/// Per-frame status bits.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FrameFlags(u8);

impl FrameFlags {
    /// Ownership bit.
    ///
    /// RX: set when a frame completed and the consumer owns the buffer.
    /// TX: set while the transmitter owns the buffer and drains it.
    pub const READY: Self = Self(0b01);
    /// One half of a doubled delimiter has been sent or received.
    pub const HALF_DELIMITER: Self = Self(0b10);
    /// TX: the buffer holds a complete encoded frame.
    pub const BUILT: Self = Self(0b100);

    /// No bits set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit pattern.
    pub const fn bits(self) -> u8 {
        self.0
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

impl fmt::Debug for FrameFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameFlags")
            .field("ready", &self.contains(Self::READY))
            .field("half_delimiter", &self.contains(Self::HALF_DELIMITER))
            .field("built", &self.contains(Self::BUILT))
            .finish()
    }
}

/// Fixed-capacity storage for one in-flight message in one direction.
///
/// The buffer always holds the unescaped frame
/// `[DELIMITER][LENGTH][message...][CHECKSUM]`; escaping only exists on the
/// wire. `cursor` is the next write position while receiving and the next
/// read position while transmitting.
#[derive(Debug, Clone)]
pub struct Frame<const N: usize = FRAME_CAPACITY> {
    pub(crate) buffer: [u8; N],
    pub(crate) cursor: usize,
    pub(crate) flags: FrameFlags,
}

impl<const N: usize> Frame<N> {
    // The length byte is a u8 offset, so the checksum must sit below 256.
    const CAPACITY_CHECK: () = assert!(
        N >= MIN_FRAME_SIZE && N <= 256,
        "frame capacity must be within 4..=256 bytes"
    );

    /// An empty frame awaiting its signature byte.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;
        Self {
            buffer: [0; N],
            cursor: SIGNATURE,
            flags: FrameFlags::empty(),
        }
    }

    /// Start a new frame attempt: cursor back to the signature, flags cleared.
    ///
    /// A reset transmit frame is no longer [`built`](Self::is_built) and
    /// cannot be handed to the transmitter until it is encoded again.
    pub fn reset(&mut self) {
        self.cursor = SIGNATURE;
        self.flags = FrameFlags::empty();
    }

    /// Rewind an already built frame so it can be transmitted again.
    pub fn rewind(&mut self) {
        self.cursor = SIGNATURE;
        self.flags.remove(FrameFlags::HALF_DELIMITER);
    }

    /// Buffer size `N`.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Next write (RX) or read (TX) position in the buffer.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current status bits.
    pub const fn flags(&self) -> FrameFlags {
        self.flags
    }

    /// Whether the READY ownership bit is set.
    pub const fn is_ready(&self) -> bool {
        self.flags.contains(FrameFlags::READY)
    }

    /// Set the READY bit, handing the frame over.
    pub fn set_ready(&mut self) {
        self.flags.insert(FrameFlags::READY);
    }

    /// Clear the READY bit, handing the frame back.
    pub fn release(&mut self) {
        self.flags.remove(FrameFlags::READY);
    }

    /// Whether the buffer holds a complete encoded frame.
    pub const fn is_built(&self) -> bool {
        self.flags.contains(FrameFlags::BUILT)
    }

    pub(crate) const fn half_delimiter(&self) -> bool {
        self.flags.contains(FrameFlags::HALF_DELIMITER)
    }

    /// The length byte: buffer offset of the checksum.
    pub const fn declared_len(&self) -> usize {
        self.buffer[LENGTH_INDEX] as usize
    }

    /// Message bytes between the length byte and the checksum.
    pub fn message(&self) -> &[u8] {
        let end = self.declared_len().clamp(MESSAGE, N);
        &self.buffer[MESSAGE..end]
    }

    /// The unescaped frame, signature through checksum.
    pub fn as_bytes(&self) -> &[u8] {
        let end = (self.declared_len() + 1).clamp(MESSAGE, N);
        &self.buffer[..end]
    }

    /// Stored checksum byte, if the length byte points inside the buffer.
    pub fn checksum(&self) -> Option<u8> {
        self.buffer.get(self.declared_len()).copied()
    }

    /// TX: every byte up to and including the checksum has been emitted.
    pub const fn is_drained(&self) -> bool {
        self.cursor > self.declared_len() || self.cursor >= N
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.buffer[self.cursor] = byte;
        self.cursor += 1;
    }
}

impl<const N: usize> Default for Frame<N> {
    fn default() -> Self {
        Self::new()
    }
}
