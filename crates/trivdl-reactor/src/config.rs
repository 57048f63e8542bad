use std::time::Duration;

/// Configuration for the reactor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorConfig {
    /// Wait used before the first idle callback. Default: zero, so the loop
    /// first drains whatever I/O is already pending.
    pub initial_timeout: Duration,
    /// Wait for every written byte to leave the device before the next
    /// iteration. Default: true.
    pub drain_each_byte: bool,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            initial_timeout: Duration::ZERO,
            drain_each_byte: true,
        }
    }
}
