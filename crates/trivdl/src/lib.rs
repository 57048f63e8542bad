//! Trivial data-link framing for UART links.
//!
//! trivdl turns an unframed serial byte stream into checksum-verified
//! messages, with the same per-byte engine on a microcontroller (driven from
//! interrupt handlers) and on a host (driven by a readiness loop).
//!
//! # Crate Structure
//!
//! - [`frame`]: Frame buffer, encoder, receive state machine, transmit generator, line
//! - [`transport`]: Serial device open/configure and the link trait
//! - [`reactor`]: Host event loop and completion callbacks

/// Re-export framing engine types.
pub mod frame {
    pub use trivdl_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use trivdl_transport::*;
}

/// Re-export reactor types.
pub mod reactor {
    pub use trivdl_reactor::*;
}
