//! Serial device transport for trivdl.
//!
//! Provides the byte-level link the host reactor multiplexes:
//! - [`SerialLink`]: a readable, writable, pollable handle that can wait for
//!   its output to drain
//! - [`SerialPort`]: a UART device opened and configured through termios
//!
//! Device setup (baud rate, raw mode) lives here so the framing engine never
//! sees it.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod serial;

pub use config::{SerialConfig, DEFAULT_BAUD};
pub use error::{Result, TransportError};
#[cfg(unix)]
pub use serial::SerialPort;
#[cfg(unix)]
pub use traits::SerialLink;
