//! Host-side event loop for trivdl lines.
//!
//! The reactor waits for readiness on one serial link, moves exactly one
//! byte per readiness event through the framing engine, and reports whole
//! frames to a [`LineHandler`]. When nothing happens within the current
//! timeout it calls [`LineHandler::on_idle`], which returns the next one.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handler;

#[cfg(unix)]
mod poll;
#[cfg(unix)]
pub mod reactor;

pub use config::ReactorConfig;
pub use error::{ReactorError, Result};
pub use handler::LineHandler;
#[cfg(unix)]
pub use reactor::Reactor;
