use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, trace};
use trivdl_frame::{FrameStatus, Line, TxByte, FRAME_CAPACITY};
use trivdl_transport::{SerialConfig, SerialLink, SerialPort};

use crate::config::ReactorConfig;
use crate::error::{ReactorError, Result};
use crate::handler::LineHandler;
use crate::poll::{self, Readiness};

/// A [`Line`] bound to the serial link it is carried over.
///
/// [`run`](Self::run) is a cooperative loop: one wait per iteration, at most
/// one byte read and one byte written, and an idle callback whenever the
/// wait times out.
#[derive(Debug)]
pub struct Reactor<L, U = (), const N: usize = FRAME_CAPACITY> {
    link: L,
    line: Line<U, N>,
    config: ReactorConfig,
    timeout: Duration,
}

impl<U, const N: usize> Reactor<SerialPort, U, N> {
    /// Open and configure a serial device and attach a fresh line to it.
    pub fn open(path: impl AsRef<Path>, serial: &SerialConfig, user: U) -> Result<Self> {
        let port = SerialPort::open_with_config(path, serial)?;
        Ok(Self::new(port, Line::new(user)))
    }
}

impl<L: SerialLink, U, const N: usize> Reactor<L, U, N> {
    /// Create a reactor with default configuration.
    pub fn new(link: L, line: Line<U, N>) -> Self {
        Self::with_config(link, line, ReactorConfig::default())
    }

    /// Create a reactor with explicit configuration.
    pub fn with_config(link: L, line: Line<U, N>, config: ReactorConfig) -> Self {
        let timeout = config.initial_timeout;
        Self {
            link,
            line,
            config,
            timeout,
        }
    }

    /// Borrow the line.
    pub fn line(&self) -> &Line<U, N> {
        &self.line
    }

    /// Mutably borrow the line, e.g. to queue a frame before `run`.
    pub fn line_mut(&mut self) -> &mut Line<U, N> {
        &mut self.line
    }

    /// Borrow the underlying link.
    pub fn get_ref(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the underlying link.
    pub fn get_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Consume the reactor and return the link and the line.
    pub fn into_parts(self) -> (L, Line<U, N>) {
        (self.link, self.line)
    }

    /// Current reactor configuration.
    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    /// Run until a handler calls [`Line::request_exit`].
    ///
    /// Every call starts with the configured initial timeout. I/O failures
    /// and end of file end the loop with an error; framing failures do not.
    pub fn run<H: LineHandler<U, N>>(&mut self, handler: &mut H) -> Result<()> {
        self.timeout = self.config.initial_timeout;
        loop {
            self.turn(handler)?;
            if self.line.take_exit_request() {
                debug!("exit requested, leaving reactor loop");
                return Ok(());
            }
        }
    }

    /// One loop iteration: wait, then move at most one byte in each
    /// direction, or call the idle handler if nothing became ready.
    pub fn turn<H: LineHandler<U, N>>(&mut self, handler: &mut H) -> Result<()> {
        let want_read = !self.line.rx_owned_by_consumer();
        let want_write = self.line.tx_pending();

        let ready = poll::wait(self.link.as_fd(), want_read, want_write, self.timeout)?;
        if ready.is_idle() {
            self.timeout = handler.on_idle(&mut self.line);
            trace!(timeout = ?self.timeout, "idle");
            return Ok(());
        }

        self.service(ready, handler)
    }

    fn service<H: LineHandler<U, N>>(&mut self, ready: Readiness, handler: &mut H) -> Result<()> {
        if ready.readable {
            if let Some(byte) = self.read_byte()? {
                if let Some(status) = self.line.receive_byte(byte) {
                    debug!(%status, len = self.line.rx_message().len(), "frame received");
                    handler.on_frame_received(&mut self.line, status);
                }
            }
        }

        if ready.writable && self.line.tx_pending() {
            if let Some(TxByte { byte, last }) = self.line.pull_tx_byte() {
                self.write_byte(byte)?;
                if last {
                    debug!(len = self.line.tx().message().len(), "frame transmitted");
                    handler.on_frame_sent(&mut self.line, FrameStatus::Ok);
                }
            }
        }

        Ok(())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.link.read(&mut byte) {
                Ok(0) => return Err(ReactorError::Closed),
                Ok(_) => return Ok(Some(byte[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                // Spurious readiness; try again next iteration.
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(None),
                Err(err) => return Err(ReactorError::Io(err)),
            }
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.link.write_all(&[byte])?;
        if self.config.drain_each_byte {
            self.link.drain()?;
        }
        Ok(())
    }
}
