use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};

use rustix::fs::{Mode, OFlags};
use rustix::io::Errno;
use rustix::termios::{self, ControlModes, OptionalActions, SpecialCodeIndex};
use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::{Result, TransportError};
use crate::traits::SerialLink;

/// Line speeds accepted by [`SerialPort::configure`].
pub const SUPPORTED_BAUDS: &[u32] = &[1200, 2400, 4800, 9600, 19200, 38400, 57600, 115_200];

/// A UART device opened read/write, without becoming the controlling
/// terminal, with synchronous writes.
#[derive(Debug)]
pub struct SerialPort {
    file: File,
    path: PathBuf,
}

impl SerialPort {
    /// Open a serial device without touching its line settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let fd = rustix::fs::open(
            path.as_path(),
            OFlags::RDWR | OFlags::NOCTTY | OFlags::SYNC | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(|errno| TransportError::Open {
            path: path.clone(),
            source: errno.into(),
        })?;
        debug!(?path, "opened serial device");
        Ok(Self {
            file: File::from(fd),
            path,
        })
    }

    /// Open a serial device and put it in raw mode with `config`.
    pub fn open_with_config(path: impl AsRef<Path>, config: &SerialConfig) -> Result<Self> {
        let port = Self::open(path)?;
        port.configure(config)?;
        Ok(port)
    }

    /// Apply raw 8N1 settings, no modem control, at the configured speed.
    pub fn configure(&self, config: &SerialConfig) -> Result<()> {
        let baud = check_baud(config.baud)?;
        let configure_err = |errno: Errno| TransportError::Configure {
            path: self.path.clone(),
            source: errno.into(),
        };

        let mut tio = termios::tcgetattr(&self.file).map_err(configure_err)?;
        tio.make_raw();
        tio.set_speed(baud).map_err(configure_err)?;

        tio.control_modes
            .remove(ControlModes::CSIZE | ControlModes::PARENB | ControlModes::CSTOPB);
        tio.control_modes
            .insert(ControlModes::CS8 | ControlModes::CLOCAL | ControlModes::CREAD);
        tio.special_codes[SpecialCodeIndex::VMIN] = config.min_bytes;
        tio.special_codes[SpecialCodeIndex::VTIME] = config.read_timeout_deciseconds;

        termios::tcsetattr(&self.file, OptionalActions::Now, &tio).map_err(configure_err)?;

        info!(path = ?self.path, baud, "serial line configured");
        Ok(())
    }

    /// The device path this port was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "serial"
    }
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl AsFd for SerialPort {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl SerialLink for SerialPort {
    fn drain(&mut self) -> io::Result<()> {
        loop {
            match termios::tcdrain(&self.file) {
                Ok(()) => return Ok(()),
                Err(errno) if errno == Errno::INTR => continue,
                Err(errno) => return Err(errno.into()),
            }
        }
    }
}

fn check_baud(baud: u32) -> Result<u32> {
    if SUPPORTED_BAUDS.contains(&baud) {
        Ok(baud)
    } else {
        Err(TransportError::UnsupportedBaud(baud))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_fails() {
        let path = std::env::temp_dir().join(format!("trivdl-missing-{}", std::process::id()));
        let err = SerialPort::open(&path).unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
        assert!(err.to_string().contains("failed to open"));
    }

    #[test]
    fn unsupported_baud_is_rejected() {
        assert!(matches!(
            check_baud(12345),
            Err(TransportError::UnsupportedBaud(12345))
        ));
        assert_eq!(check_baud(9600).unwrap(), 9600);
        assert_eq!(check_baud(115_200).unwrap(), 115_200);
    }

    #[test]
    fn configuring_a_regular_file_fails() {
        let path = std::env::temp_dir().join(format!("trivdl-not-a-tty-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let port = SerialPort::open(&path).unwrap();
        let err = port.configure(&SerialConfig::default()).unwrap_err();
        assert!(matches!(err, TransportError::Configure { .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn configure_rejects_unsupported_baud_before_touching_device() {
        let port = SerialPort::open("/dev/null").unwrap();
        let err = port.configure(&SerialConfig::with_baud(31337)).unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedBaud(31337)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn pseudo_terminal_carries_raw_bytes() {
        use rustix::pty::{grantpt, openpt, ptsname, unlockpt, OpenptFlags};

        let master = openpt(OpenptFlags::RDWR | OpenptFlags::NOCTTY).unwrap();
        grantpt(&master).unwrap();
        unlockpt(&master).unwrap();
        let slave_path = ptsname(&master, Vec::new())
            .unwrap()
            .into_string()
            .unwrap();
        let mut master = File::from(master);

        let mut port =
            SerialPort::open_with_config(&slave_path, &SerialConfig::with_baud(115_200)).unwrap();
        assert_eq!(port.path(), Path::new(&slave_path));

        let frame = [0xBA, 0x05, 0x10, 0xBA, 0xBA, 0x41, 0x10];
        port.write_all(&frame).unwrap();
        port.drain().unwrap();

        let mut received = [0u8; 7];
        master.read_exact(&mut received).unwrap();
        assert_eq!(received, frame);
    }
}
