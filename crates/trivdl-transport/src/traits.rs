use std::io::{self, Read, Write};
#[cfg(unix)]
use std::os::fd::AsFd;

/// A byte link the reactor can poll, read, write and drain.
///
/// On Unix this is a file descriptor: a UART device for real links, or a
/// socket pair in tests.
#[cfg(unix)]
pub trait SerialLink: Read + Write + AsFd {
    /// Block until every byte written so far has been transmitted.
    fn drain(&mut self) -> io::Result<()>;
}

#[cfg(unix)]
impl SerialLink for std::os::unix::net::UnixStream {
    fn drain(&mut self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::net::UnixStream;

    use super::*;

    #[test]
    fn socket_pair_drains_and_delivers() {
        let (mut left, mut right) = UnixStream::pair().unwrap();
        left.write_all(&[0xBA, 0x03, 0x10, 0x13]).unwrap();
        left.drain().unwrap();

        let mut buf = [0u8; 4];
        right.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xBA, 0x03, 0x10, 0x13]);
    }
}
