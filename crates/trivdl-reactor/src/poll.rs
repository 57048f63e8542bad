use std::io;
use std::os::fd::BorrowedFd;
use std::time::Duration;

use rustix::event::{PollFd, PollFlags, Timespec};
use rustix::io::Errno;

/// Which of the requested directions became ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Readiness {
    pub readable: bool,
    pub writable: bool,
}

impl Readiness {
    /// Neither direction is ready.
    pub fn is_idle(self) -> bool {
        !self.readable && !self.writable
    }
}

/// Wait until `fd` is ready in one of the requested directions or `timeout`
/// expires. With neither direction requested this just sleeps.
///
/// Hang-up and error conditions count as readiness for the requested
/// directions so the following read or write surfaces them.
pub(crate) fn wait(
    fd: BorrowedFd<'_>,
    read: bool,
    write: bool,
    timeout: Duration,
) -> io::Result<Readiness> {
    let mut events = PollFlags::empty();
    if read {
        events |= PollFlags::IN;
    }
    if write {
        events |= PollFlags::OUT;
    }

    let mut fds = [PollFd::from_borrowed_fd(fd, events)];
    // An empty set makes poll a plain sleep.
    let watched = if events.is_empty() { 0 } else { 1 };
    let timeout = timespec(timeout);

    loop {
        match rustix::event::poll(&mut fds[..watched], Some(&timeout)) {
            Ok(_) => break,
            Err(errno) if errno == Errno::INTR => continue,
            Err(errno) => return Err(errno.into()),
        }
    }

    let revents = fds[0].revents();
    let failed = revents.intersects(PollFlags::HUP | PollFlags::ERR | PollFlags::NVAL);
    Ok(Readiness {
        readable: read && (revents.contains(PollFlags::IN) || failed),
        writable: write && (revents.contains(PollFlags::OUT) || failed),
    })
}

/// Poll timeout; waits beyond the representable range are clamped.
fn timespec(timeout: Duration) -> Timespec {
    Timespec {
        tv_sec: i64::try_from(timeout.as_secs()).unwrap_or(i64::MAX),
        // Below one billion, so it fits every platform's nanosecond type.
        tv_nsec: timeout.subsec_nanos() as _,
    }
}
