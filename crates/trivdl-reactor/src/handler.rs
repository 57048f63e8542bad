use std::time::Duration;

use trivdl_frame::{FrameStatus, Line, FRAME_CAPACITY};

/// Callbacks the reactor invokes on a line.
///
/// Every callback gets the line itself, so a handler can read the received
/// message, queue a reply with [`Line::send`], or stop the loop with
/// [`Line::request_exit`].
pub trait LineHandler<U, const N: usize = FRAME_CAPACITY> {
    /// A receive frame reached a terminal state.
    ///
    /// The line's receive frame is owned by the handler from now on; the
    /// reactor stops reading until [`Line::release_rx`] is called.
    fn on_frame_received(&mut self, line: &mut Line<U, N>, status: FrameStatus);

    /// The last byte of the transmit frame has been written and drained.
    fn on_frame_sent(&mut self, line: &mut Line<U, N>, status: FrameStatus) {
        let _ = (line, status);
    }

    /// Nothing was ready within the current timeout. Returns the next one.
    ///
    /// This is where periodic traffic usually starts and where exit is
    /// usually requested.
    fn on_idle(&mut self, line: &mut Line<U, N>) -> Duration;
}
