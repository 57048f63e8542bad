use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use trivdl_frame::{FrameStatus, Line};
use trivdl_reactor::{LineHandler, Reactor};
use trivdl_transport::SerialPort;

use crate::cmd::{RespondArgs, OP_ECHO_REPLY, OP_ECHO_REQUEST};
use crate::exit::{reactor_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, Direction, FrameReport, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub fn run(args: RespondArgs, format: OutputFormat) -> CliResult<i32> {
    let mut reactor: Reactor<SerialPort> =
        Reactor::open(&args.serial.device, &args.serial.config(), ())
            .map_err(|err| reactor_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut responder = Responder::new(format, args.count, running);
    reactor
        .run(&mut responder)
        .map_err(|err| reactor_error("serial link failed", err))?;

    tracing::info!(replies = responder.replies, "responder stopped");
    Ok(SUCCESS)
}

/// Prints every received frame and answers echo requests.
#[derive(Debug)]
pub struct Responder {
    format: OutputFormat,
    limit: Option<usize>,
    running: Arc<AtomicBool>,
    replies: usize,
}

impl Responder {
    pub fn new(format: OutputFormat, limit: Option<usize>, running: Arc<AtomicBool>) -> Self {
        Self {
            format,
            limit,
            running,
            replies: 0,
        }
    }
}

/// The reply to an echo request: same body, reply opcode.
fn echo_reply(request: &[u8]) -> Option<Vec<u8>> {
    let (&opcode, body) = request.split_first()?;
    if opcode != OP_ECHO_REQUEST {
        return None;
    }
    let mut reply = Vec::with_capacity(request.len());
    reply.push(OP_ECHO_REPLY);
    reply.extend_from_slice(body);
    Some(reply)
}

impl<U> LineHandler<U> for Responder {
    fn on_frame_received(&mut self, line: &mut Line<U>, status: FrameStatus) {
        print_frame(
            &FrameReport::new(Direction::Rx, status, line.rx_message()),
            self.format,
        );

        if status.is_ok() {
            if let Some(reply) = echo_reply(line.rx_message()) {
                if line.tx_pending() {
                    tracing::warn!("previous reply still in flight, request dropped");
                } else if let Err(err) = line.send(&reply) {
                    tracing::warn!(%err, "reply not sent");
                }
            }
        }
        line.release_rx();
    }

    fn on_frame_sent(&mut self, line: &mut Line<U>, status: FrameStatus) {
        self.replies += 1;
        print_frame(
            &FrameReport::new(Direction::Tx, status, line.tx().message()),
            self.format,
        );
        if self.limit.is_some_and(|limit| self.replies >= limit) {
            line.request_exit();
        }
    }

    fn on_idle(&mut self, line: &mut Line<U>) -> Duration {
        if !self.running.load(Ordering::SeqCst) {
            line.request_exit();
        }
        POLL_INTERVAL
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
