use std::time::Duration;

use trivdl_frame::{max_payload, FrameError, FrameStatus, Line, FRAME_CAPACITY};
use trivdl_reactor::{LineHandler, Reactor};
use trivdl_transport::SerialPort;

use crate::cmd::{parse_hex, parse_seconds, PingArgs, OP_ECHO_REQUEST};
use crate::exit::{frame_error, reactor_error, CliError, CliResult, DATA_INVALID, SUCCESS, TIMEOUT};
use crate::output::{print_frame, Direction, FrameReport, OutputFormat};

pub fn run(args: PingArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = request_payload(&args)?;
    let timeout = parse_seconds(&args.timeout)?;

    let mut reactor: Reactor<SerialPort> =
        Reactor::open(&args.serial.device, &args.serial.config(), ())
            .map_err(|err| reactor_error("open failed", err))?;

    let mut pinger = Pinger::new(payload, timeout);
    reactor
        .run(&mut pinger)
        .map_err(|err| reactor_error("serial link failed", err))?;

    pinger.finish(format)
}

fn request_payload(args: &PingArgs) -> CliResult<Vec<u8>> {
    let mut payload = vec![OP_ECHO_REQUEST];
    match &args.hex {
        Some(hex) => payload.extend(parse_hex(hex)?),
        None => payload.extend_from_slice(args.data.as_bytes()),
    }

    let max = max_payload::<FRAME_CAPACITY>();
    if payload.len() > max {
        return Err(frame_error(
            "request does not fit in a frame",
            FrameError::EncodeOverflow {
                size: payload.len(),
                max,
            },
        ));
    }
    Ok(payload)
}

/// Sends one request from the first idle callback and stops on the reply or
/// when the next idle callback finds none.
#[derive(Debug)]
pub struct Pinger {
    payload: Vec<u8>,
    timeout: Duration,
    sent: bool,
    reply: Option<(FrameStatus, Vec<u8>)>,
    error: Option<FrameError>,
}

impl Pinger {
    pub fn new(payload: Vec<u8>, timeout: Duration) -> Self {
        Self {
            payload,
            timeout,
            sent: false,
            reply: None,
            error: None,
        }
    }

    fn finish(self, format: OutputFormat) -> CliResult<i32> {
        if let Some(err) = self.error {
            return Err(frame_error("request not sent", err));
        }
        let Some((status, message)) = self.reply else {
            return Err(CliError::new(TIMEOUT, "no reply within timeout"));
        };

        print_frame(&FrameReport::new(Direction::Rx, status, &message), format);
        if status.is_ok() {
            Ok(SUCCESS)
        } else {
            Ok(DATA_INVALID)
        }
    }
}

impl<U> LineHandler<U> for Pinger {
    fn on_frame_received(&mut self, line: &mut Line<U>, status: FrameStatus) {
        self.reply = Some((status, line.rx_message().to_vec()));
        line.release_rx();
        line.request_exit();
    }

    fn on_frame_sent(&mut self, line: &mut Line<U>, status: FrameStatus) {
        tracing::info!(%status, size = line.tx().message().len(), "request transmitted");
    }

    fn on_idle(&mut self, line: &mut Line<U>) -> Duration {
        if self.sent {
            tracing::error!(timeout = ?self.timeout, "no reply within timeout");
            line.request_exit();
        } else {
            match line.send(&self.payload) {
                Ok(()) => self.sent = true,
                Err(err) => {
                    self.error = Some(err);
                    line.request_exit();
                }
            }
        }
        self.timeout
    }
}
