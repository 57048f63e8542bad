use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use trivdl_transport::{SerialConfig, DEFAULT_BAUD};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod encode;
pub mod ping;
pub mod respond;
pub mod version;

/// First message byte of an echo request.
pub const OP_ECHO_REQUEST: u8 = 0x10;
/// First message byte of an echo reply.
pub const OP_ECHO_REPLY: u8 = 0x11;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one echo request and wait for the reply.
    Ping(PingArgs),
    /// Answer echo requests until interrupted.
    Respond(RespondArgs),
    /// Print the frame and wire bytes for a payload.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ping(args) => ping::run(args, format),
        Command::Respond(args) => respond::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SerialArgs {
    /// Serial device path.
    pub device: PathBuf,
    /// Line speed in bits per second (8N1).
    #[arg(long, short = 'b', default_value_t = DEFAULT_BAUD, env = "TRIVDL_BAUD")]
    pub baud: u32,
}

impl SerialArgs {
    pub fn config(&self) -> SerialConfig {
        SerialConfig::with_baud(self.baud)
    }
}

#[derive(Args, Debug)]
pub struct PingArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Text appended after the request opcode.
    #[arg(long, default_value = "payload", conflicts_with = "hex")]
    pub data: String,
    /// Hex bytes appended after the request opcode.
    #[arg(long)]
    pub hex: Option<String>,
    /// Seconds to wait for the reply.
    #[arg(long, default_value = "0.5")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct RespondArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Exit after sending N replies.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Payload as hex bytes (e.g. 10ba41).
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse hex bytes, ignoring whitespace and an optional `0x` prefix.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let digits: String = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CliError::new(
            USAGE,
            format!("hex payload contains non-hex characters: {input:?}"),
        ));
    }
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            format!("hex payload has an odd number of digits: {input:?}"),
        ));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|err| CliError::new(USAGE, format!("invalid hex payload {input:?}: {err}")))
        })
        .collect()
}

/// Parse a wait given in (fractional) seconds.
pub fn parse_seconds(input: &str) -> CliResult<Duration> {
    let seconds: f64 = input
        .trim()
        .parse()
        .map_err(|err| CliError::new(USAGE, format!("invalid seconds value {input:?}: {err}")))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|err| CliError::new(USAGE, format!("invalid seconds value {input:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(parse_hex("10ba41").unwrap(), vec![0x10, 0xBA, 0x41]);
        assert_eq!(parse_hex("0x10 BA 41").unwrap(), vec![0x10, 0xBA, 0x41]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_hex() {
        assert_eq!(parse_hex("abc").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("zz").unwrap_err().code, USAGE);
    }

    #[test]
    fn parses_seconds() {
        assert_eq!(parse_seconds("0.5").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_seconds("2").unwrap(), Duration::from_secs(2));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
    }
}
