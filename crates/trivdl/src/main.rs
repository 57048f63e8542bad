mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "trivdl", version, about = "Framed messaging over a UART link")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ping_subcommand() {
        let cli = Cli::try_parse_from([
            "trivdl",
            "ping",
            "/dev/ttyUSB0",
            "--baud",
            "115200",
            "--data",
            "hello",
        ])
        .expect("ping args should parse");

        match cli.command {
            Command::Ping(args) => {
                assert_eq!(args.serial.baud, 115200);
                assert_eq!(args.data, "hello");
                assert_eq!(args.timeout, "0.5");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "trivdl",
            "ping",
            "/dev/ttyUSB0",
            "--hex",
            "ba41",
            "--data",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_respond_with_count() {
        let cli = Cli::try_parse_from(["trivdl", "respond", "/dev/ttyS1", "--count", "3"])
            .expect("respond args should parse");
        match cli.command {
            Command::Respond(args) => assert_eq!(args.count, Some(3)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_encode_with_global_format() {
        let cli = Cli::try_parse_from(["trivdl", "encode", "10ba41", "--format", "json"])
            .expect("encode args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Encode(_)));
    }
}
