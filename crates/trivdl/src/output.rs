use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use trivdl_frame::{FrameHex, FrameStatus};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Which way a reported frame travelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rx,
    Tx,
}

/// One completed frame as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct FrameReport<'a> {
    pub direction: Direction,
    pub status: &'static str,
    pub status_code: u8,
    pub opcode: Option<u8>,
    pub size: usize,
    pub message: String,
    #[serde(skip)]
    pub raw: &'a [u8],
}

impl<'a> FrameReport<'a> {
    /// Message bytes are only reported for frames that passed the checksum;
    /// after a failure the buffer may still hold unrelated bytes.
    pub fn new(direction: Direction, status: FrameStatus, message: &'a [u8]) -> Self {
        let message = if status.is_ok() { message } else { &[] };
        Self {
            direction,
            status: status.as_str(),
            status_code: status.code(),
            opcode: message.first().copied(),
            size: message.len(),
            message: hex(message),
            raw: message,
        }
    }
}

pub fn print_frame(report: &FrameReport<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DIR", "STATUS", "OPCODE", "SIZE", "MESSAGE"])
                .add_row(vec![
                    direction_label(report.direction).to_string(),
                    report.status.to_string(),
                    report
                        .opcode
                        .map_or_else(|| "-".to_string(), |op| format!("0x{op:02x}")),
                    report.size.to_string(),
                    report.message.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame {} ({}, size {}, msg{})",
                match report.direction {
                    Direction::Rx => "received",
                    Direction::Tx => "transmitted",
                },
                report.status,
                report.size,
                FrameHex::new(report.raw),
            );
        }
        OutputFormat::Raw => print_raw(report.raw),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Rx => "RX",
        Direction::Tx => "TX",
    }
}

/// Lowercase hex without separators, the format accepted on the command line.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_fields() {
        let report = FrameReport::new(Direction::Rx, FrameStatus::Ok, &[0x11, 0xBA]);
        assert_eq!(report.opcode, Some(0x11));
        assert_eq!(report.size, 2);
        assert_eq!(report.message, "11ba");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["direction"], "rx");
        assert_eq!(json["status"], "OK");
        assert_eq!(json["status_code"], 0);
        assert!(json.get("raw").is_none());
    }

    #[test]
    fn empty_message_has_no_opcode() {
        let report = FrameReport::new(Direction::Tx, FrameStatus::Ok, &[]);
        assert_eq!(report.opcode, None);
        assert_eq!(report.size, 0);
    }

    #[test]
    fn failed_frame_hides_buffer_contents() {
        let report = FrameReport::new(Direction::Rx, FrameStatus::Malformed, &[0x10, 0x41]);
        assert_eq!(report.status_code, 1);
        assert_eq!(report.opcode, None);
        assert_eq!(report.size, 0);
        assert_eq!(report.message, "");
        assert!(report.raw.is_empty());
    }

    #[test]
    fn hex_formats() {
        assert_eq!(hex(&[0x0a, 0xff]), "0aff");
    }
}
