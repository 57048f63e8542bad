use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use trivdl_frame::{build_frame, frame_hex, outgoing_char, Frame, FRAME_CAPACITY};

use crate::cmd::{parse_hex, EncodeArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{hex, print_raw, OutputFormat};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Encoded {
    payload: String,
    length: u8,
    checksum: u8,
    frame: String,
    wire: String,
    wire_len: usize,
    #[serde(skip)]
    frame_dump: String,
    #[serde(skip)]
    wire_bytes: Vec<u8>,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = parse_hex(&args.payload)?;
    let encoded = encode(&payload)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&encoded).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["payload".to_string(), encoded.payload.clone()])
                .add_row(vec!["length".to_string(), encoded.length.to_string()])
                .add_row(vec![
                    "checksum".to_string(),
                    format!("0x{:02x}", encoded.checksum),
                ])
                .add_row(vec!["frame".to_string(), encoded.frame.clone()])
                .add_row(vec!["wire".to_string(), encoded.wire.clone()])
                .add_row(vec!["wire_len".to_string(), encoded.wire_len.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("frame:{}", encoded.frame_dump);
            println!("wire: {} ({} bytes)", encoded.wire, encoded.wire_len);
        }
        OutputFormat::Raw => print_raw(&encoded.wire_bytes),
    }

    Ok(SUCCESS)
}

fn encode(payload: &[u8]) -> CliResult<Encoded> {
    let mut frame = Frame::<FRAME_CAPACITY>::new();
    build_frame(&mut frame, payload).map_err(|err| frame_error("encode failed", err))?;

    let frame_bytes = hex(frame.as_bytes());
    let frame_dump = frame_hex(&frame).to_string();
    let length = frame.as_bytes()[1];
    let checksum = frame.checksum().unwrap_or_default();

    let wire_bytes: Vec<u8> = std::iter::from_fn(|| outgoing_char(&mut frame)).collect();

    Ok(Encoded {
        payload: hex(payload),
        length,
        checksum,
        frame: frame_bytes,
        wire: hex(&wire_bytes),
        wire_len: wire_bytes.len(),
        frame_dump,
        wire_bytes,
    })
}
