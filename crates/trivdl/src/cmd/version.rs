use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("trivdl {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: trivdl");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("TRIVDL_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("frame_capacity: {}", trivdl_frame::FRAME_CAPACITY);
    println!(
        "max_payload: {}",
        trivdl_frame::max_payload::<{ trivdl_frame::FRAME_CAPACITY }>()
    );
    println!("default_baud: {}", trivdl_transport::DEFAULT_BAUD);

    Ok(SUCCESS)
}
