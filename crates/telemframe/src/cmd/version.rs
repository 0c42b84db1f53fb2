use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("telemframe {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: telemframe");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("TELEMFRAME_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("TELEMFRAME_RUSTC_VERSION").unwrap_or("unknown")
    );
    println!(
        "features: catalog={}, cli=true",
        cfg!(feature = "catalog")
    );
    println!("max_frame_size: {}", telemframe_frame::DEFAULT_MAX_FRAME_SIZE);

    Ok(SUCCESS)
}
