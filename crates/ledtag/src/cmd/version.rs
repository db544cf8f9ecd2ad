use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("ledtag {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: ledtag");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("LEDTAG_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("fonts: {}", ledtag_raster::FONT_NAMES.len());
    println!("default_font: {}", ledtag_raster::DEFAULT_FONT);
    println!("design_format: {}", ledtag_design::DESIGN_FORMAT);
    println!("max_packet_size: {}", ledtag_packet::MAX_PACKET_SIZE);
    println!("features: image={}, cli=true", cfg!(feature = "image"));

    Ok(SUCCESS)
}
