use std::fs::File;
use std::io::BufWriter;

use bytes::Bytes;
use ledtag_design::{DeviceConfig, LocalClock};
use ledtag_packet::{PacketConfig, PacketHeader, PacketWriter};
use ledtag_raster::MonoFontRasterizer;
use serde::Serialize;

use crate::cmd::{is_stdio, load_design, BuildArgs};
use crate::exit::{design_error, io_error, packet_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct BuildOutput {
    output: String,
    size: usize,
    lengths: Vec<u16>,
}

pub fn run(args: BuildArgs, format: OutputFormat) -> CliResult<i32> {
    let design = load_design(&args.design)?;
    let packet = program_bytes(&design, "build")?;

    if is_stdio(&args.output) {
        let mut writer = PacketWriter::new(std::io::stdout().lock());
        write(&mut writer, &packet)?;
        return Ok(SUCCESS);
    }

    let file = File::create(&args.output)
        .map_err(|err| io_error(&format!("create {}", args.output.display()), err))?;
    let mut writer = PacketWriter::new(BufWriter::new(file));
    write(&mut writer, &packet)?;
    tracing::info!(path = %args.output.display(), size = packet.len(), "wrote bytestream");

    let lengths = PacketHeader::decode(&packet)
        .map(|header| header.lengths.to_vec())
        .unwrap_or_default();
    let out = BuildOutput {
        output: args.output.display().to_string(),
        size: packet.len(),
        lengths,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => {
            println!("wrote {} bytes to {}", out.size, out.output);
        }
    }
    Ok(SUCCESS)
}

/// Serialize with the live clock and apply the empty and size gates.
pub(crate) fn program_bytes(design: &DeviceConfig, context: &str) -> CliResult<Bytes> {
    design
        .program_bytes(&MonoFontRasterizer, &LocalClock, &PacketConfig::default())
        .map_err(|err| design_error(context, err))
}

pub(crate) fn write<W: std::io::Write>(
    writer: &mut PacketWriter<W>,
    packet: &[u8],
) -> CliResult<()> {
    writer
        .write_packet(packet)
        .and_then(|()| writer.flush())
        .map_err(|err| packet_error("write", err))
}
