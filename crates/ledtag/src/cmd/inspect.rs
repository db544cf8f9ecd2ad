use std::io::Read;

use ledtag_packet::{decode_packet, flag_bits, unpack_mode, Animation, DecodedPacket};
use serde::Serialize;

use crate::cmd::{is_stdio, InspectArgs};
use crate::exit::{io_error, packet_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, table, yes_no, OutputFormat};

#[derive(Debug, Serialize)]
struct SlotInfo {
    slot: usize,
    width_bytes: u16,
    speed: u8,
    animation: String,
    flash: bool,
    border: bool,
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    size: usize,
    timestamp: String,
    slots: Vec<SlotInfo>,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let data = read_input(&args)?;
    let decoded = decode_packet(&data).map_err(|err| packet_error("inspect", err))?;

    if format == OutputFormat::Raw {
        for bitmap in &decoded.bitmaps {
            print_raw(bitmap.as_bytes());
        }
        return Ok(SUCCESS);
    }

    let out = describe(&decoded, data.len());
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            println!("size: {} bytes, timestamp: {}", out.size, out.timestamp);
            let mut table = table(["SLOT", "LENGTH", "SPEED", "ANIMATION", "FLASH", "BORDER"]);
            for slot in &out.slots {
                table.add_row(vec![
                    slot.slot.to_string(),
                    slot.width_bytes.to_string(),
                    slot.speed.to_string(),
                    slot.animation.clone(),
                    yes_no(slot.flash).to_string(),
                    yes_no(slot.border).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!("size={} timestamp={}", out.size, out.timestamp);
            for slot in &out.slots {
                println!(
                    "slot={} length={} speed={} animation={} flash={} border={}",
                    slot.slot,
                    slot.width_bytes,
                    slot.speed,
                    slot.animation,
                    yes_no(slot.flash),
                    yes_no(slot.border)
                );
            }
        }
    }
    Ok(SUCCESS)
}

fn read_input(args: &InspectArgs) -> CliResult<Vec<u8>> {
    if is_stdio(&args.input) {
        let mut data = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .map_err(|err| io_error("read stdin", err))?;
        return Ok(data);
    }
    std::fs::read(&args.input)
        .map_err(|err| io_error(&format!("read {}", args.input.display()), err))
}

fn describe(decoded: &DecodedPacket, size: usize) -> InspectOutput {
    let header = &decoded.header;
    let flash = flag_bits(header.flash);
    let border = flag_bits(header.border);
    let slots = (0..header.modes.len())
        .map(|i| {
            let (speed, animation) = unpack_mode(header.modes[i]);
            SlotInfo {
                slot: i + 1,
                width_bytes: header.lengths[i],
                speed: speed + 1,
                animation: match Animation::try_from(animation) {
                    Ok(animation) => animation.name().to_string(),
                    Err(_) => format!("unknown({animation})"),
                },
                flash: flash[i],
                border: border[i],
            }
        })
        .collect();

    InspectOutput {
        size,
        timestamp: header.device_timestamp().to_string(),
        slots,
    }
}
