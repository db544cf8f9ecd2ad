use ledtag_packet::Bitmap;
use ledtag_raster::MonoFontRasterizer;
use serde::Serialize;

use crate::cmd::{load_design, slot_index, PreviewArgs};
use crate::exit::{design_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, OutputFormat};

/// Columns visible on the badge at once.
const DISPLAY_WIDTH: usize = 44;

#[derive(Serialize)]
struct PreviewOutput {
    slot: u8,
    width_px: usize,
    rows: Vec<String>,
}

pub fn run(args: PreviewArgs, format: OutputFormat) -> CliResult<i32> {
    let design = load_design(&args.design)?;
    let bitmap = design
        .slot(slot_index(args.slot))
        .and_then(|slot| slot.resolve_bitmap(&MonoFontRasterizer))
        .map_err(|err| design_error("preview", err))?;
    tracing::debug!(slot = args.slot, width_px = bitmap.width_px(), "resolved preview");

    match format {
        OutputFormat::Json => print_json(&PreviewOutput {
            slot: args.slot,
            width_px: bitmap.width_px(),
            rows: preview_lines(&bitmap),
        }),
        OutputFormat::Table | OutputFormat::Pretty => {
            if bitmap.is_absent() {
                println!("(empty)");
            }
            for line in preview_lines(&bitmap) {
                println!("{line}");
            }
        }
        OutputFormat::Raw => print_raw(bitmap.as_bytes()),
    }
    Ok(SUCCESS)
}

/// ASCII rows with a `|` after the last column the badge shows without
/// scrolling.
fn preview_lines(bitmap: &Bitmap) -> Vec<String> {
    bitmap
        .render_ascii('#', '.')
        .lines()
        .map(|line| {
            if line.len() > DISPLAY_WIDTH {
                let (visible, rest) = line.split_at(DISPLAY_WIDTH);
                format!("{visible}|{rest}")
            } else {
                line.to_string()
            }
        })
        .collect()
}
