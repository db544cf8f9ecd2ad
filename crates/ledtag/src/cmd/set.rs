use ledtag_design::MessageSlot;
use ledtag_packet::{Bitmap, Speed, HEIGHT};
use ledtag_raster::{import_image, is_known_font, FONT_NAMES};

use crate::cmd::{load_design, slot_index, SetArgs};
use crate::cmd::show::{print_slots, SlotRow};
use crate::exit::{design_error, packet_error, raster_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub fn run(args: SetArgs, format: OutputFormat) -> CliResult<i32> {
    if let Some(font) = &args.font {
        if !is_known_font(font) {
            return Err(CliError::new(
                USAGE,
                format!("unknown font {font:?} (known: {})", FONT_NAMES.join(", ")),
            ));
        }
    }

    let mut design = load_design(&args.design)?;
    let index = slot_index(args.slot);
    let slot = design
        .slot_mut(index)
        .map_err(|err| design_error("set", err))?;

    apply(slot, &args)?;
    let row = SlotRow::new(index, slot);

    design
        .save(&args.design)
        .map_err(|err| design_error(&format!("save {}", args.design.display()), err))?;
    tracing::info!(slot = args.slot, path = %args.design.display(), "updated message");

    print_slots(&[row], format);
    Ok(SUCCESS)
}

fn apply(slot: &mut MessageSlot, args: &SetArgs) -> CliResult<()> {
    if args.active {
        slot.active = true;
    }
    if args.inactive {
        slot.active = false;
    }
    if let Some(flash) = args.flash {
        slot.flash = flash;
    }
    if let Some(border) = args.border {
        slot.border = border;
    }
    if let Some(animation) = args.animation {
        slot.animation = animation;
    }
    if let Some(speed) = args.speed {
        slot.speed = Speed::from_display(speed).map_err(|err| packet_error("speed", err))?;
    }

    if args.clear_image {
        slot.clear_inline_bitmap();
    }
    if let Some(path) = &args.image {
        let canvas = import_image(path, HEIGHT as u32)
            .map_err(|err| raster_error(&format!("import {}", path.display()), err))?;
        let bitmap = Bitmap::from_row_major(
            canvas.as_bytes(),
            canvas.stride(),
            canvas.width() as usize,
        );
        tracing::debug!(width_px = canvas.width(), "imported image");
        slot.set_inline_bitmap(bitmap);
    }

    if args.text.is_some() || args.font.is_some() || args.offset.is_some() {
        let source = slot.text_source_mut();
        if let Some(text) = &args.text {
            source.text.clone_from(text);
        }
        if let Some(font) = &args.font {
            source.font = font.trim().to_string();
        }
        if let Some(offset) = args.offset {
            source.offset = offset;
        }
    }
    Ok(())
}
