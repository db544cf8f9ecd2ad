use ledtag_design::{BitmapSource, MessageSlot};
use serde::Serialize;

use crate::cmd::{load_design, ShowArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, table, yes_no, OutputFormat};

#[derive(Debug, Serialize)]
pub struct SlotRow {
    pub slot: usize,
    pub active: bool,
    pub flash: bool,
    pub border: bool,
    pub animation: &'static str,
    pub speed: u8,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_px: Option<usize>,
}

impl SlotRow {
    pub fn new(index: usize, slot: &MessageSlot) -> Self {
        let mut row = Self {
            slot: index + 1,
            active: slot.active,
            flash: slot.flash,
            border: slot.border,
            animation: slot.animation.name(),
            speed: slot.speed.display(),
            source: "text",
            text: None,
            font: None,
            offset: None,
            width_px: None,
        };
        match &slot.source {
            BitmapSource::Generated(text) => {
                row.text = Some(text.text.clone());
                row.font = Some(text.font.clone());
                row.offset = Some(text.offset);
            }
            BitmapSource::Inline { bitmap } => {
                row.source = "image";
                row.width_px = Some(bitmap.width_px());
            }
        }
        row
    }

    fn content(&self) -> String {
        match (&self.text, self.width_px) {
            (Some(text), _) => format!(
                "{text:?} ({}, offset {})",
                self.font.as_deref().unwrap_or_default(),
                self.offset.unwrap_or_default()
            ),
            (None, Some(width)) => format!("image, {width} px"),
            (None, None) => String::new(),
        }
    }
}

pub fn run(args: ShowArgs, format: OutputFormat) -> CliResult<i32> {
    let design = load_design(&args.design)?;
    let rows: Vec<SlotRow> = design
        .slots()
        .iter()
        .enumerate()
        .map(|(index, slot)| SlotRow::new(index, slot))
        .collect();
    print_slots(&rows, format);
    Ok(SUCCESS)
}

pub fn print_slots(rows: &[SlotRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = table([
                "SLOT",
                "ACTIVE",
                "FLASH",
                "BORDER",
                "ANIMATION",
                "SPEED",
                "CONTENT",
            ]);
            for row in rows {
                table.add_row(vec![
                    row.slot.to_string(),
                    yes_no(row.active).to_string(),
                    yes_no(row.flash).to_string(),
                    yes_no(row.border).to_string(),
                    row.animation.to_string(),
                    row.speed.to_string(),
                    row.content(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in rows {
                println!(
                    "slot={} active={} flash={} border={} animation={} speed={} {}",
                    row.slot,
                    yes_no(row.active),
                    yes_no(row.flash),
                    yes_no(row.border),
                    row.animation,
                    row.speed,
                    row.content()
                );
            }
        }
    }
}
