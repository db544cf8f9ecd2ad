use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Subcommand};
use ledtag_design::DeviceConfig;
use ledtag_packet::Animation;

use crate::exit::{design_error, CliResult};
use crate::output::OutputFormat;

pub mod build;
pub mod inspect;
pub mod new;
pub mod preview;
pub mod program;
pub mod set;
pub mod show;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a design with eight inactive messages.
    New(NewArgs),
    /// Edit one message of a design.
    Set(SetArgs),
    /// List the messages of a design.
    Show(ShowArgs),
    /// Draw a message as it will appear on the badge.
    Preview(PreviewArgs),
    /// Write the device bytestream for a design.
    Build(BuildArgs),
    /// Pipe the device bytestream into an external uploader.
    Program(ProgramArgs),
    /// Decode a bytestream and print its header.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::New(args) => new::run(args),
        Command::Set(args) => set::run(args, format),
        Command::Show(args) => show::run(args, format),
        Command::Preview(args) => preview::run(args, format),
        Command::Build(args) => build::run(args, format),
        Command::Program(args) => program::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Design file to create.
    pub design: PathBuf,
    /// Replace an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Design file to edit.
    pub design: PathBuf,
    /// Message number.
    #[arg(value_parser = clap::value_parser!(u8).range(1..=8))]
    pub slot: u8,
    /// Include the message when programming.
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,
    /// Leave the message out when programming.
    #[arg(long)]
    pub inactive: bool,
    /// Blink the message.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub flash: Option<bool>,
    /// Draw a border around the display.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub border: Option<bool>,
    /// Animation (left, right, up, down, freeze, animate, pileup, split, laser, smooth, rotate).
    #[arg(long, value_name = "NAME")]
    pub animation: Option<Animation>,
    /// Speed as shown on the badge.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub speed: Option<u8>,
    /// Message text (switches an image message back to text).
    #[arg(long, conflicts_with_all = ["image", "clear_image"])]
    pub text: Option<String>,
    /// Font name.
    #[arg(long, conflicts_with = "image")]
    pub font: Option<String>,
    /// Vertical text offset in pixels.
    #[arg(long, allow_negative_numbers = true, conflicts_with = "image")]
    pub offset: Option<i32>,
    /// Use an image as the message bitmap.
    #[arg(long, value_name = "PATH", conflicts_with = "clear_image")]
    pub image: Option<PathBuf>,
    /// Drop the image and go back to text.
    #[arg(long)]
    pub clear_image: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Design file.
    pub design: PathBuf,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Design file.
    pub design: PathBuf,
    /// Message number.
    #[arg(value_parser = clap::value_parser!(u8).range(1..=8))]
    pub slot: u8,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Design file.
    pub design: PathBuf,
    /// Output file, or `-` for stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ProgramArgs {
    /// Design file.
    pub design: PathBuf,
    /// Shell command that reads the bytestream on stdin and sends it to the badge.
    #[arg(long, env = "LEDTAG_UPLOADER", value_name = "CMD")]
    pub uploader: String,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Bytestream file, or `-` for stdin.
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub(crate) fn load_design(path: &Path) -> CliResult<DeviceConfig> {
    DeviceConfig::load(path)
        .map_err(|err| design_error(&format!("load {}", path.display()), err))
}

/// Zero-based slot index for a 1-based message number.
pub(crate) fn slot_index(slot: u8) -> usize {
    usize::from(slot.saturating_sub(1))
}
