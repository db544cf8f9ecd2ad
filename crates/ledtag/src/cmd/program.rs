use std::process::{Child, Command, Stdio};

use ledtag_packet::PacketWriter;

use crate::cmd::build::{program_bytes, write};
use crate::cmd::{load_design, ProgramArgs};
use crate::exit::{io_error, CliError, CliResult, SUCCESS, UPLOAD_FAILED, USAGE};
use crate::output::{print_json, OutputFormat};

#[derive(serde::Serialize)]
struct ProgramOutput<'a> {
    uploader: &'a str,
    size: usize,
}

pub fn run(args: ProgramArgs, format: OutputFormat) -> CliResult<i32> {
    if args.uploader.trim().is_empty() {
        return Err(CliError::new(USAGE, "uploader command is empty"));
    }

    let design = load_design(&args.design)?;
    let packet = program_bytes(&design, "program")?;

    let mut child = spawn(&args.uploader)?;
    tracing::debug!(uploader = %args.uploader, pid = child.id(), "started uploader");

    if let Some(stdin) = child.stdin.take() {
        let mut writer = PacketWriter::new(stdin);
        if let Err(err) = write(&mut writer, &packet) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CliError::new(UPLOAD_FAILED, err.message));
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|err| io_error("wait for uploader", err))?;
    let mut message = String::from_utf8_lossy(&output.stdout).into_owned();
    message.push_str(&String::from_utf8_lossy(&output.stderr));
    let message = message.trim();

    if !output.status.success() {
        return Err(CliError::new(
            UPLOAD_FAILED,
            format!("uploader failed ({}): {message}", output.status),
        ));
    }
    if !message.is_empty() {
        // The uploader is expected to be silent on success.
        return Err(CliError::new(
            UPLOAD_FAILED,
            format!("uploader reported: {message}"),
        ));
    }

    tracing::info!(size = packet.len(), "programmed badge");
    match format {
        OutputFormat::Json => print_json(&ProgramOutput {
            uploader: &args.uploader,
            size: packet.len(),
        }),
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => {
            println!("programmed {} bytes", packet.len());
        }
    }
    Ok(SUCCESS)
}

fn spawn(uploader: &str) -> CliResult<Child> {
    let mut command = if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(uploader);
        command
    } else {
        let mut command = Command::new("sh");
        command.arg("-c").arg(uploader);
        command
    };
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| io_error(&format!("start uploader {uploader:?}"), err))
}
