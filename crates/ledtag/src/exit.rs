use std::fmt;
use std::io;

use ledtag_design::DesignError;
use ledtag_packet::PacketError;
use ledtag_raster::RasterError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const UPLOAD_FAILED: i32 = 3;
pub const NOTHING_TO_PROGRAM: i32 = 20;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn packet_error(context: &str, err: PacketError) -> CliError {
    match err {
        PacketError::Io(source) => io_error(context, source),
        PacketError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        PacketError::InvalidMagic
        | PacketError::Truncated { .. }
        | PacketError::PayloadTooLarge { .. }
        | PacketError::RaggedBitmap { .. }
        | PacketError::LengthMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        PacketError::AnimationOutOfRange(_) | PacketError::SpeedOutOfRange(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

pub fn raster_error(context: &str, err: RasterError) -> CliError {
    match err {
        RasterError::Io(source) => io_error(context, source),
        RasterError::UnknownFont(_) => CliError::new(USAGE, format!("{context}: {err}")),
        RasterError::ImageDecode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn design_error(context: &str, err: DesignError) -> CliError {
    match err {
        DesignError::Packet(err) => packet_error(context, err),
        DesignError::Raster(err) => raster_error(context, err),
        DesignError::Io(source) => io_error(context, source),
        DesignError::EmptyConfiguration => CliError::new(
            NOTHING_TO_PROGRAM,
            format!("{context}: nothing to program (mark a message active and give it content)"),
        ),
        DesignError::SlotOutOfRange(_) => CliError::new(USAGE, format!("{context}: {err}")),
        DesignError::UnsupportedFormat(_) | DesignError::Json(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
