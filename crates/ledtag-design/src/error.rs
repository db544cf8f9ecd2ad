use ledtag_packet::PacketError;
use ledtag_raster::RasterError;

/// Errors that can occur while editing, resolving or storing a design.
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    /// Packet assembly or size check failed.
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    /// The glyph rasterizer or image import failed.
    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),

    /// Every slot is inactive or empty.
    #[error("nothing to program (no active message has content)")]
    EmptyConfiguration,

    /// Slot index outside 0..8.
    #[error("slot {0} out of range (0..8)")]
    SlotOutOfRange(usize),

    /// The design file uses a format this build does not read.
    #[error("unsupported design format {0}")]
    UnsupportedFormat(u32),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred while reading or writing a design file.
    #[error("design I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DesignError>;
