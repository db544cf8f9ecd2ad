/// Errors raised by rasterization collaborators.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The font descriptor does not name a known font.
    #[error("unknown font: {0}")]
    UnknownFont(String),

    /// The image could not be decoded.
    #[cfg(feature = "image")]
    #[error("image could not be read: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// An I/O error occurred while reading a source file.
    #[error("raster I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;
