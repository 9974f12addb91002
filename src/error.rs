use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error)]
pub enum Error {
    #[display("pixel ({x}, {y}) is outside the 64x16 matrix")]
    PixelOutOfBounds { x: i32, y: i32 },

    #[display("WLED controller answered HTTP {_0}")]
    HttpStatus(#[error(not(source))] u16),

    #[display("HTTP transport failed: {_0}")]
    Transport(Box<ureq::Error>),

    #[display("could not serialize WLED state: {_0}")]
    Json(serde_json::Error),

    #[display("could not decode PNG: {_0}")]
    PngDecode(png::DecodingError),

    #[display("could not encode PNG: {_0}")]
    PngEncode(png::EncodingError),

    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    #[display("unsupported PNG format {color_type:?} at {bit_depth:?}")]
    UnsupportedImage {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },

    #[display("image has no pixels")]
    EmptyImage,
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<png::DecodingError> for Error {
    fn from(err: png::DecodingError) -> Self {
        Self::PngDecode(err)
    }
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Self::PngEncode(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
