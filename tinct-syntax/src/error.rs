//! Error types for decoding stream data.

use crate::object::Name;
use core::fmt;

/// A specialized [`Result`] type for stream decoding.
pub type Result<T> = core::result::Result<T, DecodeError>;

/// An error raised while decoding the data of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream uses a filter that isn't supported.
    UnsupportedFilter(Name),
    /// The `Filter` entry is neither a name nor an array of names.
    MalformedFilter,
    /// The stream uses a predictor that isn't supported.
    UnsupportedPredictor(i32),
    /// The data of a `FlateDecode` stream is corrupt.
    InvalidFlateData,
    /// The data of an `ASCIIHexDecode` stream contains invalid characters.
    InvalidHexData,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFilter(name) => write!(f, "unsupported filter {}", name.as_str()),
            Self::MalformedFilter => write!(f, "malformed filter entry"),
            Self::UnsupportedPredictor(p) => write!(f, "unsupported predictor {p}"),
            Self::InvalidFlateData => write!(f, "invalid flate data"),
            Self::InvalidHexData => write!(f, "invalid hex data"),
        }
    }
}

impl core::error::Error for DecodeError {}

macro_rules! bail {
    ($err:expr) => {
        return Err($err)
    };
}

pub(crate) use bail;
