//! Errors raised while reading models and textures
//!
//! None of these abort the demo; the loader logs them and moves on.

use std::io;
use std::fmt;

#[derive(Debug)]
pub enum AssetError {
    Io(io::Error),
    /// Malformed JSON model or manifest entry
    Parse(String),
    /// Texture bytes that are not a supported image
    Decode(String),
    /// Name or path with nothing behind it
    NotFound(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "could not read asset: {}", err),
            AssetError::Parse(msg) => write!(f, "invalid model data: {}", msg),
            AssetError::Decode(msg) => write!(f, "invalid image: {}", msg),
            AssetError::NotFound(name) => write!(f, "no asset named {}", name),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            AssetError::Parse(_) | AssetError::Decode(_) | AssetError::NotFound(_) => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(err: serde_json::Error) -> Self {
        AssetError::Parse(err.to_string())
    }
}

impl From<image::ImageError> for AssetError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => AssetError::Io(io),
            other => AssetError::Decode(other.to_string()),
        }
    }
}
