//! Decoded texture images

use std::path::Path;

use crate::asset_cache::Asset;
use crate::asset_error::AssetError;

/// An RGBA8 image ready for upload
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Decode PNG or JPEG bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    /// Single-pixel texture of one colour
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// Default map for untextured materials
    pub fn white() -> Self {
        Self::solid([255, 255, 255, 255])
    }

    /// Bytes per row
    pub fn stride(&self) -> u32 {
        self.width * 4
    }
}

impl Asset for TextureData {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
