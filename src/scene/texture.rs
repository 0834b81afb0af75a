use crate::error::ViewerError;

/// Decoded RGBA8 pixels, row-major from the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl Default for TextureData {
    fn default() -> Self {
        Self::grey()
    }
}

impl TextureData {
    /// Wrap decoded pixels, checking the buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::SceneLoad`] if `rgba` does not hold exactly
    /// `width * height` pixels.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<Self, ViewerError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(ViewerError::SceneLoad(format!(
                "{width}x{height} texture needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// 1×1 texture of a single color.
    #[must_use]
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// Mid-grey fallback for objects without a texture.
    #[must_use]
    pub fn grey() -> Self {
        Self::solid([128, 128, 128, 255])
    }

    /// Bytes per row for upload.
    #[must_use]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}
