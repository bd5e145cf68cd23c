use gl::types::*;
use image::RgbaImage;
use std::path::Path;

use crate::error::RenderError;

/// Color used when the object texture cannot be loaded.
pub const FALLBACK_COLOR: [u8; 4] = [0, 0, 0, 255];
/// Tangent-space +Z, so a missing normal map leaves normals untouched.
pub const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

/// Decode an image file into RGBA8 rows ordered bottom-up, the way GL
/// expects them.
pub fn decode(path: &Path) -> Result<RgbaImage, RenderError> {
    let image = image::open(path).map_err(|source| RenderError::TextureLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.flipv().to_rgba8())
}

pub struct Texture2D {
    id: GLuint,
}

impl Texture2D {
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let image = decode(path)?;
        tracing::debug!(path = %path.display(), width = image.width(), height = image.height(), "texture loaded");
        Ok(Self::from_rgba(&image))
    }

    /// Load `path`, or fall back to a 1x1 texture of `fallback`.
    pub fn load_or(path: &Path, fallback: [u8; 4]) -> Self {
        match Self::from_file(path) {
            Ok(texture) => texture,
            Err(err) => {
                tracing::warn!("{err}; using 1x1 fallback {fallback:?}");
                Self::solid(fallback)
            }
        }
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::from_rgba(&RgbaImage::from_pixel(1, 1, image::Rgba(rgba)))
    }

    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                image.as_raw().as_ptr() as *const _,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as GLint,
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        Self { id }
    }

    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}
