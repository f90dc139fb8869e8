use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// Decodes the image at `path` and normalizes it to 8-bit RGBA.
pub fn open_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Reads the pixel dimensions of an image without decoding it.
pub fn dimensions<P: AsRef<Path>>(path: P) -> Result<(u32, u32)> {
    let path = path.as_ref();
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
        .with_context(|| format!("failed to read dimensions of {}", path.display()))?;
    Ok((width, height))
}

pub fn save_png<P: AsRef<Path>>(img: &RgbaImage, path: P) -> Result<()> {
    let path = path.as_ref();
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Produces resized copies of a source image.
///
/// The target size is taken verbatim, the aspect ratio of the source is not
/// preserved.
pub struct Scaler {
    img: RgbaImage,
}

impl Scaler {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            img: open_rgba(path)?,
        })
    }

    pub fn new(img: DynamicImage) -> Self {
        Self {
            img: img.to_rgba8(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<RgbaImage> {
        anyhow::ensure!(
            width > 0 && height > 0,
            "invalid target size {}x{}",
            width,
            height
        );
        log::debug!(
            "scaling {}x{} to {}x{}",
            self.img.width(),
            self.img.height(),
            width,
            height
        );
        Ok(image::imageops::resize(
            &self.img,
            width,
            height,
            FilterType::Lanczos3,
        ))
    }

    pub fn write<P: AsRef<Path>>(&self, path: P, width: u32, height: u32) -> Result<()> {
        save_png(&self.resize(width, height)?, path)
    }
}
