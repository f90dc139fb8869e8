//! Cuts a logo out of a circular frame.
//!
//! The pipeline is locate → mask → apply → crop: a [`Locator`] finds the
//! [`CircleRegion`], [`circle_mask`] rasterizes it, [`apply_mask`] turns
//! everything outside the circle transparent and [`crop_to_content`] trims
//! the result to the visible pixels.

use anyhow::Result;
use image::RgbaImage;

mod locate;
mod mask;

pub use locate::{CircleRegion, Locator, DEFAULT_THRESHOLD, RED_SHRINK};
pub use mask::{apply_mask, circle_mask, content_bounds, crop_to_content, Bounds};

pub struct Extraction {
    pub circle: CircleRegion,
    pub image: RgbaImage,
}

pub fn extract(img: &RgbaImage, locator: Locator) -> Result<Extraction> {
    let circle = locator.locate(img)?;
    let (width, height) = img.dimensions();
    let mask = circle_mask(width, height, &circle);
    let image = crop_to_content(apply_mask(img, &mask));
    Ok(Extraction { circle, image })
}
