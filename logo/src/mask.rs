use crate::CircleRegion;
use image::{GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

/// Builds a binary mask with the circle filled at 255.
pub fn circle_mask(width: u32, height: u32, circle: &CircleRegion) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let radius = i32::try_from(circle.radius).unwrap_or(i32::MAX);
    draw_filled_circle_mut(&mut mask, (circle.x, circle.y), radius, Luma([255]));
    mask
}

/// Copies `img` and replaces its alpha channel with `mask`.
pub fn apply_mask(img: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    debug_assert_eq!(img.dimensions(), mask.dimensions());
    let mut out = img.clone();
    for (pixel, alpha) in out.pixels_mut().zip(mask.pixels()) {
        pixel[3] = alpha[0];
    }
    out
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Smallest rectangle containing every pixel that is not fully transparent.
pub fn content_bounds(img: &RgbaImage) -> Option<Bounds> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| Bounds {
        x: x0,
        y: y0,
        width: x1 - x0 + 1,
        height: y1 - y0 + 1,
    })
}

/// Crops to the visible content. Fully transparent images are returned as is.
pub fn crop_to_content(img: RgbaImage) -> RgbaImage {
    match content_bounds(&img) {
        Some(b) => image::imageops::crop_imm(&img, b.x, b.y, b.width, b.height).to_image(),
        None => {
            log::warn!("image is fully transparent, skipping crop");
            img
        }
    }
}
