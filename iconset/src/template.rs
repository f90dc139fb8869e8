use image::{Rgba, RgbaImage};

/// Converts an icon into a monochrome template icon.
///
/// Template icons only carry information in the alpha channel, the color is
/// supplied by the desktop theme at render time. Every visible pixel becomes
/// black with its alpha scaled by the pixel's luma, but never below half of
/// the original alpha so dark areas stay visible.
pub fn template_icon(img: &RgbaImage) -> RgbaImage {
    let gray = image::imageops::grayscale(img);
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let alpha = img.get_pixel(x, y)[3];
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let luma = gray.get_pixel(x, y)[0] as u32;
        let adjusted = (alpha as u32 * luma / 255) as u8;
        Rgba([0, 0, 0, adjusted.max(alpha / 2)])
    })
}
