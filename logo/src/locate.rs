use anyhow::Result;
use image::RgbaImage;

/// Brightness above which a pixel is considered part of the frame.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Radius shrink applied to a detected red ring so the ring itself is cut off.
pub const RED_SHRINK: f64 = 0.98;

/// A circle in pixel coordinates. The center may lie outside the image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CircleRegion {
    pub x: i32,
    pub y: i32,
    pub radius: u32,
}

impl std::fmt::Display for CircleRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "center=({}, {}) radius={}", self.x, self.y, self.radius)
    }
}

/// Strategy used to find the circle enclosing the logo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Locator {
    /// Circle centered in the image, radius a fraction of the shorter half side.
    Fixed { ratio: f64 },
    /// Center at the centroid of all pixels brighter than `threshold`.
    Brightness { threshold: u8, ratio: f64 },
    /// Circle inscribed in the bounding box of all red pixels.
    Red,
}

impl Locator {
    pub fn locate(&self, img: &RgbaImage) -> Result<CircleRegion> {
        let (width, height) = img.dimensions();
        anyhow::ensure!(width > 0 && height > 0, "empty image");
        let circle = match *self {
            Self::Fixed { ratio } => CircleRegion {
                x: (width / 2) as i32,
                y: (height / 2) as i32,
                radius: ratio_radius(width, height, ratio)?,
            },
            Self::Brightness { threshold, ratio } => {
                let radius = ratio_radius(width, height, ratio)?;
                let (x, y) = bright_centroid(img, threshold).unwrap_or_else(|| {
                    log::debug!("no pixel brighter than {}, using image center", threshold);
                    (width / 2, height / 2)
                });
                CircleRegion {
                    x: x as i32,
                    y: y as i32,
                    radius,
                }
            }
            Self::Red => red_circle(img),
        };
        log::debug!("located circle {}", circle);
        Ok(circle)
    }
}

fn ratio_radius(width: u32, height: u32, ratio: f64) -> Result<u32> {
    anyhow::ensure!(
        ratio.is_finite() && ratio > 0.0 && ratio <= 1.0,
        "radius ratio must be in (0, 1], got {}",
        ratio
    );
    let radius = (width.min(height) as f64 / 2.0 * ratio).floor() as u32;
    Ok(radius.max(1))
}

fn bright_centroid(img: &RgbaImage, threshold: u8) -> Option<(u32, u32)> {
    // mean of all four channels > threshold, kept in integers
    let limit = threshold as u32 * 4;
    let mut count = 0u64;
    let mut sum_x = 0u64;
    let mut sum_y = 0u64;
    for (x, y, pixel) in img.enumerate_pixels() {
        let sum: u32 = pixel.0.iter().map(|c| *c as u32).sum();
        if sum > limit {
            count += 1;
            sum_x += x as u64;
            sum_y += y as u64;
        }
    }
    if count == 0 {
        return None;
    }
    Some(((sum_x / count) as u32, (sum_y / count) as u32))
}

fn is_red(r: u8, g: u8, b: u8) -> bool {
    let r = r as f32;
    r > 200.0 && r > g as f32 * 1.5 && r > b as f32 * 1.5
}

fn red_circle(img: &RgbaImage) -> CircleRegion {
    let (width, height) = img.dimensions();
    let half = (width.min(height) / 2).max(1);
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if !is_red(pixel[0], pixel[1], pixel[2]) {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    let Some((min_x, min_y, max_x, max_y)) = bounds else {
        log::warn!("no red frame detected, using image center");
        return CircleRegion {
            x: (width / 2) as i32,
            y: (height / 2) as i32,
            radius: half,
        };
    };
    let radius = (max_x - min_x).min(max_y - min_y) / 2;
    let mut radius = (radius as f64 * RED_SHRINK) as u32;
    if radius == 0 {
        log::warn!("red frame is degenerate, using half the shorter side as radius");
        radius = half;
    }
    CircleRegion {
        x: ((min_x + max_x) / 2) as i32,
        y: ((min_y + max_y) / 2) as i32,
        radius,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::Rgba;

    pub fn red_ring(size: u32, center: i64, outer: i64, inner: i64) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let dx = x as i64 - center;
            let dy = y as i64 - center;
            let d2 = dx * dx + dy * dy;
            if d2 <= outer * outer && d2 >= inner * inner {
                Rgba([230, 30, 40, 255])
            } else {
                Rgba([250, 250, 250, 255])
            }
        })
    }

    #[test]
    fn fixed_ratio() -> Result<()> {
        let img = RgbaImage::new(400, 300);
        let circle = Locator::Fixed { ratio: 0.75 }.locate(&img)?;
        assert_eq!(
            circle,
            CircleRegion {
                x: 200,
                y: 150,
                radius: 112
            }
        );
        let circle = Locator::Fixed { ratio: 0.95 }.locate(&img)?;
        assert_eq!(circle.radius, 142);
        Ok(())
    }

    #[test]
    fn fixed_ratio_never_zero() -> Result<()> {
        let img = RgbaImage::new(1, 1);
        assert_eq!(Locator::Fixed { ratio: 0.5 }.locate(&img)?.radius, 1);
        Ok(())
    }

    #[test]
    fn invalid_ratio() {
        let img = RgbaImage::new(10, 10);
        for ratio in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(Locator::Fixed { ratio }.locate(&img).is_err());
        }
    }

    #[test]
    fn brightness_centroid_within_bounds() -> Result<()> {
        for (w, h, bx, by) in [(64, 64, 0, 0), (100, 40, 99, 39), (33, 77, 10, 60)] {
            let mut img = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]));
            img.put_pixel(bx, by, Rgba([255, 255, 255, 255]));
            let circle = Locator::Brightness {
                threshold: DEFAULT_THRESHOLD,
                ratio: 0.75,
            }
            .locate(&img)?;
            assert_eq!((circle.x, circle.y), (bx as i32, by as i32));
            assert!(circle.x >= 0 && (circle.x as u32) < w);
            assert!(circle.y >= 0 && (circle.y as u32) < h);
        }
        Ok(())
    }

    #[test]
    fn brightness_uses_centroid() -> Result<()> {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        for x in 10..21 {
            for y in 30..41 {
                img.put_pixel(x, y, Rgba([240, 240, 240, 255]));
            }
        }
        let circle = Locator::Brightness {
            threshold: DEFAULT_THRESHOLD,
            ratio: 0.75,
        }
        .locate(&img)?;
        assert_eq!(
            circle,
            CircleRegion {
                x: 15,
                y: 35,
                radius: 37
            }
        );
        Ok(())
    }

    #[test]
    fn brightness_falls_back_to_center() -> Result<()> {
        let img = RgbaImage::from_pixel(80, 60, Rgba([100, 100, 100, 255]));
        let circle = Locator::Brightness {
            threshold: DEFAULT_THRESHOLD,
            ratio: 0.75,
        }
        .locate(&img)?;
        assert_eq!(
            circle,
            CircleRegion {
                x: 40,
                y: 30,
                radius: 22
            }
        );
        Ok(())
    }

    #[test]
    fn red_ring_bounds() -> Result<()> {
        let img = red_ring(512, 256, 200, 190);
        let circle = Locator::Red.locate(&img)?;
        assert_eq!(
            circle,
            CircleRegion {
                x: 256,
                y: 256,
                radius: 196
            }
        );
        Ok(())
    }

    #[test]
    fn no_red_falls_back() -> Result<()> {
        let img = RgbaImage::from_pixel(120, 90, Rgba([255, 255, 255, 255]));
        let circle = Locator::Red.locate(&img)?;
        assert_eq!(
            circle,
            CircleRegion {
                x: 60,
                y: 45,
                radius: 45
            }
        );
        // dark red and orange do not qualify
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([180, 0, 0, 255]));
        img.put_pixel(3, 3, Rgba([255, 200, 0, 255]));
        assert_eq!(Locator::Red.locate(&img)?.radius, 5);
        Ok(())
    }

    #[test]
    fn degenerate_red_box() -> Result<()> {
        let mut img = RgbaImage::from_pixel(64, 32, Rgba([0, 0, 0, 255]));
        img.put_pixel(5, 7, Rgba([255, 0, 0, 255]));
        let circle = Locator::Red.locate(&img)?;
        assert_eq!(
            circle,
            CircleRegion {
                x: 5,
                y: 7,
                radius: 16
            }
        );
        Ok(())
    }

    #[test]
    fn empty_image() {
        assert!(Locator::Red.locate(&RgbaImage::new(0, 0)).is_err());
    }
}
