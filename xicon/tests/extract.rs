use anyhow::Result;
use image::{Rgba, RgbaImage};
use logo::Locator;
use xicon::command::extract;

fn framed_logo(path: &std::path::Path) -> Result<()> {
    RgbaImage::from_fn(512, 512, |x, y| {
        let dx = x as i64 - 256;
        let dy = y as i64 - 256;
        let d2 = dx * dx + dy * dy;
        if (197 * 197..=200 * 200).contains(&d2) {
            Rgba([240, 20, 20, 255])
        } else if d2 < 100 * 100 {
            Rgba([30, 90, 200, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
    .save(path)?;
    Ok(())
}

#[test]
fn red_frame_is_cut_out() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("logo.png");
    let output = dir.path().join("logo-extracted.png");
    framed_logo(&input)?;

    let extraction = extract(&input, &output, Locator::Red)?;
    assert_eq!((extraction.circle.x, extraction.circle.y), (256, 256));
    assert_eq!(extraction.circle.radius, 196);

    let out = icommon::open_rgba(&output)?;
    let (w, h) = out.dimensions();
    assert!((392..=393).contains(&w) && (392..=393).contains(&h));
    // corners lie outside the circle
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(w - 1, h - 1)[3], 0);
    // the logo in the middle keeps its color
    assert_eq!(*out.get_pixel(w / 2, h / 2), Rgba([30, 90, 200, 255]));
    // no frame pixels survive
    assert!(!out.pixels().any(|p| p[3] != 0 && p[0] == 240));
    Ok(())
}

#[test]
fn fixed_ratio_cut() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("logo.png");
    let output = dir.path().join("out.png");
    framed_logo(&input)?;

    let extraction = extract(&input, &output, Locator::Fixed { ratio: 0.5 })?;
    assert_eq!(extraction.circle.radius, 128);
    let (w, h) = icommon::open_rgba(&output)?.dimensions();
    assert!((256..=257).contains(&w) && (256..=257).contains(&h));
    Ok(())
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = extract(
        &dir.path().join("missing.png"),
        &dir.path().join("out.png"),
        Locator::Red,
    );
    assert!(result.is_err());
    assert!(!dir.path().join("out.png").exists());
}
