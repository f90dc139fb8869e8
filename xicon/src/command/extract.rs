use anyhow::Result;
use logo::{Extraction, Locator};
use std::path::Path;

/// Cuts the logo out of `input` and writes it to `output` as png.
pub fn extract(input: &Path, output: &Path, locator: Locator) -> Result<Extraction> {
    let img = icommon::open_rgba(input)?;
    tracing::info!(
        "extracting from {} ({}x{}) with {:?}",
        input.display(),
        img.width(),
        img.height(),
        locator
    );
    let extraction = logo::extract(&img, locator)?;
    icommon::save_png(&extraction.image, output)?;
    println!("circle: {}", extraction.circle);
    println!(
        "saved {} ({}x{})",
        output.display(),
        extraction.image.width(),
        extraction.image.height()
    );
    Ok(extraction)
}
