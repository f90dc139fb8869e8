use anyhow::{Context, Result};
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use icommon::Scaler;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const DEFAULT_ICO_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Largest edge an ico directory entry can describe.
const MAX_ICO_SIZE: u32 = 256;

/// Lists the sizes of all entries in an existing ico file.
pub fn read_sizes(path: &Path) -> Result<Vec<(u32, u32)>> {
    let file = File::open(path)?;
    let dir = IconDir::read(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(dir
        .entries()
        .iter()
        .map(|entry| (entry.width(), entry.height()))
        .collect())
}

/// Picks the entry sizes for a replacement ico, largest first.
///
/// Sizes that cannot be stored in an ico are dropped; when nothing usable is
/// left `defaults` are used instead.
pub fn resolve_sizes(probed: &[(u32, u32)], defaults: &[u32]) -> Vec<(u32, u32)> {
    let valid = |(w, h): &(u32, u32)| (1..=MAX_ICO_SIZE).contains(w) && (1..=MAX_ICO_SIZE).contains(h);
    let mut sizes: Vec<(u32, u32)> = probed.iter().copied().filter(valid).collect();
    if sizes.is_empty() {
        sizes = defaults.iter().map(|s| (*s, *s)).filter(valid).collect();
    }
    sizes.sort_by(|a, b| (b.0 * b.1, b.0).cmp(&(a.0 * a.1, a.0)));
    sizes.dedup();
    sizes
}

pub fn write_ico(scaler: &Scaler, sizes: &[(u32, u32)], out: &Path) -> Result<()> {
    anyhow::ensure!(!sizes.is_empty(), "no ico sizes to encode");
    let mut dir = IconDir::new(ResourceType::Icon);
    for &(width, height) in sizes {
        let img = scaler.resize(width, height)?;
        let image = IconImage::from_rgba_data(width, height, img.into_raw());
        let entry = IconDirEntry::encode(&image)
            .with_context(|| format!("failed to encode {}x{} ico entry", width, height))?;
        dir.add_entry(entry);
    }
    let mut w = BufWriter::new(File::create(out)?);
    dir.write(&mut w)?;
    w.flush()?;
    Ok(())
}
