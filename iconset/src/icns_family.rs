use anyhow::{Context, Result};
use icns::{IconFamily, IconType, PixelFormat};
use icommon::Scaler;
use image::RgbaImage;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Command;

pub const ICNS_SIZES: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

struct IconsetEntry {
    name: &'static str,
    pixels: u32,
    icon_type: IconType,
}

const fn entry(name: &'static str, pixels: u32, icon_type: IconType) -> IconsetEntry {
    IconsetEntry {
        name,
        pixels,
        icon_type,
    }
}

/// Layout of an `.iconset` directory as expected by `iconutil`.
const ICONSET: [IconsetEntry; 10] = [
    entry("icon_16x16.png", 16, IconType::RGBA32_16x16),
    entry("icon_16x16@2x.png", 32, IconType::RGBA32_16x16_2x),
    entry("icon_32x32.png", 32, IconType::RGBA32_32x32),
    entry("icon_32x32@2x.png", 64, IconType::RGBA32_32x32_2x),
    entry("icon_128x128.png", 128, IconType::RGBA32_128x128),
    entry("icon_128x128@2x.png", 256, IconType::RGBA32_128x128_2x),
    entry("icon_256x256.png", 256, IconType::RGBA32_256x256),
    entry("icon_256x256@2x.png", 512, IconType::RGBA32_256x256_2x),
    entry("icon_512x512.png", 512, IconType::RGBA32_512x512),
    entry("icon_512x512@2x.png", 1024, IconType::RGBA32_512x512_2x),
];

/// How icns containers are produced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IcnsBackend {
    /// Stage an `.iconset` directory and compile it with `iconutil`.
    Iconutil,
    /// Encode the container in process.
    Native,
}

impl Default for IcnsBackend {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Iconutil
        } else {
            Self::Native
        }
    }
}

impl std::fmt::Display for IcnsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Iconutil => write!(f, "iconutil"),
            Self::Native => write!(f, "native"),
        }
    }
}

impl std::str::FromStr for IcnsBackend {
    type Err = anyhow::Error;

    fn from_str(backend: &str) -> Result<Self> {
        Ok(match backend {
            "iconutil" => Self::Iconutil,
            "native" => Self::Native,
            _ => anyhow::bail!("unsupported icns backend {}", backend),
        })
    }
}

fn render(scaler: &Scaler) -> Result<BTreeMap<u32, RgbaImage>> {
    let mut images = BTreeMap::new();
    for size in ICNS_SIZES {
        images.insert(size, scaler.resize(size, size)?);
    }
    Ok(images)
}

/// Writes the `.iconset` staging directory for `scaler` into `dir`.
pub fn stage(scaler: &Scaler, dir: &Path) -> Result<()> {
    let images = render(scaler)?;
    std::fs::remove_dir_all(dir).ok();
    std::fs::create_dir_all(dir)?;
    for entry in &ICONSET {
        icommon::save_png(&images[&entry.pixels], dir.join(entry.name))?;
    }
    Ok(())
}

pub fn write_icns(scaler: &Scaler, out: &Path, backend: IcnsBackend) -> Result<()> {
    match backend {
        IcnsBackend::Iconutil => write_iconutil(scaler, out),
        IcnsBackend::Native => write_native(scaler, out),
    }
}

fn write_iconutil(scaler: &Scaler, out: &Path) -> Result<()> {
    let staging = out.with_extension("iconset");
    let result = stage(scaler, &staging).and_then(|_| iconutil(&staging, out));
    if let Err(err) = std::fs::remove_dir_all(&staging) {
        log::warn!("failed to remove {}: {}", staging.display(), err);
    }
    result
}

fn iconutil(iconset: &Path, out: &Path) -> Result<()> {
    let mut command = Command::new("iconutil");
    command.arg("-c").arg("icns").arg(iconset).arg("-o").arg(out);
    log::debug!("running {:?}", command);
    let output = command
        .output()
        .with_context(|| format!("failed to run `{:?}`", command))?;
    if !output.status.success() {
        anyhow::bail!(
            "iconutil exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

fn write_native(scaler: &Scaler, out: &Path) -> Result<()> {
    let images = render(scaler)?;
    let mut family = IconFamily::new();
    for entry in &ICONSET {
        let img = &images[&entry.pixels];
        let image = icns::Image::from_data(
            PixelFormat::RGBA,
            entry.pixels,
            entry.pixels,
            img.as_raw().clone(),
        )?;
        family
            .add_icon_with_type(&image, entry.icon_type)
            .with_context(|| format!("failed to add {} to icns", entry.name))?;
    }
    let mut w = BufWriter::new(File::create(out)?);
    family.write(&mut w)?;
    w.flush()?;
    Ok(())
}
