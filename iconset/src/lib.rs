use anyhow::Result;
use icommon::Scaler;
use std::path::{Path, PathBuf};

mod icns_family;
mod ico_dir;
mod template;

pub use icns_family::{stage, write_icns, IcnsBackend, ICNS_SIZES};
pub use ico_dir::{read_sizes, resolve_sizes, write_ico, DEFAULT_ICO_SIZES};
pub use template::template_icon;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IconFormat {
    Png,
    Ico,
    Icns,
}

impl IconFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Some(match ext.as_str() {
            "png" => Self::Png,
            "ico" => Self::Ico,
            "icns" => Self::Icns,
            _ => return None,
        })
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Ico => "ico",
            Self::Icns => "icns",
        }
    }
}

impl std::fmt::Display for IconFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// An existing icon file together with the sizes a replacement must have.
#[derive(Clone, Debug)]
pub struct IconFile {
    path: PathBuf,
    format: IconFormat,
    sizes: Vec<(u32, u32)>,
}

impl IconFile {
    /// Reads the sizes of the icon at `path`.
    ///
    /// Unreadable ico files fall back to `ico_sizes`, icns files always use
    /// the canonical size set.
    pub fn probe(path: &Path, ico_sizes: &[u32]) -> Result<Self> {
        let format = IconFormat::from_path(path)
            .ok_or_else(|| anyhow::anyhow!("unsupported icon {}", path.display()))?;
        let sizes = match format {
            IconFormat::Png => vec![icommon::dimensions(path)?],
            IconFormat::Ico => {
                let probed = read_sizes(path).unwrap_or_else(|err| {
                    log::warn!("{:#}, using default ico sizes", err);
                    Vec::new()
                });
                resolve_sizes(&probed, ico_sizes)
            }
            IconFormat::Icns => ICNS_SIZES.iter().map(|s| (*s, *s)).collect(),
        };
        anyhow::ensure!(!sizes.is_empty(), "no sizes for {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            format,
            sizes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> IconFormat {
        self.format
    }

    pub fn sizes(&self) -> &[(u32, u32)] {
        &self.sizes
    }

    /// The size of the largest entry, which is what image viewers report.
    pub fn largest(&self) -> (u32, u32) {
        self.sizes
            .iter()
            .copied()
            .max_by_key(|(w, h)| (u64::from(*w) * u64::from(*h), *w))
            .unwrap_or_default()
    }

    /// Encodes a replacement for this icon into `out`.
    pub fn encode(&self, scaler: &Scaler, out: &Path, backend: IcnsBackend) -> Result<()> {
        match self.format {
            IconFormat::Png => {
                let (width, height) = self.largest();
                scaler.write(out, width, height)
            }
            IconFormat::Ico => write_ico(scaler, &self.sizes, out),
            IconFormat::Icns => write_icns(scaler, out, backend),
        }
    }
}

/// Writes a monochrome template png of the given size.
pub fn write_template(scaler: &Scaler, width: u32, height: u32, out: &Path) -> Result<()> {
    let img = template_icon(&scaler.resize(width, height)?);
    icommon::save_png(&img, out)
}
