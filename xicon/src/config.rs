use anyhow::{Context, Result};
use iconset::{IcnsBackend, DEFAULT_ICO_SIZES};
use serde::Deserialize;
use std::path::Path;

pub const TRAY_MARKER: &str = "tray-icon";
pub const MONO_MARKER: &str = "mono";

/// Settings for a batch replacement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplaceConfig {
    /// Entry sizes used for ico files whose own entries can't be read.
    pub ico_sizes: Vec<u32>,
    /// Ico files containing this marker also get a sibling png.
    pub tray_marker: String,
    /// Tray siblings containing this marker are rendered as template icons.
    pub mono_marker: String,
    pub icns_backend: IcnsBackend,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            ico_sizes: DEFAULT_ICO_SIZES.to_vec(),
            tray_marker: TRAY_MARKER.into(),
            mono_marker: MONO_MARKER.into(),
            icns_backend: IcnsBackend::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    ico_sizes: Option<Vec<u32>>,
    tray_marker: Option<String>,
    mono_marker: Option<String>,
    icns_backend: Option<String>,
}

impl ReplaceConfig {
    /// Loads a yaml config file on top of the defaults.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let raw: Option<RawConfig> = serde_yaml::from_str(contents)?;
        let raw = raw.unwrap_or_default();
        let mut config = Self::default();
        if let Some(sizes) = raw.ico_sizes {
            config.ico_sizes = sizes;
        }
        if let Some(marker) = raw.tray_marker {
            config.tray_marker = marker;
        }
        if let Some(marker) = raw.mono_marker {
            config.mono_marker = marker;
        }
        if let Some(backend) = raw.icns_backend {
            config.icns_backend = backend.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.ico_sizes.is_empty(), "ico_sizes must not be empty");
        for size in &self.ico_sizes {
            anyhow::ensure!(
                (1..=256).contains(size),
                "ico size {} is out of range 1..=256",
                size
            );
        }
        anyhow::ensure!(!self.tray_marker.is_empty(), "tray_marker must not be empty");
        anyhow::ensure!(!self.mono_marker.is_empty(), "mono_marker must not be empty");
        Ok(())
    }

    pub fn is_tray(&self, file_name: &str) -> bool {
        file_name.contains(&self.tray_marker)
    }

    pub fn is_mono(&self, file_name: &str) -> bool {
        file_name.contains(&self.mono_marker)
    }
}
