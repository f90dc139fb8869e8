use anyhow::Result;
use clap::Parser;
use iconset::IcnsBackend;
use logo::{Locator, DEFAULT_THRESHOLD};
use std::path::{Path, PathBuf};

pub mod command;
mod config;
mod task;

pub use config::{ReplaceConfig, MONO_MARKER, TRAY_MARKER};

/// How `extract` finds the circle around the logo.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Fixed,
    Brightness,
    Red,
}

impl Mode {
    pub fn default_ratio(self) -> f64 {
        match self {
            Self::Brightness => 0.75,
            _ => 0.95,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Brightness => write!(f, "brightness"),
            Self::Red => write!(f, "red"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(mode: &str) -> Result<Self> {
        Ok(match mode {
            "fixed" => Self::Fixed,
            "brightness" => Self::Brightness,
            "red" => Self::Red,
            _ => anyhow::bail!("unsupported mode {}", mode),
        })
    }
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Image containing the logo inside a circular frame
    pub input: PathBuf,
    /// Output png. Defaults to `<input>-extracted.png` next to the input
    #[clap(long, short)]
    pub output: Option<PathBuf>,
    /// How to locate the circle. Can be one of `fixed`, `brightness` or `red`
    #[clap(long, default_value = "red")]
    pub mode: Mode,
    /// Radius as a fraction of half the shorter image side, used by the
    /// `fixed` (default 0.95) and `brightness` (default 0.75) modes
    #[clap(long)]
    pub ratio: Option<f64>,
    /// Brightness above which a pixel counts as part of the frame
    #[clap(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,
}

impl ExtractArgs {
    pub fn locator(&self) -> Locator {
        let ratio = self.ratio.unwrap_or_else(|| self.mode.default_ratio());
        match self.mode {
            Mode::Fixed => Locator::Fixed { ratio },
            Mode::Brightness => Locator::Brightness {
                threshold: self.threshold,
                ratio,
            },
            Mode::Red => Locator::Red,
        }
    }

    pub fn input(&self) -> PathBuf {
        expand_home(&self.input)
    }

    pub fn output(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return expand_home(output);
        }
        let input = self.input();
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".into());
        input.with_file_name(format!("{}-extracted.png", stem))
    }
}

#[derive(Parser, Debug)]
pub struct ReplaceArgs {
    /// Image the icons are generated from
    pub source: PathBuf,
    /// Directory containing the png, ico and icns files to replace
    pub icons_dir: PathBuf,
    /// Replace without asking for confirmation
    #[clap(long, short)]
    pub yes: bool,
    /// Path to a yaml file with replacement settings
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Comma separated ico entry sizes used when an ico can't be read
    #[clap(long, value_delimiter = ',')]
    pub ico_sizes: Vec<u32>,
    /// How icns files are produced. Can be one of `iconutil` or `native`
    #[clap(long)]
    pub icns_backend: Option<IcnsBackend>,
    /// Keep per file progress lines and log output
    #[clap(long, short)]
    pub verbose: bool,
}

impl ReplaceArgs {
    pub fn config(&self) -> Result<ReplaceConfig> {
        let mut config = if let Some(path) = &self.config {
            ReplaceConfig::parse(expand_home(path))?
        } else {
            ReplaceConfig::default()
        };
        if !self.ico_sizes.is_empty() {
            config.ico_sizes = self.ico_sizes.clone();
        }
        if let Some(backend) = self.icns_backend {
            config.icns_backend = backend;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
