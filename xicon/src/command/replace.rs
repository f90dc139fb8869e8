use crate::task::TaskRunner;
use crate::ReplaceConfig;
use anyhow::{Context, Result};
use console::Term;
use icommon::Scaler;
use iconset::{IconFile, IconFormat};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReplaceReport {
    pub succeeded: usize,
    pub failed: usize,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `icon.png` is staged as `icon.png.tmp.png` next to the original.
fn temp_path(path: &Path) -> PathBuf {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.tmp.{}", file_name(path), ext))
}

/// Matches only the `<name>.<ext>.tmp.<ext>` shape produced by `temp_path`.
fn is_temporary(path: &Path) -> bool {
    let name = file_name(path);
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    stem.strip_suffix(".tmp")
        .map(|original| original.ends_with(&format!(".{}", ext)))
        .unwrap_or(false)
}

/// Lists the png, ico and icns files directly inside `dir`, sorted by name.
pub fn scan(dir: &Path) -> Result<Vec<PathBuf>> {
    anyhow::ensure!(
        dir.is_dir(),
        "icons directory {} does not exist",
        dir.display()
    );
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || IconFormat::from_path(&path).is_none() {
            continue;
        }
        if is_temporary(&path) {
            tracing::warn!("ignoring leftover temporary file {}", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Writes a file through a temporary sibling and renames it over `target`.
fn replace_atomic<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let tmp = temp_path(target);
    let result = write(&tmp).and_then(|_| {
        std::fs::rename(&tmp, target)
            .with_context(|| format!("failed to replace {}", target.display()))
    });
    if result.is_err() && tmp.exists() {
        std::fs::remove_file(&tmp).ok();
    }
    result
}

pub struct Replacer {
    scaler: Scaler,
    config: ReplaceConfig,
}

impl Replacer {
    pub fn new(source: &Path, config: ReplaceConfig) -> Result<Self> {
        anyhow::ensure!(
            source.is_file(),
            "source image {} does not exist",
            source.display()
        );
        let scaler = Scaler::open(source)
            .with_context(|| format!("failed to read source image {}", source.display()))?;
        Ok(Self { scaler, config })
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    fn tray_png(&self, path: &Path) -> Option<PathBuf> {
        if IconFormat::from_path(path) == Some(IconFormat::Ico)
            && self.config.is_tray(&file_name(path))
        {
            Some(path.with_extension("png"))
        } else {
            None
        }
    }

    /// Drops pngs that are regenerated together with their tray ico.
    pub fn plan(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        let siblings: HashSet<PathBuf> = files.iter().filter_map(|p| self.tray_png(p)).collect();
        files
            .into_iter()
            .filter(|path| !siblings.contains(path))
            .collect()
    }

    /// Replaces a single icon file in place.
    pub fn replace(&self, path: &Path) -> Result<()> {
        let icon = IconFile::probe(path, &self.config.ico_sizes)?;
        tracing::debug!(
            "replacing {} as {} with sizes {:?}",
            path.display(),
            icon.format(),
            icon.sizes()
        );
        replace_atomic(path, |tmp| {
            icon.encode(&self.scaler, tmp, self.config.icns_backend)
        })?;
        if let Some(png) = self.tray_png(path) {
            self.replace_tray_png(&icon, &png)?;
        }
        Ok(())
    }

    /// The sibling always takes the ico's largest entry size, whatever size
    /// the png had before.
    fn replace_tray_png(&self, icon: &IconFile, png: &Path) -> Result<()> {
        let (width, height) = icon.largest();
        if self.config.is_mono(&file_name(icon.path())) {
            replace_atomic(png, |tmp| {
                iconset::write_template(&self.scaler, width, height, tmp)
            })?;
            tracing::info!(
                "generated template icon {} ({}x{})",
                png.display(),
                width,
                height
            );
        } else {
            replace_atomic(png, |tmp| self.scaler.write(tmp, width, height))?;
            tracing::info!("generated tray png {} ({}x{})", png.display(), width, height);
        }
        Ok(())
    }
}

fn confirm(count: usize) -> Result<bool> {
    let term = Term::stdout();
    term.write_str(&format!("replace all {} icon files? (y/n): ", count))?;
    let answer = term.read_line()?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Replaces every icon in `dir` with a rendition of `source`.
///
/// A failing file is reported and counted, the remaining files are still
/// processed.
pub fn replace(
    source: &Path,
    dir: &Path,
    config: ReplaceConfig,
    yes: bool,
    verbose: bool,
) -> Result<ReplaceReport> {
    let replacer = Replacer::new(source, config)?;
    let (width, height) = replacer.scaler().dimensions();
    println!("source: {} ({}x{})", source.display(), width, height);

    let files = replacer.plan(scan(dir)?);
    anyhow::ensure!(!files.is_empty(), "no icon files found in {}", dir.display());
    println!("found {} icon files:", files.len());
    for path in &files {
        println!("  - {}", file_name(path));
    }
    if !yes && !confirm(files.len())? {
        println!("cancelled");
        return Ok(ReplaceReport::default());
    }

    let mut report = ReplaceReport::default();
    let mut runner = TaskRunner::new(files.len() as u32, verbose);
    for path in &files {
        runner.start_task(file_name(path));
        match replacer.replace(path) {
            Ok(()) => {
                runner.end_task();
                report.succeeded += 1;
            }
            Err(err) => {
                runner.fail_task();
                tracing::error!("{}: {:#}", path.display(), err);
                report.failed += 1;
            }
        }
    }
    println!(
        "done: {} succeeded, {} failed",
        report.succeeded, report.failed
    );
    Ok(report)
}
