use iconset::IcnsBackend;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Doctor {
    checks: Vec<Check>,
}

impl Default for Doctor {
    fn default() -> Self {
        Self {
            checks: vec![Check::new("iconutil")],
        }
    }
}

impl std::fmt::Display for Doctor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{:-^1$}", "external tools", 60)?;
        for check in &self.checks {
            write!(f, "{:20} ", check.name)?;
            match &check.path {
                Some(path) => writeln!(f, "{}", path.display())?,
                None => writeln!(f, "not found")?,
            }
        }
        writeln!(f)?;
        writeln!(f, "{:-^1$}", "defaults", 60)?;
        writeln!(f, "{:20} {}", "icns backend", IcnsBackend::default())
    }
}

#[derive(Debug)]
struct Check {
    name: &'static str,
    path: Option<PathBuf>,
}

impl Check {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            path: which::which(name).ok(),
        }
    }
}

pub fn doctor() {
    let doctor = Doctor::default();
    print!("{}", doctor);
}
