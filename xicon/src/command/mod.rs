mod doctor;
mod extract;
mod replace;

pub use doctor::doctor;
pub use extract::extract;
pub use replace::{replace, scan, ReplaceReport, Replacer};
