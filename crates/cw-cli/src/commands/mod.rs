pub mod check;
pub mod list;
pub mod play;
pub mod show;

use std::path::Path;

use cw_core::{ContentError, World};

/// Read a content file.
fn read_content(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

/// Load and validate a content file. Warnings are logged while loading.
fn load_world(path: &Path) -> Result<World, String> {
    let json = read_content(path)?;
    World::from_json(&json).map_err(|err| report_content_error(path, err))
}

/// Render a content error with miette and return a short summary.
fn report_content_error(path: &Path, err: ContentError) -> String {
    eprintln!("{:?}", miette::Report::new(err));
    format!("{} failed validation", path.display())
}
