use std::path::Path;

use cw_core::Content;

pub fn run(path: &Path) -> Result<(), String> {
    let json = super::read_content(path)?;
    let content =
        Content::from_json(&json).map_err(|err| super::report_content_error(path, err))?;
    let warnings = content
        .validated()
        .map_err(|err| super::report_content_error(path, err))?;

    for warning in &warnings {
        eprintln!("  {warning}");
    }

    let title = if content.title.is_empty() {
        path.display().to_string()
    } else {
        content.title.clone()
    };
    println!("  All checks passed for '{title}'.");
    println!(
        "  {} scenes, {} items, {} characters, {} warning{}",
        content.scenes.len(),
        content.items.len(),
        content.characters.len(),
        warnings.len(),
        if warnings.len() == 1 { "" } else { "s" },
    );

    Ok(())
}
