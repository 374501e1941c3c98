//! Markdown note writer.

pub mod filename;

pub use filename::{extract_title, generate_filename, sanitize_filename};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::AppSettings;
use crate::error::{MdCaptureResult, OptionExt, ResultExt};

/// Write `content` into the configured save folder.
///
/// A custom filename wins over the template. Returns the filename used.
pub fn save_markdown(
    settings: &AppSettings,
    content: &str,
    custom_filename: Option<&str>,
) -> MdCaptureResult<String> {
    let folder = PathBuf::from(&settings.save_folder);
    fs::create_dir_all(&folder)
        .with_context(|| format!("Failed to create save folder {}", folder.display()))?;

    let filename = match custom_filename.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => custom_name(name)?,
        None => generate_filename(content, &settings.filename_template, &Local::now()),
    };

    let path = folder.join(&filename);
    fs::write(&path, content)?;

    log::info!("[NOTES] Saved markdown to {}", path.display());
    Ok(filename)
}

/// Keep only the final path component so a custom name cannot escape the
/// save folder.
fn custom_name(name: &str) -> MdCaptureResult<String> {
    Path::new(name)
        .file_name()
        .map(|file_name| file_name.to_string_lossy().to_string())
        .context(&format!("Invalid filename: {}", name))
}
