//! Filename cleanup for scraped source images.
//!
//! Scraped files arrive with names like `board.webp.jpg` or `board.jpeg`;
//! everything downstream expects plain `.jpg` names. Renames happen
//! in-place, one directory at a time, before the organizer runs.

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::core::error::OrganizeError;

/// Rewrite file names in `dir`: drop every `.webp` substring, then turn
/// `.jpeg` into `.jpg`. Returns the number of files renamed. A second pass
/// over the same directory renames nothing.
pub fn normalize_extensions(dir: &Path) -> Result<usize, OrganizeError> {
    if !dir.is_dir() {
        return Err(OrganizeError::MissingRoot(dir.to_path_buf()));
    }

    let mut renamed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let new_name = file_name.replace(".webp", "").replace(".jpeg", ".jpg");
        if new_name == file_name {
            continue;
        }

        let target = dir.join(&new_name);
        if target.exists() {
            warn!(
                "Not renaming {} -> {}: target already exists",
                file_name, new_name
            );
            continue;
        }

        fs::rename(entry.path(), &target)?;
        info!("Renamed: {} -> {}", file_name, new_name);
        renamed += 1;
    }

    Ok(renamed)
}
