use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use super::error::OrganizeError;

/// Enumerate defect categories from the annotation tree.
///
/// Every immediate subdirectory under `annotation_root` names one category;
/// loose files at the top level are ignored. The set is computed once per
/// run and never mutated afterwards.
pub fn discover_categories(annotation_root: &Path) -> Result<HashSet<String>, OrganizeError> {
    if !annotation_root.is_dir() {
        return Err(OrganizeError::MissingRoot(annotation_root.to_path_buf()));
    }

    let mut categories = HashSet::new();
    for entry in fs::read_dir(annotation_root)? {
        let entry = entry?;
        if entry.path().is_dir() {
            categories.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }

    info!(
        "Discovered {} defect categories in {:?}",
        categories.len(),
        annotation_root
    );
    Ok(categories)
}
