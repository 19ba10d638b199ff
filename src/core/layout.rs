//! Canonical output tree: `{output_root}/{split}/{category}`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::OrganizeError;
use super::split::DatasetSplit;

/// Pseudo-category for non-defective reference boards.
pub const CORRECT_CATEGORY: &str = "correct";

pub const SPLITS: [DatasetSplit; 2] = [DatasetSplit::Train, DatasetSplit::Test];

/// Destination layout for one run. Every slot the migration engine can
/// write to is created by `build` before any file moves.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    output_root: PathBuf,
}

impl OutputLayout {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Create `{split}/correct` and `{split}/{category}` for both splits,
    /// including intermediate parents. Safe to call again on an existing
    /// tree; directory contents are never touched.
    pub fn build(&self, categories: &HashSet<String>) -> Result<(), OrganizeError> {
        for split in SPLITS {
            let split_dir = self.output_root.join(split.as_str());
            let correct = split_dir.join(CORRECT_CATEGORY);
            fs::create_dir_all(&correct).map_err(|e| OrganizeError::CreateDir(correct.clone(), e))?;
            for category in categories {
                let dir = split_dir.join(category);
                fs::create_dir_all(&dir).map_err(|e| OrganizeError::CreateDir(dir.clone(), e))?;
            }
        }
        info!(
            "Prepared output tree at {:?} for {} categories",
            self.output_root,
            categories.len()
        );
        Ok(())
    }

    /// Destination slot for one file.
    pub fn slot(&self, split: DatasetSplit, category: &str, file_name: &str) -> PathBuf {
        self.output_root
            .join(split.as_str())
            .join(category)
            .join(file_name)
    }
}
