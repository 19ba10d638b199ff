//! Migration of source images into the canonical train/test tree.
//!
//! One forward pass over three source kinds, in order: original defect
//! images, rotated/augmented images, then the reference set of known-good
//! boards. Every file is visited exactly once; there is no cross-file
//! ordering dependency, so enumeration order within a directory carries no
//! meaning beyond log ordering.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::layout::{OutputLayout, CORRECT_CATEGORY};
use super::operations::move_file;
use super::split::assign;

/// Where a source file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Original,
    Rotated,
    Reference,
}

impl SourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            SourceKind::Original => "original",
            SourceKind::Rotated => "rotated",
            SourceKind::Reference => "reference",
        }
    }
}

/// One file queued for relocation. Consumed exactly once; after a
/// successful move the source path no longer exists.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub kind: SourceKind,
    /// Destination category; `None` routes to the `correct` pseudo-category.
    pub category: Option<String>,
    pub file_name: String,
    pub source_path: PathBuf,
}

impl SourceFile {
    fn destination_category(&self) -> &str {
        self.category.as_deref().unwrap_or(CORRECT_CATEGORY)
    }
}

/// The per-category source roots consumed by one run.
#[derive(Debug, Clone)]
pub struct SourceRoots {
    /// One subdirectory per category; enumerated for category discovery.
    pub annotations: PathBuf,
    /// One subdirectory per category of original captures.
    pub images: PathBuf,
    /// One subdirectory per category of rotated derivatives (optional).
    pub rotation: PathBuf,
    /// Flat directory of non-defective reference boards (optional).
    pub correct: PathBuf,
}

/// Counters for one migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub moved: usize,
    /// Files that vanished between enumeration and processing.
    pub skipped_missing: usize,
    /// Files whose destination slot was already occupied.
    pub skipped_collision: usize,
    /// Files the filesystem refused to move.
    pub failed: usize,
}

impl MigrationReport {
    fn merge(&mut self, other: MigrationReport) {
        self.moved += other.moved;
        self.skipped_missing += other.skipped_missing;
        self.skipped_collision += other.skipped_collision;
        self.failed += other.failed;
    }
}

/// Run the full migration: originals, then rotated images, then the
/// reference set. The output tree must already be built.
pub fn run(roots: &SourceRoots, layout: &OutputLayout, categories: &HashSet<String>) -> MigrationReport {
    let mut report = MigrationReport::default();

    for category in categories {
        let annotation_path = roots.annotations.join(category);
        let image_path = roots.images.join(category);

        // Original images need the category present on both sides; an
        // unpaired category is not an error, it just contributes nothing.
        if annotation_path.exists() && image_path.exists() {
            let files = enumerate_files(&image_path, SourceKind::Original, Some(category));
            report.merge(migrate_batch(&files, layout));
        }
    }

    for category in categories {
        let rotation_path = roots.rotation.join(category);
        if rotation_path.exists() {
            let files = enumerate_files(&rotation_path, SourceKind::Rotated, Some(category));
            report.merge(migrate_batch(&files, layout));
        }
    }

    if roots.correct.exists() {
        let files = enumerate_files(&roots.correct, SourceKind::Reference, None);
        report.merge(migrate_batch(&files, layout));
    }

    report
}

/// Enumerate the regular files of one source directory in natural
/// directory order. Subdirectories and unreadable entries are skipped.
fn enumerate_files(dir: &Path, kind: SourceKind, category: Option<&str>) -> Vec<SourceFile> {
    let mut files = Vec::new();

    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
                if !is_file {
                    continue;
                }
                files.push(SourceFile {
                    kind,
                    category: category.map(str::to_string),
                    file_name: entry.file_name().to_string_lossy().into_owned(),
                    source_path: entry.path(),
                });
            }
            info!("Found {} {} images in {:?}", files.len(), kind.as_str(), dir);
        }
        Err(e) => {
            warn!("Failed to read directory {:?}: {}", dir, e);
        }
    }

    files
}

/// Move one batch of files into their assigned slots.
///
/// Every failure is contained to its own file: a vanished source or an
/// occupied destination is logged and counted, and the loop continues.
fn migrate_batch(files: &[SourceFile], layout: &OutputLayout) -> MigrationReport {
    let mut report = MigrationReport::default();

    for file in files {
        // The file may have been taken by an earlier interrupted run or an
        // external process since enumeration.
        if !file.source_path.exists() {
            warn!(
                "Missing {} image {} in {:?}. Skipping...",
                file.kind.as_str(),
                file.file_name,
                file.source_path.parent().unwrap_or(Path::new("")),
            );
            report.skipped_missing += 1;
            continue;
        }

        let split = assign(&file.file_name);
        let dest = layout.slot(split, file.destination_category(), &file.file_name);

        if dest.exists() {
            warn!(
                "Destination {:?} already occupied, leaving {:?} in place",
                dest, file.source_path
            );
            report.skipped_collision += 1;
            continue;
        }

        match move_file(&file.source_path, &dest) {
            Ok(()) => report.moved += 1,
            Err(e) => {
                error!("Failed to migrate {:?}: {}", file.source_path, e);
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        roots: SourceRoots,
        layout: OutputLayout,
        categories: HashSet<String>,
    }

    /// Source tree in the conventional shape: annotation and image
    /// subdirectories per category, optional rotation and reference roots.
    fn fixture(categories: &[&str]) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().to_path_buf();
        let roots = SourceRoots {
            annotations: base.join("Annotations"),
            images: base.join("images"),
            rotation: base.join("rotation"),
            correct: base.join("PCB_USED"),
        };
        for category in categories {
            fs::create_dir_all(roots.annotations.join(category)).unwrap();
        }
        let layout = OutputLayout::new(base.join("organized"));
        let set: HashSet<String> = categories.iter().map(|c| c.to_string()).collect();
        layout.build(&set).unwrap();
        Fixture {
            _tmp: tmp,
            roots,
            layout,
            categories: set,
        }
    }

    fn seed_files(dir: &Path, prefix: &str, count: usize) {
        fs::create_dir_all(dir).unwrap();
        for i in 0..count {
            fs::write(dir.join(format!("{}_{:02}.jpg", prefix, i)), b"img").unwrap();
        }
    }

    fn count_files(dir: &Path) -> usize {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .flatten()
                .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                .count(),
            Err(_) => 0,
        }
    }

    fn split_total(layout: &OutputLayout, category: &str) -> usize {
        count_files(&layout.output_root().join("train").join(category))
            + count_files(&layout.output_root().join("test").join(category))
    }

    #[test]
    fn test_two_category_scenario_moves_everything() {
        let fx = fixture(&["Missing_hole", "Spur"]);
        seed_files(&fx.roots.images.join("Missing_hole"), "01_missing_hole", 10);
        seed_files(&fx.roots.rotation.join("Missing_hole"), "r090_missing_hole", 5);
        seed_files(&fx.roots.images.join("Spur"), "04_spur", 8);
        seed_files(&fx.roots.correct, "board", 4);

        let report = run(&fx.roots, &fx.layout, &fx.categories);

        assert_eq!(report.moved, 27);
        assert_eq!(report.skipped_missing, 0);
        assert_eq!(report.skipped_collision, 0);
        assert_eq!(report.failed, 0);

        assert_eq!(split_total(&fx.layout, "Missing_hole"), 15);
        assert_eq!(split_total(&fx.layout, "Spur"), 8);
        assert_eq!(split_total(&fx.layout, CORRECT_CATEGORY), 4);

        // Moved, not copied: the source trees are drained.
        assert_eq!(count_files(&fx.roots.images.join("Missing_hole")), 0);
        assert_eq!(count_files(&fx.roots.rotation.join("Missing_hole")), 0);
        assert_eq!(count_files(&fx.roots.images.join("Spur")), 0);
        assert_eq!(count_files(&fx.roots.correct), 0);
    }

    #[test]
    fn test_category_without_image_dir_is_skipped() {
        let fx = fixture(&["Missing_hole"]);
        // Annotation subdirectory exists, image subdirectory does not.
        let report = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(report, MigrationReport::default());
    }

    #[test]
    fn test_image_dir_without_annotation_dir_is_skipped() {
        let fx = fixture(&["Missing_hole"]);
        fs::remove_dir(fx.roots.annotations.join("Missing_hole")).unwrap();
        seed_files(&fx.roots.images.join("Missing_hole"), "01_missing_hole", 3);

        let report = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(report.moved, 0);
        assert_eq!(count_files(&fx.roots.images.join("Missing_hole")), 3);
    }

    #[test]
    fn test_absent_rotation_and_reference_roots_are_fine() {
        let fx = fixture(&["Spur"]);
        seed_files(&fx.roots.images.join("Spur"), "04_spur", 2);
        // Neither rotation/ nor PCB_USED/ exists at all.
        let report = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(report.moved, 2);
    }

    #[test]
    fn test_vanished_file_warns_and_continues() {
        let fx = fixture(&["Spur"]);
        let image_dir = fx.roots.images.join("Spur");
        seed_files(&image_dir, "04_spur", 3);

        let files = enumerate_files(&image_dir, SourceKind::Original, Some("Spur"));
        assert_eq!(files.len(), 3);
        fs::remove_file(&files[1].source_path).unwrap();

        let report = migrate_batch(&files, &fx.layout);
        assert_eq!(report.moved, 2);
        assert_eq!(report.skipped_missing, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(split_total(&fx.layout, "Spur"), 2);
    }

    #[test]
    fn test_occupied_destination_leaves_source_in_place() {
        let fx = fixture(&["Spur"]);
        let image_dir = fx.roots.images.join("Spur");
        seed_files(&image_dir, "04_spur", 1);

        // Occupy the slot in both splits so the collision fires whichever
        // split the name is assigned to.
        for split in ["train", "test"] {
            fs::write(
                fx.layout.output_root().join(split).join("Spur").join("04_spur_00.jpg"),
                b"occupant",
            )
            .unwrap();
        }

        let report = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(report.moved, 0);
        assert_eq!(report.skipped_collision, 1);
        assert!(image_dir.join("04_spur_00.jpg").exists());
    }

    #[test]
    fn test_rerun_after_completion_is_harmless() {
        let fx = fixture(&["Spur"]);
        seed_files(&fx.roots.images.join("Spur"), "04_spur", 4);

        let first = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(first.moved, 4);

        let second = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(second.moved, 0);
        assert_eq!(split_total(&fx.layout, "Spur"), 4);
    }

    #[test]
    fn test_subdirectories_are_not_migrated() {
        let fx = fixture(&["Spur"]);
        let image_dir = fx.roots.images.join("Spur");
        seed_files(&image_dir, "04_spur", 1);
        fs::create_dir(image_dir.join("thumbnails")).unwrap();

        let report = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(report.moved, 1);
        assert!(image_dir.join("thumbnails").is_dir());
    }

    #[test]
    fn test_reference_files_route_to_correct() {
        let fx = fixture(&[]);
        seed_files(&fx.roots.correct, "board", 6);

        let report = run(&fx.roots, &fx.layout, &fx.categories);
        assert_eq!(report.moved, 6);
        assert_eq!(split_total(&fx.layout, CORRECT_CATEGORY), 6);
    }
}
