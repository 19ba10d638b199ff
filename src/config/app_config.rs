use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::migration::SourceRoots;

/// Source and destination layout for one organization run.
///
/// The source side follows the PCB_DATASET convention: `Annotations/`,
/// `images/` and `rotation/` each hold one subdirectory per defect
/// category, and `PCB_USED/` is a flat directory of known-good boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root of the unorganized source dataset.
    pub base_dir: PathBuf,
    /// Root of the materialized train/test tree.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("pcb_data/PCB_DATASET"),
            output_dir: PathBuf::from("organized_pcb_data"),
        }
    }
}

impl AppConfig {
    pub fn annotations_dir(&self) -> PathBuf {
        self.base_dir.join("Annotations")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.base_dir.join("images")
    }

    pub fn rotation_dir(&self) -> PathBuf {
        self.base_dir.join("rotation")
    }

    pub fn correct_dir(&self) -> PathBuf {
        self.base_dir.join("PCB_USED")
    }

    /// The four source roots the migration engine consumes.
    pub fn source_roots(&self) -> SourceRoots {
        SourceRoots {
            annotations: self.annotations_dir(),
            images: self.images_dir(),
            rotation: self.rotation_dir(),
            correct: self.correct_dir(),
        }
    }

    /// Per-user config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "organize-pcb-dataset")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load from `explicit` if given, else from the per-user location.
    /// A missing or corrupt file falls back to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Self {
        let config_path = match explicit.map(Path::to_path_buf).or_else(Self::default_config_path) {
            Some(path) => path,
            None => {
                warn!("Could not determine config location. Using defaults.");
                return Self::default();
            }
        };

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", config_path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read config file: {}. Using defaults.", e);
                }
                Self::default()
            }
        }
    }
}
