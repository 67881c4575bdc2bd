use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::seed::DatasetSource;

/// Startup seeding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    /// Run the seed loader before serving.
    /// TOML: `seed.enabled`. Default: `true`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// JSON file with the reference dataset (`{"breed": ["sub", ...]}`).
    /// TOML: `seed.dataset_path`. Default: unset (use the dataset bundled into the binary).
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dataset_path: None,
        }
    }
}

impl SeedConfig {
    pub fn source(&self) -> DatasetSource {
        match &self.dataset_path {
            Some(path) => DatasetSource::File(path.clone()),
            None => DatasetSource::Bundled,
        }
    }
}

fn default_enabled() -> bool {
    true
}
