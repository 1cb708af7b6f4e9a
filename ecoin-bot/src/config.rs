use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

impl CliConfig {
    /// Resolves the effective config from CLI flags, falling back to the
    /// platform data directory.
    pub fn load(data_dir: Option<PathBuf>, verbose: bool) -> Self {
        let data_dir = data_dir.unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ecoin")
        });

        Self { data_dir, verbose }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::load(None, false)
    }
}
