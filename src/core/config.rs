// Loader configuration

use crate::core::constants::RESULT_EXTENSION;
use crate::core::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Upper bound on files decoded at the same time.
    pub max_parallel_decodes: usize,
    /// Extension of result files, without the dot.
    pub result_extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_parallel_decodes: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            result_extension: RESULT_EXTENSION.to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut config: LoaderConfig = serde_json::from_str(&data)?;
        config.max_parallel_decodes = config.max_parallel_decodes.max(1);
        Ok(config)
    }

    pub(crate) fn parallelism(&self) -> usize {
        self.max_parallel_decodes.max(1)
    }
}
