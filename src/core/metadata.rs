// metadata.json files written next to the results

use crate::core::constants::METADATA_FILE;
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeamMetaData {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeamSeriesMetaData {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub number: Option<u32>,
    /// Seams in the order they were inspected.
    #[serde(default)]
    pub processed_seams: Vec<SeamMetaData>,
}

impl SeamSeriesMetaData {
    /// Index of the seam in the inspection order.
    pub fn seam_position(&self, seam_number: u32) -> Option<usize> {
        self.processed_seams
            .iter()
            .position(|s| s.number == Some(seam_number))
    }

    pub fn seam_uuid(&self, seam_number: u32) -> Option<Uuid> {
        self.processed_seams
            .iter()
            .find(|s| s.number == Some(seam_number))
            .and_then(|s| s.uuid)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(dir: &Path) -> Result<T> {
    let data = fs::read_to_string(dir.join(METADATA_FILE))?;
    Ok(serde_json::from_str(&data)?)
}

fn load<T: for<'de> Deserialize<'de>>(dir: &Path) -> Option<T> {
    match read_json(dir) {
        Ok(meta) => Some(meta),
        Err(e) => {
            debug!("No usable metadata in {}: {}", dir.display(), e);
            None
        }
    }
}

pub fn load_seam(seam_dir: &Path) -> Option<SeamMetaData> {
    load(seam_dir)
}

pub fn load_seam_series(series_dir: &Path) -> Option<SeamSeriesMetaData> {
    load(series_dir)
}

pub fn write_metadata<T: Serialize>(dir: &Path, meta: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(meta)?;
    fs::write(dir.join(METADATA_FILE), data)?;
    Ok(())
}
