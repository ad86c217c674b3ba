// Writes one result type's records of a finished seam

use crate::core::error::Result;
use crate::core::format::ResultRecord;
use crate::core::layout::result_file_name;
use crate::core::serializer::ResultsSerializer;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

pub struct ResultsWriterCommand {
    directory: PathBuf,
    result_type: i32,
    results: Vec<ResultRecord>,
}

impl ResultsWriterCommand {
    pub fn new<I>(directory: impl Into<PathBuf>, result_type: i32, results: I) -> Self
    where
        I: IntoIterator<Item = ResultRecord>,
    {
        Self {
            directory: directory.into(),
            result_type,
            results: results.into_iter().collect(),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.directory.join(result_file_name(self.result_type))
    }

    pub fn try_execute(&self) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        ResultsSerializer::at(&self.directory, &result_file_name(self.result_type))
            .try_serialize(&self.results)
    }

    pub fn execute(&self) -> bool {
        match self.try_execute() {
            Ok(()) => {
                info!(
                    "Stored {} results of type {} in {}",
                    self.results.len(),
                    self.result_type,
                    self.file_path().display()
                );
                true
            }
            Err(e) => {
                error!("Storing results of type {} failed: {}", self.result_type, e);
                false
            }
        }
    }
}
