// Reading and writing one compressed result file

use crate::core::collection::{deserialize_records, serialize_records, try_deserialize_records};
use crate::core::compression::{compress, decompress};
use crate::core::error::{ResultsError, Result};
use crate::core::format::ResultRecord;
use flate2::Compression;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Serializes result records into `{directory}/{file_name}`.
///
/// Writing never replaces an existing file. Reading never fails loudly: a
/// missing, unreadable, foreign or corrupted file reads as no records, so
/// callers cannot tell "nothing stored" from "stored but unreadable". The
/// `try_` variants expose the reason.
#[derive(Debug, Clone)]
pub struct ResultsSerializer {
    directory: Option<PathBuf>,
    file_name: Option<String>,
    compression: Compression,
}

impl Default for ResultsSerializer {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: None,
            compression: Compression::none(),
        }
    }
}

impl ResultsSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at<P: AsRef<Path>>(directory: P, file_name: &str) -> Self {
        Self {
            directory: Some(directory.as_ref().to_path_buf()),
            file_name: Some(file_name.to_string()),
            ..Self::default()
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn set_directory<P: AsRef<Path>>(&mut self, directory: P) {
        self.directory = Some(directory.as_ref().to_path_buf());
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, file_name: &str) {
        self.file_name = Some(file_name.to_string());
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    pub fn path(&self) -> Option<PathBuf> {
        match (&self.directory, &self.file_name) {
            (Some(dir), Some(name)) => Some(dir.join(name)),
            _ => None,
        }
    }

    pub fn try_serialize(&self, records: &[ResultRecord]) -> Result<()> {
        let (Some(directory), Some(path)) = (self.directory.as_ref(), self.path()) else {
            return Err(ResultsError::MissingLocation);
        };
        if path.exists() {
            return Err(ResultsError::FileExists(path));
        }

        let buffer = serialize_records(records)?;
        let blob = compress(&buffer, self.compression)?;

        // stage next to the target, then link into place without replacing
        let mut staged = NamedTempFile::new_in(directory)?;
        staged.write_all(&blob)?;
        staged.as_file().sync_all()?;
        staged.persist_noclobber(&path).map_err(|e| {
            if e.error.kind() == ErrorKind::AlreadyExists {
                ResultsError::FileExists(path.clone())
            } else {
                ResultsError::Io(e.error)
            }
        })?;

        debug!("Wrote {} results to {}", records.len(), path.display());
        Ok(())
    }

    /// Returns `false` if the file already exists or cannot be written.
    pub fn serialize(&self, records: &[ResultRecord]) -> bool {
        match self.try_serialize(records) {
            Ok(()) => true,
            Err(e) => {
                warn!("Serializing results failed: {}", e);
                false
            }
        }
    }

    pub fn try_read_buffer(&self) -> Result<Vec<u8>> {
        let path = self.path().ok_or(ResultsError::MissingLocation)?;
        let blob = fs::read(&path)?;
        decompress(&blob)
    }

    /// Decompressed file content, or an empty buffer if there is none.
    pub fn read_buffer(&self) -> Vec<u8> {
        match self.try_read_buffer() {
            Ok(buffer) => buffer,
            Err(ResultsError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No result file at {:?}", self.path());
                Vec::new()
            }
            Err(e) => {
                warn!("Reading {:?} failed: {}", self.path(), e);
                Vec::new()
            }
        }
    }

    pub fn try_deserialize(&self) -> Result<Vec<ResultRecord>> {
        try_deserialize_records(&self.try_read_buffer()?)
    }

    pub fn deserialize(&self) -> Vec<ResultRecord> {
        deserialize_records(&self.read_buffer())
    }
}
