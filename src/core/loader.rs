// Loads every result file of one seam

use crate::core::batch::{Batch, LoadState};
use crate::core::config::LoaderConfig;
use crate::core::format::ResultRecord;
use crate::core::layout::{list_result_files, seam_dir};
use crate::core::serializer::ResultsSerializer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info};

/// Decodes all `*.result` files of a seam in parallel.
///
/// Loading starts as soon as seam, seam series and product instance are all
/// set and the seam directory exists, and again whenever one of them changes
/// while no load is running. A change that points at a missing seam drops the
/// previous results and leaves the loader `Idle`. Changes made during a load do not restart it;
/// call [`ResultsLoader::update`] once it is done.
///
/// [`ResultsLoader::take_results`] is only meaningful after the completion
/// signal ([`ResultsLoader::results_loaded`] or [`ResultsLoader::subscribe`]).
pub struct ResultsLoader {
    runtime: Handle,
    config: LoaderConfig,
    seam: Option<u32>,
    seam_series: Option<u32>,
    product_instance: Option<PathBuf>,
    batch: Arc<Batch<Vec<ResultRecord>>>,
}

impl ResultsLoader {
    pub fn new(runtime: Handle, config: LoaderConfig) -> Self {
        Self {
            runtime,
            config,
            seam: None,
            seam_series: None,
            product_instance: None,
            batch: Batch::new(),
        }
    }

    pub fn seam(&self) -> Option<u32> {
        self.seam
    }

    pub fn set_seam(&mut self, seam: u32) {
        if self.seam == Some(seam) {
            return;
        }
        self.seam = Some(seam);
        self.update();
    }

    pub fn seam_series(&self) -> Option<u32> {
        self.seam_series
    }

    pub fn set_seam_series(&mut self, seam_series: u32) {
        if self.seam_series == Some(seam_series) {
            return;
        }
        self.seam_series = Some(seam_series);
        self.update();
    }

    pub fn product_instance(&self) -> Option<&Path> {
        self.product_instance.as_deref()
    }

    pub fn set_product_instance<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        if self.product_instance.as_ref() == Some(&path) {
            return;
        }
        self.product_instance = Some(path);
        self.update();
    }

    pub fn state(&self) -> LoadState {
        self.batch.state()
    }

    pub fn is_loading(&self) -> bool {
        self.batch.is_loading()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.batch.subscribe()
    }

    /// Resolves once the loader is `Ready`; immediately if it already is.
    pub async fn results_loaded(&self) {
        self.batch.wait_ready().await
    }

    /// One entry per result file, ordered by result type. Leaves the loader
    /// empty.
    pub fn take_results(&self) -> Vec<Vec<ResultRecord>> {
        self.batch.take()
    }

    pub fn update(&self) {
        if self.is_loading() {
            return;
        }
        let (Some(seam), Some(series), Some(root)) =
            (self.seam, self.seam_series, self.product_instance.as_deref())
        else {
            self.batch.reset();
            return;
        };

        let dir = seam_dir(root, series, seam);
        if !dir.is_dir() {
            debug!("Seam directory {} does not exist", dir.display());
            self.batch.reset();
            return;
        }

        let files = list_result_files(&dir, &self.config.result_extension);
        info!("Loading {} result files from {}", files.len(), dir.display());

        let jobs: Vec<_> = files.into_iter().map(|path| move || decode_file(&path)).collect();
        self.batch.start(&self.runtime, self.config.parallelism(), jobs, |done| {
            done.sort_by_key(|(index, results)| (first_result_type(results), *index))
        });
    }
}

pub(crate) fn decode_file(path: &Path) -> Vec<ResultRecord> {
    let (Some(dir), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str())) else {
        return Vec::new();
    };
    ResultsSerializer::at(dir, name).deserialize()
}

/// Sort key of a file's records; files without records go last.
pub(crate) fn first_result_type(results: &[ResultRecord]) -> i32 {
    results.first().map_or(i32::MAX, |r| r.result_type)
}
