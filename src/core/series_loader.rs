// Loads the result files of every seam in a seam series

use crate::core::batch::{Batch, LoadState};
use crate::core::config::LoaderConfig;
use crate::core::format::SeamResultSet;
use crate::core::layout::{list_result_files, list_seam_dirs, seam_series_dir};
use crate::core::loader::{decode_file, first_result_type};
use crate::core::metadata::{load_seam, load_seam_series};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

/// Decodes all result files below `seam_seriesNNNN/seam*/`, one task per
/// file, and pairs each file's records with its seam.
///
/// Results are ordered by the inspection order recorded in the series
/// `metadata.json`, then by seam number, then by result type.
pub struct SeriesLoader {
    runtime: Handle,
    config: LoaderConfig,
    seam_series: Option<u32>,
    product_instance: Option<PathBuf>,
    batch: Arc<Batch<SeamResultSet>>,
}

impl SeriesLoader {
    pub fn new(runtime: Handle, config: LoaderConfig) -> Self {
        Self {
            runtime,
            config,
            seam_series: None,
            product_instance: None,
            batch: Batch::new(),
        }
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

    pub async fn results_loaded(&self) {
        self.batch.wait_ready().await
    }

    pub fn take_results(&self) -> Vec<SeamResultSet> {
        self.batch.take()
    }

    pub fn update(&self) {
        if self.is_loading() {
            return;
        }
        let (Some(series), Some(root)) = (self.seam_series, self.product_instance.as_deref()) else {
            self.batch.reset();
            return;
        };

        let series_dir = seam_series_dir(root, series);
        if !series_dir.is_dir() {
            debug!("Seam series directory {} does not exist", series_dir.display());
            self.batch.reset();
            return;
        }

        let series_meta = load_seam_series(&series_dir).unwrap_or_default();

        let mut jobs = Vec::new();
        let mut positions = Vec::new();
        for (seam_number, seam_path) in list_seam_dirs(&series_dir) {
            let seam_uuid = load_seam(&seam_path)
                .and_then(|meta| meta.uuid)
                .or_else(|| series_meta.seam_uuid(seam_number))
                .unwrap_or_else(Uuid::nil);
            let position = series_meta.seam_position(seam_number).unwrap_or(usize::MAX);

            for file in list_result_files(&seam_path, &self.config.result_extension) {
                positions.push(position);
                jobs.push(move || SeamResultSet {
                    seam_number,
                    seam_uuid,
                    results: decode_file(&file),
                });
            }
        }

        info!(
            "Loading {} result files of seam series {} from {}",
            jobs.len(),
            series,
            series_dir.display()
        );

        self.batch.start(&self.runtime, self.config.parallelism(), jobs, move |done| {
            done.sort_by_key(|(index, set)| {
                (
                    positions[*index],
                    set.seam_number,
                    first_result_type(&set.results),
                    *index,
                )
            })
        });
    }
}
