use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tracing::{info, warn, Level};

use weld_results::core::layout::list_seam_series_dirs;
use weld_results::{
    LoadState, LoaderConfig, ResultRecord, ResultsLoader, ResultsSerializer, SeriesLoader,
};

#[derive(Parser)]
#[command(name = "weld-results", version, about = "Inspect stored weld seam results")]
struct Cli {
    /// Loader configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize all seam series of a product instance
    Summary {
        /// Product instance directory
        product_instance: PathBuf,
    },
    /// List the results of one seam
    Seam {
        /// Product instance directory
        product_instance: PathBuf,
        #[arg(long)]
        series: u32,
        #[arg(long)]
        seam: u32,
    },
    /// Decode a single result file and print it as JSON
    Dump {
        file: PathBuf,
    },
}

#[derive(Default)]
struct Tally {
    files: usize,
    records: usize,
    samples: usize,
    nio: usize,
}

impl Tally {
    fn add(&mut self, results: &[ResultRecord]) {
        self.files += 1;
        self.records += results.len();
        self.samples += results.iter().map(ResultRecord::len).sum::<usize>();
        self.nio += results.iter().filter(|r| r.is_nio).count();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => LoaderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LoaderConfig::default(),
    };

    match cli.command {
        Commands::Summary { product_instance } => summary(&product_instance, config).await,
        Commands::Seam {
            product_instance,
            series,
            seam,
        } => seam_results(&product_instance, series, seam, config).await,
        Commands::Dump { file } => dump(&file),
    }
}

fn modified(path: &Path) -> Result<String> {
    let time: DateTime<Local> = fs::metadata(path)?.modified()?.into();
    Ok(time.format("%Y-%m-%d %H:%M:%S").to_string())
}

async fn summary(root: &Path, config: LoaderConfig) -> Result<()> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    println!("{} (modified {})", root.display(), modified(root)?);

    let series_dirs = list_seam_series_dirs(root);
    info!("Found {} seam series", series_dirs.len());

    let mut loader = SeriesLoader::new(Handle::current(), config);
    loader.set_product_instance(root);

    for (series, path) in series_dirs {
        loader.set_seam_series(series);
        if loader.state() == LoadState::Idle {
            warn!("Seam series {} disappeared, skipping", path.display());
            continue;
        }
        loader.results_loaded().await;

        // seams keep the loader's order
        let mut seams: Vec<(u32, uuid::Uuid)> = Vec::new();
        let mut tallies: BTreeMap<u32, Tally> = BTreeMap::new();
        for set in loader.take_results() {
            if !tallies.contains_key(&set.seam_number) {
                seams.push((set.seam_number, set.seam_uuid));
            }
            tallies.entry(set.seam_number).or_default().add(&set.results);
        }

        println!("seam series {:04}", series);
        for (seam, uuid) in seams {
            let tally = &tallies[&seam];
            println!(
                "  seam {:04} {}  files={} records={} samples={} nio={}",
                seam, uuid, tally.files, tally.records, tally.samples, tally.nio
            );
        }
    }
    Ok(())
}

async fn seam_results(root: &Path, series: u32, seam: u32, config: LoaderConfig) -> Result<()> {
    let mut loader = ResultsLoader::new(Handle::current(), config);
    loader.set_seam_series(series);
    loader.set_seam(seam);
    loader.set_product_instance(root);
    if loader.state() == LoadState::Idle {
        bail!("no seam {:04} in seam series {:04} below {}", seam, series, root.display());
    }
    loader.results_loaded().await;

    for results in loader.take_results() {
        let Some(first) = results.first() else {
            println!("(unreadable or empty result file)");
            continue;
        };
        let mut tally = Tally::default();
        tally.add(&results);
        println!(
            "result type {:>5}  records={} samples={} nio={}",
            first.result_type, tally.records, tally.samples, tally.nio
        );
    }
    Ok(())
}

fn dump(file: &Path) -> Result<()> {
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid file name {}", file.display()))?;

    let records = ResultsSerializer::at(dir, name)
        .try_deserialize()
        .with_context(|| format!("decoding {}", file.display()))?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
