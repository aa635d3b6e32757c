use anyhow::{Context, Result};
use clap::Parser;
use listset::{
    CoarseLock, ConcurrentOrderedSet, FineGrainedLock, PolicyKind, ReaderWriterLock, RunReport,
    SyncPolicy, WorkloadConfig, WorkloadDriver,
};
use std::path::PathBuf;

#[cfg(feature = "alloc-mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(feature = "alloc-snmalloc")]
#[global_allocator]
static GLOBAL: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[cfg(feature = "alloc-jemalloc")]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Parser)]
#[command(name = "list_bench")]
#[command(about = "Concurrent sorted-list workload under coarse, fine-grained and read/write locking", long_about = None)]
struct Cli {
    /// Concurrency policy guarding the list
    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// Number of worker threads
    #[arg(short, long)]
    threads: Option<usize>,

    /// Keys inserted by the main thread before timing starts
    #[arg(long)]
    preload: Option<usize>,

    /// Total operations, split evenly across threads
    #[arg(long)]
    ops: Option<usize>,

    /// Fraction of operations that are lookups (0..=1)
    #[arg(long)]
    search: Option<f64>,

    /// Fraction of operations that are inserts (0..=1)
    #[arg(long)]
    insert: Option<f64>,

    /// JSON file with a workload configuration; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print the list before and after the workers run
    #[arg(long, default_value_t = false)]
    show_keys: bool,

    /// Log run phases (needs the `tracing` feature)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn workload(&self) -> Result<WorkloadConfig> {
        let mut config = match &self.config {
            Some(path) => WorkloadConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => WorkloadConfig::default(),
        };

        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(threads) = self.threads {
            config.thread_count = threads;
        }
        if let Some(preload) = self.preload {
            config.initial_insert_count = preload;
        }
        if let Some(ops) = self.ops {
            config.total_ops = ops;
        }
        if let Some(search) = self.search {
            config.search_percent = search;
        }
        if let Some(insert) = self.insert {
            config.insert_percent = insert;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.workload()?;
    let driver = WorkloadDriver::new(config).context("invalid workload configuration")?;

    let report = match driver.config().policy {
        PolicyKind::Coarse => run::<CoarseLock>(&driver, cli.show_keys)?,
        PolicyKind::FineGrained => run::<FineGrainedLock>(&driver, cli.show_keys)?,
        PolicyKind::RwLock => run::<ReaderWriterLock>(&driver, cli.show_keys)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run<P: SyncPolicy>(driver: &WorkloadDriver, show_keys: bool) -> Result<RunReport> {
    let mut set = ConcurrentOrderedSet::<P>::new();

    let preloaded = driver.preload(&set).context("preloading keys")?;
    if show_keys {
        eprintln!("Before starting threads, {}", set.keys_view());
    }

    let outcome = driver.execute(&set).context("running workers")?;
    if show_keys {
        eprintln!("After threads terminate, {}", set.keys_view());
    }

    let report = driver.report(P::NAME, preloaded, &outcome, set.len());
    set.clear();
    Ok(report)
}

#[cfg(feature = "tracing")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "listset=debug" } else { "listset=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing(_verbose: bool) {}
