mod cli;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pagesync::prelude::*;
use pagesync::store::debug::DebugStore;
use pagesync::store::sqlite::SqliteStore;
use tracing::{error, info};

use crate::cli::Args;
use crate::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_telemetry(&args.log_level)?;

    let result = run(args).await;
    if let Err(ref e) = result {
        error!("sync failed: {:#}", e);
    }
    result
}

async fn run(args: Args) -> Result<()> {
    info!(
        "starting pagesync from {} to {}",
        args.content_dir.display(),
        args.table
    );
    let started = std::time::Instant::now();

    let store: Arc<dyn RecordStore> = if args.dry_run {
        Arc::new(DebugStore::new(args.table.clone()))
    } else {
        let store = SqliteStore::open(&args.database, args.table.clone())
            .with_context(|| format!("opening {}", args.database.display()))?;
        Arc::new(store)
    };

    let writer = BatchWriter::new(store).with_retry(RetryPolicy::throughput());
    let runtime = Runtime::new(writer).clear_policy(args.clear_policy());

    let mut source = FsSource::new(&args.content_dir);
    let report = runtime.run(&mut source).await?;

    info!(
        pages = report.pages,
        sections = report.sections,
        batches = report.page_batches,
        "finished in {:.2} sec",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
