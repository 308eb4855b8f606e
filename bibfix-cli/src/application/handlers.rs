use std::path::PathBuf;

use tracing::info;

use bibfix_core::batch::processor::GATE_PAUSE;
use bibfix_core::catalog_factory::{Backend, open_catalog};
use bibfix_core::config::Config;
use bibfix_core::error::{FixError, Result};
use bibfix_core::reader::{open_record_file, write_record_file};
use bibfix_core::{
    BackupStore, BatchOptions, BatchProcessor, BatchSummary, CatalogClient, FixSession, RecordId,
    SystemClock, TimeWindow, ValidationReport,
};

use crate::application::rules;

pub struct Context {
    config: Config,
    backup_path: PathBuf,
}

impl Context {
    pub fn from_env(backup_override: Option<PathBuf>) -> Self {
        let config = Config::from_env();
        let backup_path = backup_override.unwrap_or_else(|| config.backup_path.clone());
        Self {
            config,
            backup_path,
        }
    }

    fn catalog(&self) -> Result<Box<dyn CatalogClient>> {
        open_catalog(Backend::Http, self.config.catalog()?)
    }

    fn store(&self) -> Result<BackupStore> {
        BackupStore::open(&self.backup_path)
    }
}

/// CLI numeric flags strip leading zeros; restore the catalog width before
/// handing the id to the core.
fn pad_id(id: u32) -> String {
    format!("{id:09}")
}

fn parse_window(timeinterval: Option<String>) -> Result<Option<TimeWindow>> {
    timeinterval.map(|s| s.parse()).transpose()
}

fn print_report(report: &ValidationReport) {
    for entry in &report.entries {
        if entry.issues.is_empty() {
            println!("{}: ok", entry.validator);
        } else {
            for issue in &entry.issues {
                println!("{}: {}", entry.validator, issue.message);
            }
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    let processed = summary.fixed.len() + summary.failed.len();
    let percent = if summary.total == 0 {
        100
    } else {
        processed * 100 / summary.total
    };
    println!(
        "batch {}: {}/{} processed ({percent}%), {} fixed, {} failed",
        summary.batch_id,
        processed,
        summary.total,
        summary.fixed.len(),
        summary.failed.len()
    );
    for failure in &summary.failed {
        println!("  failed {}: {}", failure.record_id, failure.message);
    }
    if !summary.unsaved.is_empty() {
        println!(
            "  warning: {} fixed record(s) have no backup entry",
            summary.unsaved.len()
        );
    }
    if !summary.fixed.is_empty() {
        println!("undo with: bibfix undo-batch --batchid {}", summary.batch_id);
    }
}

pub fn handle_show(ctx: &Context, id: u32) -> Result<()> {
    let catalog = ctx.catalog()?;
    let id = RecordId::parse(&pad_id(id))?;
    match catalog.load_record(id)? {
        Some(record) => {
            let pretty = serde_json::to_string_pretty(&record)
                .map_err(|e| FixError::Format(format!("record encode: {e}")))?;
            println!("{pretty}");
        }
        None => println!("record {id} not found"),
    }
    Ok(())
}

pub fn handle_validate(ctx: &Context, id: u32) -> Result<()> {
    let catalog = ctx.catalog()?;
    let pipeline = rules::default_pipeline();
    let session = FixSession::new(catalog.as_ref(), &pipeline);
    match session.validate_record(&pad_id(id))? {
        None => println!("record {} not found", pad_id(id)),
        Some(outcome) => {
            print_report(&outcome.results);
            if let Some(revalidation) = &outcome.revalidation {
                println!("record was corrected; second pass:");
                print_report(revalidation);
            }
        }
    }
    Ok(())
}

pub fn handle_fix(ctx: &Context, id: u32) -> Result<()> {
    let catalog = ctx.catalog()?;
    let pipeline = rules::default_pipeline();
    let session = FixSession::new(catalog.as_ref(), &pipeline);
    let outcome = session.fix(&pad_id(id))?;
    print_report(&outcome.validation.results);
    for message in &outcome.update.messages {
        println!("catalog: {}", message.message);
    }
    // A single fix is backed up as its own one-record batch.
    let mut store = ctx.store()?;
    let batch_id = bibfix_core::generate_batch_id();
    let record_id = outcome.record_id();
    store.save_batch(&[Some(outcome)], &batch_id)?;
    info!(id = %record_id, batch = %batch_id, "fix backed up");
    println!("fixed; undo with: bibfix undo --id {id}");
    Ok(())
}

pub fn handle_local_fix(input: PathBuf, output: PathBuf) -> Result<()> {
    let catalog = NoCatalog;
    let pipeline = rules::default_pipeline();
    let session = FixSession::new(&catalog, &pipeline);

    let mut corrected = Vec::new();
    let mut issues = 0usize;
    for record in open_record_file(&input)? {
        let outcome = session.validate_local(&record?)?;
        issues += outcome.results.issue_count();
        corrected.push(outcome.validated);
    }
    write_record_file(&output, &corrected)?;
    println!(
        "{} record(s) validated, {} issue(s), written to {}",
        corrected.len(),
        issues,
        output.display()
    );
    Ok(())
}

pub fn handle_file_fix(
    ctx: &Context,
    input: PathBuf,
    chunksize: usize,
    timeinterval: Option<String>,
) -> Result<()> {
    let mut ids = Vec::new();
    for record in open_record_file(&input)? {
        ids.push(record?.id);
    }
    run_batch(ctx, &ids, chunksize, timeinterval)
}

pub fn handle_fix_multiple(
    ctx: &Context,
    ids: &[u32],
    chunksize: usize,
    timeinterval: Option<String>,
) -> Result<()> {
    let ids: Vec<RecordId> = ids
        .iter()
        .map(|id| RecordId::parse(&pad_id(*id)))
        .collect::<Result<_>>()?;
    run_batch(ctx, &ids, chunksize, timeinterval)
}

fn run_batch(
    ctx: &Context,
    ids: &[RecordId],
    chunksize: usize,
    timeinterval: Option<String>,
) -> Result<()> {
    info!(total = ids.len(), chunksize, "starting batch fix");
    let catalog = ctx.catalog()?;
    let pipeline = rules::default_pipeline();
    let mut store = ctx.store()?;
    let opts = BatchOptions {
        chunk_size: chunksize,
        window: parse_window(timeinterval)?,
        gate_pause: GATE_PAUSE,
    };
    let session = FixSession::new(catalog.as_ref(), &pipeline);
    let clock = SystemClock;
    let mut processor = BatchProcessor::new(session, &mut store, &clock, opts)?;
    let summary = processor.run(ids)?;
    print_summary(&summary);
    Ok(())
}

pub fn handle_undo(ctx: &Context, id: u32) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut store = ctx.store()?;
    let id = RecordId::parse(&pad_id(id))?;
    if store.revert_single(id, catalog.as_ref())? {
        println!("record {id} reverted to its most recent backup snapshot");
    } else {
        println!("no backup entry for record {id}");
    }
    Ok(())
}

pub fn handle_undo_batch(ctx: &Context, batchid: &str) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut store = ctx.store()?;
    let results = store.revert_batch(batchid, catalog.as_ref())?;
    if results.is_empty() {
        println!("no backup entries for batch {batchid}");
        return Ok(());
    }
    for r in &results {
        match &r.result {
            Ok(_) => println!("reverted {}", r.record_id),
            Err(e) => println!("revert failed for {}: {e}", r.record_id),
        }
    }
    Ok(())
}

pub fn handle_reset(ctx: &Context) -> Result<()> {
    let mut store = ctx.store()?;
    store.wipe()?;
    info!(path = %ctx.backup_path.display(), "backup history wiped");
    println!("backup history deleted");
    Ok(())
}

/// Stand-in catalog for local-only validation; any remote call is a bug.
struct NoCatalog;

impl CatalogClient for NoCatalog {
    fn load_record(&self, id: RecordId) -> Result<Option<bibfix_core::Record>> {
        Err(FixError::Config(format!(
            "local-fix attempted a remote load of {id}"
        )))
    }

    fn update_record(&self, record: &bibfix_core::Record) -> Result<bibfix_core::UpdateResponse> {
        Err(FixError::Config(format!(
            "local-fix attempted a remote update of {}",
            record.id
        )))
    }
}
