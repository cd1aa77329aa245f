use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use vovinam::{Session, TallyResult};

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// CSV file (registration sheet or a rows export)
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct LoadJsonArgs {
    pub file: PathBuf,
}

pub fn run(args: ImportArgs, session: &mut Session) -> TallyResult<()> {
    info!("Importing {}", args.file.display());
    let text = fs::read_to_string(&args.file)?;
    if let Some(report) = session.import_csv(&text, Instant::now()) {
        println!(
            "{} layout: {} added, {} duplicates, {} skipped",
            report.layout, report.added, report.duplicates, report.skipped
        );
    }
    Ok(())
}

pub fn run_load_json(args: LoadJsonArgs, session: &mut Session) -> TallyResult<()> {
    let raw = fs::read_to_string(&args.file)?;
    if session.import_json(&raw, Instant::now()) {
        println!("Loaded {} rows", session.table().len());
    }
    Ok(())
}
