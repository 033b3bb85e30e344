use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dustwatch_common::engine::AnalysisEngine;
use dustwatch_common::export::SecurityReportDocument;

use super::{load, render, SnapshotArgs};

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: SnapshotArgs,
    /// Wallet address to report on; defaults to the snapshot's address.
    #[arg(long)]
    pub address: Option<String>,
    /// Also write the report as a JSON document.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs, verbose: bool) -> Result<()> {
    let loaded = load(&args.input, verbose)?;
    let engine = AnalysisEngine::new(loaded.config);

    let analysis = engine.analyze_snapshot(&loaded.snapshot, args.address.as_deref())?;
    render::print_report(&analysis.report, analysis.balance.as_ref());

    if let Some(path) = &args.export {
        SecurityReportDocument::from_report(&analysis.report).write_json(path)?;
        println!();
        println!("Report exported to {}", path.display());
    }

    Ok(())
}
