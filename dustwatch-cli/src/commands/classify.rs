use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dustwatch_common::engine::AnalysisEngine;
use dustwatch_common::export::ClassificationReportDocument;

use super::{load, render, SnapshotArgs};

#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: SnapshotArgs,
    /// Also write the classification as a JSON document.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

pub fn run(args: ClassifyArgs, verbose: bool) -> Result<()> {
    let loaded = load(&args.input, verbose)?;
    let engine = AnalysisEngine::new(loaded.config);

    let analysis = engine.analyze_snapshot(&loaded.snapshot, None)?;
    render::print_classification(&analysis.utxos, &analysis.report.token_portfolio);

    for warning in &analysis.enrichment_warnings {
        eprintln!("warning: {warning}");
    }

    if let Some(path) = &args.export {
        ClassificationReportDocument::new(&analysis.utxos, &analysis.report).write_json(path)?;
        println!();
        println!("Classification exported to {}", path.display());
    }

    Ok(())
}
