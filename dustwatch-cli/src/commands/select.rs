use anyhow::Result;
use clap::Args;
use dustwatch_common::engine::AnalysisEngine;
use dustwatch_common::error::DustwatchError;
use dustwatch_common::selection::SpendStrategy;
use dustwatch_common::wallet_client::enrich_token_metadata;

use super::{load, render, SnapshotArgs};

#[derive(Clone, Debug, Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub input: SnapshotArgs,
    /// Spending strategy: efficient, privacy or security.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: String,
}

pub fn run(args: SelectArgs, verbose: bool) -> Result<()> {
    // Rejected before the snapshot is even read
    let strategy: SpendStrategy = args.strategy.parse().map_err(DustwatchError::from)?;

    let loaded = load(&args.input, verbose)?;
    let engine = AnalysisEngine::new(loaded.config);

    let mut raw = loaded.snapshot.utxos.clone();
    for warning in enrich_token_metadata(&mut raw, &loaded.snapshot) {
        eprintln!("warning: {warning}");
    }
    let utxos = engine.classify_all(&raw);
    let selection = engine.select_for_strategy(&utxos, strategy);

    render::print_selection(&selection);
    Ok(())
}
