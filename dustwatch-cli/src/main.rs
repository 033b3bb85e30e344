mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dustwatch",
    version,
    about = "Wallet UTXO health reports and token-safe input selection"
)]
struct Cli {
    /// Log engine decisions at debug level (stderr).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score wallet security and health, listing threats and recommendations.
    Analyze(commands::analyze::AnalyzeArgs),
    /// Classify every UTXO and summarize the token portfolio.
    Classify(commands::classify::ClassifyArgs),
    /// List the UTXOs a spending strategy may use.
    Select(commands::select::SelectArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, cli.verbose),
        Commands::Classify(args) => commands::classify::run(args, cli.verbose),
        Commands::Select(args) => commands::select::run(args, cli.verbose),
    };

    if let Err(err) = result {
        eprintln!("error: {}", commands::describe_error(&err));
        std::process::exit(commands::exit_code(&err));
    }
}
