use crate::demo::{
    run_demo, run_rank, run_results_import, run_score, DemoArgs, RankArgs, ResultsImportArgs,
    ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pronos::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pronos",
    about = "Score match predictions and rank contest participants",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the leaderboard of a stored tournament
    Rank(RankArgs),
    /// Score a single prediction against a match, both given as JSON
    Score(ScoreArgs),
    /// Manage match results
    Results {
        #[command(subcommand)]
        command: ResultsCommand,
    },
    /// Run an in-memory contest from fixtures to final leaderboard
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ResultsCommand {
    /// Record results from a CSV export and score the affected predictions
    Import(ResultsImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Score(args) => run_score(args),
        Command::Results {
            command: ResultsCommand::Import(args),
        } => run_results_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
