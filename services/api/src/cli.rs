use crate::demo::{run_demo, run_propose, run_score, DemoArgs, ProposeArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use risk_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Risk Advisor",
    about = "Score client questionnaires and assemble bond investment proposals",
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
    /// Score a questionnaire and show the matched archetype
    Score(ScoreArgs),
    /// Score a questionnaire and assemble a proposal against a holdings export
    Propose(ProposeArgs),
    /// Walk scripted clients through scoring, matching and proposal assembly
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Propose(args) => run_propose(args),
        Command::Demo(args) => run_demo(args),
    }
}
