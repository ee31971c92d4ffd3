use crate::report::{run_fleet_rank, FleetRankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_upkeep::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Upkeep",
    about = "Rank rental vehicles by maintenance urgency over HTTP or from the command line",
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
    /// Inspect fleet maintenance urgency
    Fleet {
        #[command(subcommand)]
        command: FleetCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FleetCommand {
    /// Rank vehicles from a CSV export by one maintenance fact
    Rank(FleetRankArgs),
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
        Command::Fleet {
            command: FleetCommand::Rank(args),
        } => run_fleet_rank(args),
    }
}
