use crate::demo::{run_demo, run_operations_report, run_revenue_report, DemoArgs, OperationsReportArgs, RevenueReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use frontdesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hotel Front Desk Service",
    about = "Run and demonstrate the hotel front desk service from the command line",
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
    /// Render reports over the seeded demo dataset
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Run an end-to-end CLI demo covering a full reservation lifecycle
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Operations summary: room board, arrivals, departures, occupancy
    Operations(OperationsReportArgs),
    /// Revenue over a date range, optionally as CSV
    Revenue(RevenueReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store with the demo dataset on startup
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report {
            command: ReportCommand::Operations(args),
        } => run_operations_report(args),
        Command::Report {
            command: ReportCommand::Revenue(args),
        } => run_revenue_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
