use crate::admin::{self, ApplicationsCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use freesite_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Free Website Intake",
    about = "Serve and inspect business applications for the free website promotion",
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
    /// Inspect stored applications without going through HTTP
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
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
        Command::Applications { command } => admin::run(command).await,
    }
}
