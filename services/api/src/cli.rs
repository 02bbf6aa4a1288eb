use crate::demo::{run_batch, run_demo, run_predict, BatchArgs, DemoArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use restaurant_grade::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Restaurant Grade Predictor",
    about = "Predict restaurant health grades and export role-specific reports",
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
    /// Predict a single inspection and optionally export reports
    Predict(PredictArgs),
    /// Score every row of an inspection CSV
    Batch(BatchArgs),
    /// Run the built-in sample inspections and print the results
    Demo(DemoArgs),
}

/// Model artifact override shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ModelArgs {
    /// Path to the model artifact JSON (overrides APP_MODEL_PATH)
    #[arg(long = "model", value_name = "PATH")]
    pub(crate) path: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo(args) => run_demo(args),
    }
}
