use crate::demo::{run_demo, run_weights, DemoArgs, WeightsArgs};
use clap::{Parser, Subcommand};
use sales_incentive::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "sales-incentive",
    about = "Score field sales representatives against their quarterly KPIs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score the bundled sample cohort and print the report (default command)
    Demo(DemoArgs),
    /// Print the effective KPI and product group weights
    Weights(WeightsArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Demo(args) => run_demo(args).await,
        Command::Weights(args) => run_weights(args),
    }
}
