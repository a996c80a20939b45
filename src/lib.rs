mod cli;
mod demo;
mod infra;

use sales_incentive::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
