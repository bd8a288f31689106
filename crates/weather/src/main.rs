use std::io;

use anyhow::Result;
use clap::Parser;

use campus_shared::telemetry;
use campus_weather::{report, Cli, ForecastClient, CITIES};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing("warn");
    let cli = Cli::parse();

    let client = ForecastClient::new(cli.base_url.clone(), cli.forecast_days);
    let mut stdout = io::stdout();
    report::run(&client, &CITIES, cli.chart_size(), &mut stdout).await?;

    Ok(())
}
