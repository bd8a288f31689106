use clap::Parser;

use crate::chart::ChartSize;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Reported in this order.
pub const CITIES: [City; 3] = [
    City {
        name: "Berlin",
        latitude: 52.52,
        longitude: 13.41,
    },
    City {
        name: "Paris",
        latitude: 48.85,
        longitude: 2.35,
    },
    City {
        name: "Rome",
        latitude: 41.90,
        longitude: 12.49,
    },
];

#[derive(Parser, Debug)]
#[command(
    name = "weather",
    version,
    about = "Print 24-hour temperature and humidity charts for Berlin, Paris and Rome"
)]
pub struct Cli {
    /// Forecast endpoint
    #[arg(long, env = "OPEN_METEO_URL", default_value = DEFAULT_FORECAST_URL)]
    pub base_url: String,

    /// Days of forecast to request; only the first 24 hours are charted
    #[arg(long, default_value_t = 1)]
    pub forecast_days: u8,

    /// Chart width in terminal columns
    #[arg(long, default_value_t = 72)]
    pub width: u16,

    /// Chart height in terminal rows
    #[arg(long, default_value_t = 12)]
    pub height: u16,
}

impl Cli {
    pub fn chart_size(&self) -> ChartSize {
        ChartSize {
            width: self.width.max(20),
            height: self.height.max(5),
        }
    }
}
