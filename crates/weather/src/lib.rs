pub mod chart;
pub mod client;
pub mod config;
pub mod report;

pub use client::{CityForecast, ForecastClient};
pub use config::{City, Cli, CITIES};
