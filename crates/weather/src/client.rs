use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use campus_shared::{ensure_success, UpstreamError};

use crate::config::City;

const SERVICE: &str = "forecast API";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m";

/// Hours charted per city.
pub const HOURS: usize = 24;

#[derive(Deserialize, Debug)]
struct ForecastResponse {
    hourly: Hourly,
}

#[derive(Deserialize, Debug)]
struct Hourly {
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
}

/// First day of hourly readings for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityForecast {
    pub city: String,
    pub temperatures: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
}

impl CityForecast {
    fn from_hourly(city: &City, mut hourly: Hourly) -> Self {
        hourly.temperature_2m.truncate(HOURS);
        hourly.relative_humidity_2m.truncate(HOURS);
        Self {
            city: city.name.to_string(),
            temperatures: hourly.temperature_2m,
            humidity: hourly.relative_humidity_2m,
        }
    }
}

#[derive(Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    forecast_days: u8,
}

impl ForecastClient {
    pub fn new(base_url: String, forecast_days: u8) -> Self {
        Self {
            client: Client::new(),
            base_url,
            forecast_days,
        }
    }

    pub async fn fetch(&self, city: &City) -> Result<CityForecast> {
        debug!(city = city.name, "Requesting hourly forecast");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", city.latitude.to_string()),
                ("longitude", city.longitude.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("forecast_days", self.forecast_days.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(UpstreamError::transport(SERVICE))?;

        let response = ensure_success(SERVICE, response).await?;
        let body = response
            .json::<ForecastResponse>()
            .await
            .map_err(UpstreamError::transport(SERVICE))?;

        Ok(CityForecast::from_hourly(city, body.hourly))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CITIES;

    #[test]
    fn keeps_only_the_first_day() {
        let hourly: Hourly = serde_json::from_value(serde_json::json!({
            "time": ["2024-01-01T00:00"],
            "temperature_2m": (0..48).map(|h| h as f64).collect::<Vec<_>>(),
            "relative_humidity_2m": [50.0, null, 70.0],
        }))
        .unwrap();

        let forecast = CityForecast::from_hourly(&CITIES[0], hourly);
        assert_eq!(forecast.city, "Berlin");
        assert_eq!(forecast.temperatures.len(), HOURS);
        assert_eq!(forecast.temperatures[23], Some(23.0));
        assert_eq!(forecast.humidity, vec![Some(50.0), None, Some(70.0)]);
    }

    #[test]
    fn missing_series_fails_to_parse() {
        let parsed = serde_json::from_value::<ForecastResponse>(serde_json::json!({
            "hourly": {"temperature_2m": [1.0]}
        }));
        assert!(parsed.is_err());
    }
}
