use std::io::Write;

use anyhow::Result;
use tracing::info;

use crate::chart::{self, ChartSize};
use crate::client::{CityForecast, ForecastClient};
use crate::config::City;

const SEPARATOR_WIDTH: usize = 40;

/// Print both charts for one city.
pub fn write_city<W: Write>(out: &mut W, forecast: &CityForecast, size: ChartSize) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;

    writeln!(out, "{} — Temperature (°C)", forecast.city)?;
    writeln!(out, "{}", chart::render(&forecast.temperatures, size))?;

    writeln!(out, "{} — Humidity (%)", forecast.city)?;
    writeln!(out, "{}", chart::render(&forecast.humidity, size))?;
    Ok(())
}

/// Fetch and print each city in turn. The first failure ends the run; cities
/// already printed stay printed.
pub async fn run<W: Write>(
    client: &ForecastClient,
    cities: &[City],
    size: ChartSize,
    out: &mut W,
) -> Result<Vec<CityForecast>> {
    let mut printed = Vec::with_capacity(cities.len());

    for city in cities {
        let forecast = client.fetch(city).await?;
        info!(city = city.name, hours = forecast.temperatures.len(), "Fetched forecast");
        write_city(out, &forecast, size)?;
        out.flush()?;
        printed.push(forecast);
    }

    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_block_layout() {
        let forecast = CityForecast {
            city: "Rome".to_string(),
            temperatures: vec![Some(18.0), Some(21.0), Some(19.5)],
            humidity: vec![Some(60.0), Some(55.0), Some(65.0)],
        };
        let mut out = Vec::new();
        write_city(&mut out, &forecast, ChartSize { width: 40, height: 8 }).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("=".repeat(40).as_str()));
        assert_eq!(lines.next(), Some("Rome — Temperature (°C)"));
        assert!(text.contains("\nRome — Humidity (%)\n"));
        // header + separator + two titled charts of 8 rows each
        assert_eq!(text.lines().count(), 2 + 2 * (1 + 8));
    }
}
