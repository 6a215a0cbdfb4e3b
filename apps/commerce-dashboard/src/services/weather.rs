use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::config::DashboardConfig;

pub const DAILY_VARIABLES: &str = "temperature_2m_max";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("weather API returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("weather API returned a non-JSON body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Inclusive calendar range sent to the archive API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Accepts raw `order_date` bounds. Only the leading `YYYY-MM-DD` is used,
    /// so timestamps stored alongside the date are tolerated.
    pub fn from_bounds(start: Option<&str>, end: Option<&str>) -> Result<Self, String> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err("orders table has no order dates".to_string());
        };
        let start = parse_day(start)?;
        let end = parse_day(end)?;
        if start > end {
            return Err(format!("start date {start} is after end date {end}"));
        }
        Ok(Self { start, end })
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|_| format!("order date {raw:?} is not a YYYY-MM-DD date"))
}

#[derive(Clone)]
pub struct WeatherGateway {
    base_url: String,
    latitude: f64,
    longitude: f64,
    timezone: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl WeatherGateway {
    pub fn new(config: &DashboardConfig, http: reqwest::Client) -> Self {
        Self {
            base_url: config.weather_api_url.trim_end_matches('/').to_string(),
            latitude: config.weather_latitude,
            longitude: config.weather_longitude,
            timezone: config.weather_timezone.clone(),
            timeout: config.weather_timeout(),
            http,
        }
    }

    /// Daily maximum temperature for the range, returned exactly as the
    /// provider sent it. One attempt, bounded by the configured timeout.
    pub async fn daily_max_temperature(&self, range: DateRange) -> Result<JsonValue, WeatherError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("start_date", range.start.format(DATE_FORMAT).to_string()),
                ("end_date", range.end.format(DATE_FORMAT).to_string()),
                ("daily", DAILY_VARIABLES.to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(WeatherError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "weather archive request rejected");
            return Err(WeatherError::Status(status));
        }

        response.json::<JsonValue>().await.map_err(WeatherError::Decode)
    }
}
