use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATABASE_PATH: &str = "CCL_ecommerce.db";
const DEFAULT_WEATHER_API_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const DEFAULT_WEATHER_LATITUDE: f64 = 51.5085;
const DEFAULT_WEATHER_LONGITUDE: f64 = -0.1257;
const DEFAULT_WEATHER_TIMEZONE: &str = "Europe/London";
const DEFAULT_WEATHER_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub database_path: PathBuf,
    pub static_root: Option<PathBuf>,
    pub weather_api_url: String,
    pub weather_latitude: f64,
    pub weather_longitude: f64,
    pub weather_timezone: String,
    pub weather_timeout_seconds: u64,
}

impl DashboardConfig {
    pub fn from_env(
        cli_database: Option<PathBuf>,
        cli_static_root: Option<PathBuf>,
    ) -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok(), cli_database, cli_static_root)
    }

    /// Builds the config from an arbitrary variable source. CLI values win over variables.
    pub fn from_vars<F>(
        lookup: F,
        cli_database: Option<PathBuf>,
        cli_static_root: Option<PathBuf>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let database_path = cli_database
            .or_else(|| vars.optional_path("DASHBOARD_DATABASE_PATH"))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
        if database_path.as_os_str().is_empty() {
            anyhow::bail!("DASHBOARD_DATABASE_PATH resolved to an empty path");
        }
        let static_root = cli_static_root.or_else(|| vars.optional_path("DASHBOARD_STATIC_ROOT"));

        let weather_api_url = vars.string("DASHBOARD_WEATHER_API_URL", DEFAULT_WEATHER_API_URL);
        let weather_latitude = vars.f64("DASHBOARD_WEATHER_LATITUDE", DEFAULT_WEATHER_LATITUDE);
        let weather_longitude = vars.f64("DASHBOARD_WEATHER_LONGITUDE", DEFAULT_WEATHER_LONGITUDE);
        let weather_timezone = vars.string("DASHBOARD_WEATHER_TIMEZONE", DEFAULT_WEATHER_TIMEZONE);
        let weather_timeout_seconds = vars
            .u64(
                "DASHBOARD_WEATHER_TIMEOUT_SECONDS",
                DEFAULT_WEATHER_TIMEOUT_SECONDS,
            )
            .clamp(1, 120);

        let config = Self {
            database_path,
            static_root,
            weather_api_url,
            weather_latitude,
            weather_longitude,
            weather_timezone,
            weather_timeout_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.weather_latitude) {
            anyhow::bail!(
                "DASHBOARD_WEATHER_LATITUDE must be within [-90, 90], got {}",
                self.weather_latitude
            );
        }
        if !(-180.0..=180.0).contains(&self.weather_longitude) {
            anyhow::bail!(
                "DASHBOARD_WEATHER_LONGITUDE must be within [-180, 180], got {}",
                self.weather_longitude
            );
        }
        if let Some(root) = &self.static_root {
            if !root.is_dir() {
                anyhow::bail!("static_root not found at {}", root.display());
            }
            let shell = root.join(crate::static_assets::SHELL_FILE);
            if !shell.is_file() {
                anyhow::bail!("static_root has no {}", shell.display());
            }
        }
        reqwest::Url::parse(&self.weather_api_url).with_context(|| {
            format!(
                "DASHBOARD_WEATHER_API_URL is not a valid URL ({})",
                self.weather_api_url
            )
        })?;
        Ok(())
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional_string(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.optional_string(key)
            .unwrap_or_else(|| default.to_string())
    }

    fn optional_path(&self, key: &str) -> Option<PathBuf> {
        self.optional_string(key).map(PathBuf::from)
    }

    fn u64(&self, key: &str, default: u64) -> u64 {
        self.optional_string(key)
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(default)
    }

    fn f64(&self, key: &str, default: f64) -> f64 {
        self.optional_string(key)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or(default)
    }
}
