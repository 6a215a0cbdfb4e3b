use crate::config::DashboardConfig;
use crate::db::Database;
use crate::services::weather::WeatherGateway;
use axum::extract::FromRef;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: DashboardConfig,
    pub db: Database,
    pub weather: Arc<WeatherGateway>,
}

impl AppState {
    pub fn new(config: DashboardConfig, http: Client) -> Self {
        let db = Database::open_read_only(&config.database_path);
        let weather = Arc::new(WeatherGateway::new(&config, http));
        Self {
            config,
            db,
            weather,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Database {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<WeatherGateway> {
    fn from_ref(state: &AppState) -> Arc<WeatherGateway> {
        state.weather.clone()
    }
}
