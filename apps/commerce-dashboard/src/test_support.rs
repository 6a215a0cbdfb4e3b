use crate::config::DashboardConfig;
use crate::db::Database;
use crate::state::AppState;
use anyhow::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE orders (order_id INTEGER PRIMARY KEY, order_date TEXT NOT NULL);
CREATE TABLE order_details (
    order_id INTEGER NOT NULL,
    product_id INTEGER NOT NULL,
    quantity_ordered INTEGER NOT NULL,
    price_at_time REAL NOT NULL
);
CREATE TABLE product_categories (category_id INTEGER PRIMARY KEY, category_name TEXT NOT NULL);
CREATE TABLE products (
    product_id INTEGER PRIMARY KEY,
    product_name TEXT NOT NULL,
    category_id INTEGER NOT NULL
);
CREATE TABLE stock_level (product_id INTEGER NOT NULL, quantity INTEGER NOT NULL);
CREATE TABLE payment_methods (method_id INTEGER PRIMARY KEY, method_name TEXT NOT NULL);
CREATE TABLE payments (payment_id INTEGER PRIMARY KEY, method_id INTEGER NOT NULL, order_id INTEGER NOT NULL);
"#;

/// Throwaway SQLite file carrying the shop schema. Removed on drop.
pub struct TestDatabase {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shop.db");
        let mut conn = writable(&path, true).await?;
        sqlx::raw_sql(SCHEMA).execute(&mut conn).await?;
        conn.close().await?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn database(&self) -> Database {
        Database::open_read_only(&self.path)
    }
}

pub async fn seed(fixture: &TestDatabase, sql: &str) -> Result<()> {
    let mut conn = writable(fixture.path(), false).await?;
    sqlx::raw_sql(sql).execute(&mut conn).await?;
    conn.close().await?;
    Ok(())
}

async fn writable(path: &Path, create: bool) -> Result<SqliteConnection> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create);
    Ok(SqliteConnection::connect_with(&options).await?)
}

pub fn test_config(database_path: PathBuf) -> DashboardConfig {
    DashboardConfig {
        database_path,
        static_root: None,
        weather_api_url: "http://127.0.0.1:9/v1/archive".to_string(),
        weather_latitude: 51.5085,
        weather_longitude: -0.1257,
        weather_timezone: "Europe/London".to_string(),
        weather_timeout_seconds: 2,
    }
}

pub fn test_state(config: DashboardConfig) -> AppState {
    AppState::new(config, reqwest::Client::new())
}

/// Serves `router` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}")
}
