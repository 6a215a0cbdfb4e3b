use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "commerce-dashboard",
    version,
    about = "E-commerce reporting dashboard server"
)]
pub struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 5000)]
    pub port: u16,
    /// SQLite database file to report on (overrides DASHBOARD_DATABASE_PATH).
    #[arg(long)]
    pub database: Option<PathBuf>,
    #[arg(long)]
    pub static_root: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub print_openapi: bool,
}
