use clap::Parser;

use crate::data::loader::DEFAULT_SOURCE;

/// Command line configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gss-dashboard",
    version,
    about = "Explore attitudes about gender and income in the General Social Survey"
)]
pub struct Config {
    /// Show full error chains in the dashboard and log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Survey extract to load: an http(s) URL or a local .csv / .parquet file
    #[arg(long, value_name = "URL|PATH", default_value = DEFAULT_SOURCE)]
    pub source: String,
}

impl Config {
    /// Logging threshold before any `RUST_LOG` override.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}
