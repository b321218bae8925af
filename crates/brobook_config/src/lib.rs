// --- File: crates/brobook_config/src/lib.rs ---

pub mod models;

pub use models::{AppConfig, AvailabilityConfig, ServerConfig};

use config::{Config, ConfigError, Environment, File};
use std::env;

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `config/default.toml`
/// 2. `config/{RUN_MODE}.toml` (RUN_MODE defaults to "development")
/// 3. Environment variables prefixed with `BROBOOK__`, e.g.
///    `BROBOOK__SERVER__PORT=8086`
///
/// A `.env` file is loaded first so local development can keep overrides out
/// of the shell profile. Dependent crates call this so they do not need to
/// know where configuration comes from.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenv::dotenv().ok();

    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
        .add_source(Environment::with_prefix("BROBOOK").separator("__"))
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8086)?
        .set_default("use_availability", true)?
        .build()?
        .try_deserialize()
}
