// --- File: crates/brobook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Availability Config ---
// Service-level defaults for the slot computation; per-provider settings
// live in the provider registry, not here.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AvailabilityConfig {
    /// How many days the next-available-date scan may look ahead.
    pub horizon_days: Option<u32>,
    /// Path to a JSON file seeding the provider registry at startup.
    pub providers_file: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_availability: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub availability: Option<AvailabilityConfig>,
}
