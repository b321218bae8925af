//! Runtime feature flag handling.
//!
//! Compile-time gating uses `#[cfg(feature = "...")]`; this module covers the
//! runtime side, where a compiled-in feature can still be switched off
//! through configuration.

use brobook_config::AppConfig;
use std::sync::Arc;

/// Check if the availability feature is enabled at runtime.
pub fn is_availability_enabled(config: &Arc<AppConfig>) -> bool {
    config.use_availability
}
