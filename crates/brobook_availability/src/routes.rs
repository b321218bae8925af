// --- File: crates/brobook_availability/src/routes.rs ---

use crate::handlers::{
    book_slot_handler, get_availability_handler, get_booked_events_handler,
    get_next_available_handler, get_slot_management_handler, mark_booking_cancelled_handler,
    AvailabilityState,
};
use crate::service::InMemoryBookingStore;
use axum::{
    routing::{get, patch, post},
    Router,
};
use brobook_config::AppConfig;
use std::sync::Arc;
use tracing::warn;

/// Creates a router containing all routes for the availability feature,
/// building the provider registry from the configured seed file (an empty
/// registry when none is configured).
pub fn routes(config: Arc<AppConfig>) -> Router {
    let store = match config
        .availability
        .as_ref()
        .and_then(|a| a.providers_file.as_deref())
    {
        Some(path) => InMemoryBookingStore::from_seed_file(path).unwrap_or_else(|err| {
            warn!(%err, path, "failed to load provider seed file, starting empty");
            InMemoryBookingStore::new()
        }),
        None => InMemoryBookingStore::new(),
    };
    routes_with_store(config, Arc::new(store))
}

/// Creates the availability router around an existing store. Used by tests
/// and by deployments that share one registry across features.
pub fn routes_with_store(config: Arc<AppConfig>, store: Arc<InMemoryBookingStore>) -> Router {
    let state = Arc::new(AvailabilityState { config, store });

    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/slot-management", get(get_slot_management_handler))
        .route("/next-available", get(get_next_available_handler))
        .route("/book", post(book_slot_handler))
        .route("/admin/bookings", get(get_booked_events_handler))
        .route(
            "/admin/mark_cancelled/{booking_id}",
            patch(mark_booking_cancelled_handler),
        )
        .with_state(state)
}
