// --- File: crates/brobook_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! This module provides trait definitions for the storage collaborator the
//! availability logic depends on. The trait allows for dependency injection
//! and easier testing by decoupling the slot computation from any specific
//! persistence mechanism (the production app keeps providers and bookings in
//! a document store; tests use an in-memory implementation).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use crate::models::{Booking, ProviderSettings};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Input for creating a booking at a chosen slot instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    /// The slot start instant the customer picked.
    pub date_time: DateTime<Utc>,
    /// Label shown to the provider (customer name etc.).
    pub summary: Option<String>,
}

/// A trait for the booking storage collaborator.
///
/// The availability core never persists anything itself: it reads a provider
/// settings snapshot and a day's bookings through this trait and hands back
/// slot lists. Implementations are responsible for re-running the
/// availability check at commit time (see `create_booking`) so that two
/// customers who both saw an open slot cannot both book it.
pub trait BookingStore: Send + Sync {
    /// Error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the availability settings snapshot for a provider.
    fn provider_settings(&self, provider_id: &str)
        -> BoxFuture<'_, ProviderSettings, Self::Error>;

    /// Fetch all bookings whose instant falls on the given calendar date in
    /// the provider's time zone, regardless of status.
    fn bookings_for_day(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<Booking>, Self::Error>;

    /// Fetch bookings in a date range for the management surface.
    fn bookings_in_range(
        &self,
        provider_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        include_canceled: bool,
    ) -> BoxFuture<'_, Vec<Booking>, Self::Error>;

    /// Persist a booking at the requested instant.
    ///
    /// Implementations MUST re-validate that the slot is still bookable
    /// atomically with the write (the listing/booking race window) and fail
    /// with a conflict error otherwise.
    fn create_booking(
        &self,
        provider_id: &str,
        booking: NewBooking,
    ) -> BoxFuture<'_, Booking, Self::Error>;

    /// Mark an existing booking as canceled, freeing its slot.
    fn cancel_booking(
        &self,
        provider_id: &str,
        booking_id: &str,
    ) -> BoxFuture<'_, Booking, Self::Error>;
}
