// --- File: crates/brobook_availability/src/service.rs ---
//! Booking store implementation.
//!
//! This module provides an in-memory implementation of the BookingStore
//! trait. The production deployment fronts a document store; this
//! implementation backs the demo binary and the test suites, and is the
//! reference for the commit-time contract every implementation must honor:
//! `create_booking` re-runs the availability check while holding the
//! registry lock, so a slot observed as open cannot be booked twice.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use brobook_common::models::{Booking, BookingStatus, ProviderSettings};
use brobook_common::services::{BookingStore, BoxFuture, NewBooking};

use crate::logic::{self, AvailabilityError};

/// Errors that can occur when interacting with the booking store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),
    #[error("Booking not found: {0}")]
    BookingNotFound(String),
    #[error("Booking conflict: requested slot is no longer available")]
    Conflict,
    #[error("Invalid provider settings: {0}")]
    InvalidSettings(String),
    #[error("Failed to load provider seed: {0}")]
    SeedError(String),
    #[error("Availability error: {0}")]
    Availability(AvailabilityError),
}

impl From<AvailabilityError> for StoreError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::SlotNoLongerAvailable => StoreError::Conflict,
            other => StoreError::Availability(other),
        }
    }
}

struct ProviderRecord {
    settings: ProviderSettings,
    bookings: Vec<Booking>,
}

/// In-memory booking store keyed by provider id.
#[derive(Default)]
pub struct InMemoryBookingStore {
    providers: Mutex<HashMap<String, ProviderRecord>>,
}

/// One entry of the provider seed file (JSON array).
#[derive(serde::Deserialize)]
struct ProviderSeed {
    id: String,
    settings: ProviderSettings,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a provider. This is the configuration-save
    /// boundary, so settings invariants are enforced here rather than at
    /// computation time.
    pub fn register_provider(
        &self,
        provider_id: &str,
        settings: ProviderSettings,
    ) -> Result<(), StoreError> {
        settings
            .validate()
            .map_err(|e| StoreError::InvalidSettings(e.to_string()))?;
        let mut providers = self.providers.lock().unwrap();
        providers.insert(
            provider_id.to_string(),
            ProviderRecord {
                settings,
                bookings: Vec::new(),
            },
        );
        Ok(())
    }

    /// Loads a provider registry from a JSON seed file.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::SeedError(e.to_string()))?;
        let seeds: Vec<ProviderSeed> =
            serde_json::from_str(&contents).map_err(|e| StoreError::SeedError(e.to_string()))?;

        let store = Self::new();
        for seed in seeds {
            store.register_provider(&seed.id, seed.settings)?;
        }
        info!(
            count = store.providers.lock().unwrap().len(),
            path = %path.as_ref().display(),
            "loaded provider registry"
        );
        Ok(store)
    }

    /// Inserts a booking without the availability re-check. Meant for
    /// seeding known state in tests and demos.
    pub fn seed_booking(&self, provider_id: &str, booking: Booking) -> Result<(), StoreError> {
        let mut providers = self.providers.lock().unwrap();
        let record = providers
            .get_mut(provider_id)
            .ok_or_else(|| StoreError::ProviderNotFound(provider_id.to_string()))?;
        record.bookings.push(booking);
        Ok(())
    }

    fn with_record<T>(
        &self,
        provider_id: &str,
        f: impl FnOnce(&ProviderRecord) -> T,
    ) -> Result<T, StoreError> {
        let providers = self.providers.lock().unwrap();
        providers
            .get(provider_id)
            .map(f)
            .ok_or_else(|| StoreError::ProviderNotFound(provider_id.to_string()))
    }

    fn day_of(record: &ProviderRecord, instant: DateTime<Utc>) -> Result<NaiveDate, StoreError> {
        let tz = logic::provider_tz(&record.settings)?;
        Ok(instant.with_timezone(&tz).date_naive())
    }

    fn bookings_on(record: &ProviderRecord, date: NaiveDate) -> Result<Vec<Booking>, StoreError> {
        let tz = logic::provider_tz(&record.settings)?;
        Ok(record
            .bookings
            .iter()
            .filter(|b| b.date_time.with_timezone(&tz).date_naive() == date)
            .cloned()
            .collect())
    }
}

impl BookingStore for InMemoryBookingStore {
    type Error = StoreError;

    fn provider_settings(
        &self,
        provider_id: &str,
    ) -> BoxFuture<'_, ProviderSettings, Self::Error> {
        let result = self.with_record(provider_id, |record| record.settings.clone());
        Box::pin(async move { result })
    }

    fn bookings_for_day(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<Booking>, Self::Error> {
        let result = self.with_record(provider_id, |record| Self::bookings_on(record, date));
        Box::pin(async move { result? })
    }

    fn bookings_in_range(
        &self,
        provider_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        include_canceled: bool,
    ) -> BoxFuture<'_, Vec<Booking>, Self::Error> {
        let result = self.with_record(provider_id, |record| -> Result<Vec<Booking>, StoreError> {
            let tz = logic::provider_tz(&record.settings)?;
            let mut bookings: Vec<Booking> = record
                .bookings
                .iter()
                .filter(|b| {
                    let day = b.date_time.with_timezone(&tz).date_naive();
                    day >= start_date
                        && day <= end_date
                        && (include_canceled || b.status != BookingStatus::Canceled)
                })
                .cloned()
                .collect();
            bookings.sort_by_key(|b| b.date_time);
            Ok(bookings)
        });
        Box::pin(async move { result? })
    }

    /// Creates a booking, re-running the availability check while the
    /// registry lock is held. Listing and booking are separate requests, so
    /// this compare-and-set is what closes the race window between them.
    fn create_booking(
        &self,
        provider_id: &str,
        booking: NewBooking,
    ) -> BoxFuture<'_, Booking, Self::Error> {
        let result = (|| {
            let now = Utc::now();
            let mut providers = self.providers.lock().unwrap();
            let record = providers
                .get_mut(provider_id)
                .ok_or_else(|| StoreError::ProviderNotFound(provider_id.to_string()))?;

            let date = Self::day_of(record, booking.date_time)?;
            let day_bookings = Self::bookings_on(record, date)?;
            logic::revalidate_slot(&record.settings, booking.date_time, &day_bookings, now)?;

            let created = Booking {
                id: Uuid::new_v4().to_string(),
                date_time: booking.date_time,
                status: BookingStatus::Upcoming,
                summary: booking.summary,
            };
            record.bookings.push(created.clone());
            info!(provider_id, booking_id = %created.id, at = %created.date_time, "booking created");
            Ok(created)
        })();
        Box::pin(async move { result })
    }

    fn cancel_booking(
        &self,
        provider_id: &str,
        booking_id: &str,
    ) -> BoxFuture<'_, Booking, Self::Error> {
        let result = (|| {
            let mut providers = self.providers.lock().unwrap();
            let record = providers
                .get_mut(provider_id)
                .ok_or_else(|| StoreError::ProviderNotFound(provider_id.to_string()))?;
            let booking = record
                .bookings
                .iter_mut()
                .find(|b| b.id == booking_id)
                .ok_or_else(|| StoreError::BookingNotFound(booking_id.to_string()))?;
            booking.status = BookingStatus::Canceled;
            info!(provider_id, booking_id, "booking canceled");
            Ok(booking.clone())
        })();
        Box::pin(async move { result })
    }
}
