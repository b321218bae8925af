// --- File: crates/brobook_common/src/models.rs ---

// Shared domain models for provider availability. These are read-only
// snapshots from the point of view of the availability logic: the storage
// layer owns mutation, the core only computes over them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::warn;

use crate::error::BroBookError;

/// Wall-clock opening hours for a single weekday, as "HH:MM" strings.
///
/// The strings come straight from provider-edited settings, so they are not
/// trusted: [`DayHours::resolve`] turns them into times and treats anything
/// malformed (or inverted) as a closed day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DayHours {
    #[cfg_attr(feature = "openapi", schema(example = "09:00"))]
    pub start: String,
    #[cfg_attr(feature = "openapi", schema(example = "17:00"))]
    pub end: String,
}

impl DayHours {
    /// Parses the start/end pair. Returns `None` (closed day) when either
    /// string is not "HH:MM" or when start >= end, logging a data-quality
    /// warning rather than failing the computation.
    pub fn resolve(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = NaiveTime::parse_from_str(&self.start, "%H:%M").ok();
        let end = NaiveTime::parse_from_str(&self.end, "%H:%M").ok();
        match (start, end) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => {
                warn!(
                    start = %self.start,
                    end = %self.end,
                    "unusable working-hours entry, treating day as closed"
                );
                None
            }
        }
    }
}

/// Weekly working hours. A `None` (or omitted) entry means the provider is
/// closed that day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct WorkingHoursConfig {
    #[serde(default)]
    pub monday: Option<DayHours>,
    #[serde(default)]
    pub tuesday: Option<DayHours>,
    #[serde(default)]
    pub wednesday: Option<DayHours>,
    #[serde(default)]
    pub thursday: Option<DayHours>,
    #[serde(default)]
    pub friday: Option<DayHours>,
    #[serde(default)]
    pub saturday: Option<DayHours>,
    #[serde(default)]
    pub sunday: Option<DayHours>,
}

impl WorkingHoursConfig {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayHours> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    /// True when no weekday has an entry at all.
    pub fn is_empty(&self) -> bool {
        self.monday.is_none()
            && self.tuesday.is_none()
            && self.wednesday.is_none()
            && self.thursday.is_none()
            && self.friday.is_none()
            && self.saturday.is_none()
            && self.sunday.is_none()
    }
}

/// How a provider slices a working day into bookable slots.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SlotPolicy {
    /// Length of one bookable slot.
    #[cfg_attr(feature = "openapi", schema(example = 30))]
    pub slot_duration_minutes: u32,
    /// Gap between consecutive slots.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 0))]
    pub break_minutes: u32,
    /// Minimum lead time between "now" and a same-day slot.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 1.0))]
    pub booking_delay_hours: f64,
}

impl SlotPolicy {
    /// Minutes between consecutive slot starts.
    pub fn grid_minutes(&self) -> u32 {
        self.slot_duration_minutes + self.break_minutes
    }
}

/// Lifecycle state of a booking. Only `Upcoming` bookings occupy future
/// slots; `Completed` ones still occupy slots in the past, `Canceled` ones
/// never do.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Canceled,
}

/// A confirmed appointment at an exact slot-aligned instant.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:00:00Z"))]
    pub date_time: DateTime<Utc>,
    pub status: BookingStatus,
    /// Free-form label shown to the provider (customer name etc.).
    #[serde(default)]
    pub summary: Option<String>,
}

impl Booking {
    /// Whether this booking occupies the slot starting at `slot_start`.
    /// Instant equality, not interval overlap: bookings are only ever
    /// created on the slot grid.
    pub fn occupies(&self, slot_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.date_time != slot_start {
            return false;
        }
        match self.status {
            BookingStatus::Upcoming => true,
            BookingStatus::Completed => slot_start <= now,
            BookingStatus::Canceled => false,
        }
    }
}

/// The complete availability snapshot for one provider.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Absent means the provider never completed onboarding; availability
    /// scans refuse to run rather than report 365 empty days.
    #[serde(default)]
    pub working_hours: Option<WorkingHoursConfig>,
    pub slot_policy: SlotPolicy,
    /// Calendar dates that are fully unavailable regardless of working hours.
    #[serde(default)]
    pub blocked_dates: HashSet<NaiveDate>,
    /// Individual slot instants removed from availability.
    #[serde(default)]
    pub blocked_slots: HashSet<DateTime<Utc>>,
    /// IANA zone id all wall-clock arithmetic is interpreted in.
    #[cfg_attr(feature = "openapi", schema(example = "Europe/Zurich"))]
    pub time_zone: String,
}

impl ProviderSettings {
    /// Resolves the provider's IANA zone id.
    pub fn tz(&self) -> Result<Tz, BroBookError> {
        Tz::from_str(&self.time_zone).map_err(|_| {
            BroBookError::ConfigError(format!("unknown time zone: {}", self.time_zone))
        })
    }

    /// Save-time invariant checks. Computation code assumes these have
    /// passed, so the storage layer must call this before persisting.
    pub fn validate(&self) -> Result<(), BroBookError> {
        if self.slot_policy.grid_minutes() == 0 {
            return Err(BroBookError::ValidationError(
                "slot_duration_minutes + break_minutes must be positive".to_string(),
            ));
        }
        if self.slot_policy.booking_delay_hours < 0.0 {
            return Err(BroBookError::ValidationError(
                "booking_delay_hours must not be negative".to_string(),
            ));
        }
        self.tz()?;
        Ok(())
    }
}
