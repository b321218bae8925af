// --- File: crates/brobook_availability/src/logic.rs ---
//
// The slot-availability core. Everything in this module is a pure function
// of its inputs: `now` is always a parameter, never an ambient clock, and
// nothing here touches storage. The pipeline is
//
//   compute_raw_slots -> annotate_blocks | exclude_blocked -> mark_taken
//     -> present_slots
//
// with `annotate_blocks` feeding the provider management surface and
// `exclude_blocked` feeding the customer booking surface. The same generator
// serves both; only the blocking mode differs.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, warn};

use brobook_common::models::{Booking, ProviderSettings, SlotPolicy, WorkingHoursConfig};

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Working hours configuration missing for provider")]
    MissingWorkingHours,
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("Requested slot is no longer available")]
    SlotNoLongerAvailable,
}

/// Upper bound for the next-available-date scan. An always-closed provider
/// must terminate the scan, not hang it.
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

// --- Data Structures ---

/// One generated slot with its availability flags. `start` carries the
/// provider's zone so formatting needs no further conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSlot {
    pub start: DateTime<Tz>,
    /// The whole calendar date is manually blocked.
    pub day_blocked: bool,
    /// This single instant is manually blocked.
    pub blocked: bool,
    /// An existing booking occupies this instant.
    pub taken: bool,
}

/// Display-ready slot descriptor handed to the UI/booking layer.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SlotView {
    /// Slot start as RFC 3339 in the provider's zone.
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:00:00+02:00"))]
    pub start_time: String,
    /// Wall-clock label, e.g. "10:00".
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub display_time: String,
    pub booked: bool,
    pub day_blocked: bool,
    pub blocked: bool,
    pub past: bool,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Provider whose calendar is queried
    pub provider_id: String,

    /// Target date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-05-05"))]
    pub date: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct NextAvailableQuery {
    pub provider_id: String,

    /// First date considered, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-05-05"))]
    pub from: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailableSlotsResponse {
    pub date: NaiveDate,
    /// Populated when the requested day has no open slots, so the booking
    /// page can jump forward.
    pub next_available: Option<NaiveDate>,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ManagedSlotsResponse {
    pub date: NaiveDate,
    pub day_blocked: bool,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NextAvailableResponse {
    pub date: NaiveDate,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookSlotRequest {
    pub provider_id: String,
    /// Chosen slot start, RFC 3339
    pub start_time: String,
    /// Label shown to the provider (customer name etc.)
    pub summary: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub booking_id: Option<String>,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct BookedEventsQuery {
    pub provider_id: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD
    pub end_date: String,
    /// Whether to include canceled bookings
    pub include_canceled: Option<bool>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookedEventsResponse {
    pub bookings: Vec<Booking>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancellationResponse {
    pub success: bool,
    pub message: String,
}

/// Resolves the provider's zone id, mapping failures into this crate's error type.
pub fn provider_tz(settings: &ProviderSettings) -> Result<Tz, AvailabilityError> {
    Tz::from_str(&settings.time_zone)
        .map_err(|_| AvailabilityError::UnknownTimeZone(settings.time_zone.clone()))
}

// --- Availability Calculator ---

/// Generates the raw slot-start instants for one calendar date.
///
/// Candidates run from the day's opening time in steps of
/// `slot_duration + break`. Only the slot START is compared against the
/// closing time, so the final slot may extend past close; that is the
/// booking policy providers configure against.
///
/// Same-day cutoff: when `date` is today in `tz`, a candidate is emitted
/// only if it lies more than `booking_delay_hours` after `now`. Future
/// dates get every candidate; past dates get none.
///
/// Closed or misconfigured weekdays yield an empty vec, not an error.
/// Local times that do not exist in `tz` (spring-forward gap)
/// are skipped; ambiguous ones resolve to the earlier instant.
pub fn compute_raw_slots(
    date: NaiveDate,
    working_hours: &WorkingHoursConfig,
    policy: &SlotPolicy,
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<DateTime<Tz>> {
    let today = now.with_timezone(&tz).date_naive();
    if date < today {
        return Vec::new();
    }

    let Some(day) = working_hours.for_weekday(date.weekday()) else {
        return Vec::new();
    };
    let Some((open, close)) = day.resolve() else {
        return Vec::new();
    };

    let grid = policy.grid_minutes();
    if grid == 0 {
        // Save-time validation should make this unreachable; refuse to spin.
        warn!("slot policy with zero grid minutes, returning no slots");
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(grid));
    let cutoff = now + Duration::minutes((policy.booking_delay_hours * 60.0).round() as i64);

    let mut slots = Vec::new();
    let mut cursor = date.and_time(open);
    let close_at = date.and_time(close);
    while cursor < close_at {
        if let Some(instant) = tz.from_local_datetime(&cursor).earliest() {
            if date > today || instant.with_timezone(&Utc) > cutoff {
                slots.push(instant);
            }
        }
        cursor += step;
    }

    debug!(
        %date,
        slot_count = slots.len(),
        grid_minutes = grid,
        "computed raw slots"
    );
    slots
}

// --- Blocking Filter ---

/// Management mode: every raw slot is kept and flagged. Blocking here is
/// advisory metadata so the provider can still see, and unblock, a blocked
/// slot. Returns the annotated slots plus whether the whole day is blocked.
pub fn annotate_blocks(
    raw: &[DateTime<Tz>],
    date: NaiveDate,
    blocked_dates: &HashSet<NaiveDate>,
    blocked_slots: &HashSet<DateTime<Utc>>,
) -> (Vec<AnnotatedSlot>, bool) {
    let day_blocked = blocked_dates.contains(&date);
    let slots = raw
        .iter()
        .map(|start| AnnotatedSlot {
            start: *start,
            day_blocked,
            blocked: blocked_slots.contains(&start.with_timezone(&Utc)),
            taken: false,
        })
        .collect();
    (slots, day_blocked)
}

/// Customer mode: blocked slots must never reach the public booking surface.
/// A blocked date removes the whole day; individually blocked instants are
/// dropped from the list.
pub fn exclude_blocked(
    raw: Vec<DateTime<Tz>>,
    date: NaiveDate,
    blocked_dates: &HashSet<NaiveDate>,
    blocked_slots: &HashSet<DateTime<Utc>>,
) -> Vec<DateTime<Tz>> {
    if blocked_dates.contains(&date) {
        return Vec::new();
    }
    raw.into_iter()
        .filter(|start| !blocked_slots.contains(&start.with_timezone(&Utc)))
        .collect()
}

// --- Booking Reconciler ---

/// Flags each slot whose exact instant is occupied by a booking. Instant
/// equality, not interval overlap: bookings are only ever created on the
/// slot grid, so the two always line up.
pub fn mark_taken(slots: &mut [AnnotatedSlot], bookings: &[Booking], now: DateTime<Utc>) {
    for slot in slots.iter_mut() {
        let instant = slot.start.with_timezone(&Utc);
        slot.taken = bookings.iter().any(|b| b.occupies(instant, now));
    }
}

/// The customer-facing composition: raw slots, customer-mode blocking, then
/// occupied slots removed. Errors only when the provider has no
/// working-hours configuration at all (or an unresolvable zone); a closed
/// or misconfigured single day is just an empty list.
pub fn bookable_slots(
    settings: &ProviderSettings,
    date: NaiveDate,
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> Result<Vec<DateTime<Tz>>, AvailabilityError> {
    let working_hours = settings
        .working_hours
        .as_ref()
        .ok_or(AvailabilityError::MissingWorkingHours)?;
    let tz = provider_tz(settings)?;

    let raw = compute_raw_slots(date, working_hours, &settings.slot_policy, now, tz);
    let open = exclude_blocked(raw, date, &settings.blocked_dates, &settings.blocked_slots);
    Ok(open
        .into_iter()
        .filter(|start| {
            let instant = start.with_timezone(&Utc);
            !bookings.iter().any(|b| b.occupies(instant, now))
        })
        .collect())
}

/// Scans forward from `from` (inclusive) for the first date with at least
/// one bookable slot, checking at most `horizon_days` days.
///
/// When the horizon is exhausted the scan returns `from` unchanged: callers
/// treat that as "unknown, let the user navigate manually". It never errors
/// over empty days; only a provider with no working-hours configuration at
/// all is refused, since scanning 365 silently empty days would mask a
/// broken account.
///
/// The per-day check ignores existing bookings deliberately: a fully booked
/// day still has its grid, and the booking page resolves occupancy when the
/// day is opened.
pub fn find_next_available_date(
    from: NaiveDate,
    settings: &ProviderSettings,
    now: DateTime<Utc>,
    horizon_days: u32,
) -> Result<NaiveDate, AvailabilityError> {
    let working_hours = settings
        .working_hours
        .as_ref()
        .ok_or(AvailabilityError::MissingWorkingHours)?;
    let tz = provider_tz(settings)?;

    for offset in 0..u64::from(horizon_days) {
        let Some(date) = from.checked_add_days(Days::new(offset)) else {
            break;
        };
        let raw = compute_raw_slots(date, working_hours, &settings.slot_policy, now, tz);
        let open = exclude_blocked(raw, date, &settings.blocked_dates, &settings.blocked_slots);
        if !open.is_empty() {
            return Ok(date);
        }
    }

    debug!(%from, horizon_days, "no open day within horizon, falling back to start date");
    Ok(from)
}

/// Commit-time re-check. Booking creation MUST call this (atomically with
/// the write) against a fresh snapshot of the day's bookings, because two
/// customers can observe the same open slot before either books it.
pub fn revalidate_slot(
    settings: &ProviderSettings,
    slot_instant: DateTime<Utc>,
    bookings_for_day: &[Booking],
    now: DateTime<Utc>,
) -> Result<(), AvailabilityError> {
    let tz = provider_tz(settings)?;
    let date = slot_instant.with_timezone(&tz).date_naive();
    let open = bookable_slots(settings, date, bookings_for_day, now)?;
    if open
        .iter()
        .any(|start| start.with_timezone(&Utc) == slot_instant)
    {
        Ok(())
    } else {
        Err(AvailabilityError::SlotNoLongerAvailable)
    }
}

// --- Slot Presentation Adapter ---

/// Maps annotated slots to display descriptors. Pure field-for-field
/// mapping; `past` compares the instant to `now` directly, with no delay
/// buffer applied.
pub fn present_slots(slots: &[AnnotatedSlot], now: DateTime<Utc>) -> Vec<SlotView> {
    slots
        .iter()
        .map(|slot| SlotView {
            start_time: slot.start.to_rfc3339(),
            display_time: slot.start.format("%H:%M").to_string(),
            booked: slot.taken,
            day_blocked: slot.day_blocked,
            blocked: slot.blocked,
            past: slot.start.with_timezone(&Utc) < now,
        })
        .collect()
}
