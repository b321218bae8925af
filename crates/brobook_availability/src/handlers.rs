// File: crates/brobook_availability/src/handlers.rs
use crate::logic::{
    self, AvailabilityError, AvailabilityQuery, AvailableSlotsResponse, BookSlotRequest,
    BookedEventsQuery, BookedEventsResponse, BookingResponse, CancellationResponse,
    ManagedSlotsResponse, NextAvailableQuery, NextAvailableResponse, DEFAULT_HORIZON_DAYS,
};
use crate::service::{InMemoryBookingStore, StoreError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use brobook_common::services::{BookingStore, NewBooking};
use brobook_config::AppConfig;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

// Define shared state needed by availability handlers
#[derive(Clone)]
pub struct AvailabilityState {
    pub config: Arc<AppConfig>,
    pub store: Arc<InMemoryBookingStore>, // Shared provider/booking registry
}

impl AvailabilityState {
    fn horizon_days(&self) -> u32 {
        self.config
            .availability
            .as_ref()
            .and_then(|a| a.horizon_days)
            .unwrap_or(DEFAULT_HORIZON_DAYS)
    }

    fn ensure_enabled(&self) -> Result<(), (StatusCode, String)> {
        if brobook_common::is_availability_enabled(&self.config) {
            Ok(())
        } else {
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "Availability service is disabled.".to_string(),
            ))
        }
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, (StatusCode, String)> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid {} format (YYYY-MM-DD)", field),
        )
    })
}

fn store_error_response(err: StoreError) -> (StatusCode, String) {
    match &err {
        StoreError::ProviderNotFound(_) | StoreError::BookingNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        StoreError::Conflict => (StatusCode::CONFLICT, err.to_string()),
        StoreError::InvalidSettings(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        StoreError::SeedError(_) | StoreError::Availability(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn availability_error_response(err: AvailabilityError) -> (StatusCode, String) {
    match &err {
        AvailabilityError::MissingWorkingHours | AvailabilityError::UnknownTimeZone(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Server configuration error: {}", err),
        ),
        AvailabilityError::SlotNoLongerAvailable => (StatusCode::CONFLICT, err.to_string()),
    }
}

/// Handler for the customer-facing slot listing: blocked and occupied slots
/// are excluded outright, never just flagged.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable slots for the day", body = AvailableSlotsResponse),
        (status = 400, description = "Bad request (e.g., invalid date format)"),
        (status = 404, description = "Unknown provider"),
        (status = 500, description = "Provider configuration error")
    ),
    tag = "Availability"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<AvailabilityState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableSlotsResponse>, (StatusCode, String)> {
    state.ensure_enabled()?;
    let date = parse_date(&query.date, "date")?;

    let settings = state
        .store
        .provider_settings(&query.provider_id)
        .await
        .map_err(store_error_response)?;
    let bookings = state
        .store
        .bookings_for_day(&query.provider_id, date)
        .await
        .map_err(store_error_response)?;

    let now = Utc::now();
    let open = logic::bookable_slots(&settings, date, &bookings, now)
        .map_err(availability_error_response)?;

    // Only suggest a jump-ahead date when the requested day came up empty.
    let next_available = if open.is_empty() {
        Some(
            logic::find_next_available_date(date, &settings, now, state.horizon_days())
                .map_err(availability_error_response)?,
        )
    } else {
        None
    };

    let annotated: Vec<logic::AnnotatedSlot> = open
        .into_iter()
        .map(|start| logic::AnnotatedSlot {
            start,
            day_blocked: false,
            blocked: false,
            taken: false,
        })
        .collect();

    Ok(Json(AvailableSlotsResponse {
        date,
        next_available,
        slots: logic::present_slots(&annotated, now),
    }))
}

/// Handler for the provider slot-management view: every generated slot is
/// returned with its flags so blocked slots stay visible and can be
/// unblocked.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slot-management",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Annotated slot grid for the day", body = ManagedSlotsResponse),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Unknown provider"),
        (status = 500, description = "Provider configuration error")
    ),
    tag = "Availability"
))]
pub async fn get_slot_management_handler(
    State(state): State<Arc<AvailabilityState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ManagedSlotsResponse>, (StatusCode, String)> {
    state.ensure_enabled()?;
    let date = parse_date(&query.date, "date")?;

    let settings = state
        .store
        .provider_settings(&query.provider_id)
        .await
        .map_err(store_error_response)?;
    let bookings = state
        .store
        .bookings_for_day(&query.provider_id, date)
        .await
        .map_err(store_error_response)?;

    let working_hours = settings
        .working_hours
        .as_ref()
        .ok_or(AvailabilityError::MissingWorkingHours)
        .map_err(availability_error_response)?;
    let tz = logic::provider_tz(&settings).map_err(availability_error_response)?;

    let now = Utc::now();
    let raw = logic::compute_raw_slots(date, working_hours, &settings.slot_policy, now, tz);
    let (mut annotated, day_blocked) = logic::annotate_blocks(
        &raw,
        date,
        &settings.blocked_dates,
        &settings.blocked_slots,
    );
    logic::mark_taken(&mut annotated, &bookings, now);

    Ok(Json(ManagedSlotsResponse {
        date,
        day_blocked,
        slots: logic::present_slots(&annotated, now),
    }))
}

/// Handler returning the first date, scanning forward, with an open slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/next-available",
    params(NextAvailableQuery),
    responses(
        (status = 200, description = "First date with at least one open slot", body = NextAvailableResponse),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Unknown provider"),
        (status = 500, description = "Provider configuration error")
    ),
    tag = "Availability"
))]
pub async fn get_next_available_handler(
    State(state): State<Arc<AvailabilityState>>,
    Query(query): Query<NextAvailableQuery>,
) -> Result<Json<NextAvailableResponse>, (StatusCode, String)> {
    state.ensure_enabled()?;
    let from = parse_date(&query.from, "from")?;

    let settings = state
        .store
        .provider_settings(&query.provider_id)
        .await
        .map_err(store_error_response)?;

    let date = logic::find_next_available_date(from, &settings, Utc::now(), state.horizon_days())
        .map_err(availability_error_response)?;
    Ok(Json(NextAvailableResponse { date }))
}

/// Handler to book a slot. The store re-validates availability at commit
/// time, so a slot that was open when listed can still come back 409 here.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Booking result", body = BookingResponse),
        (status = 400, description = "Bad request (e.g., invalid start_time)"),
        (status = 404, description = "Unknown provider"),
        (status = 409, description = "Slot no longer available"),
        (status = 500, description = "Internal error")
    ),
    tag = "Availability"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<AvailabilityState>>,
    Json(request): Json<BookSlotRequest>,
) -> Result<Json<BookingResponse>, (StatusCode, String)> {
    state.ensure_enabled()?;

    let start = DateTime::parse_from_rfc3339(&request.start_time)
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                "Invalid start_time format (RFC 3339)".to_string(),
            )
        })?
        .with_timezone(&Utc);

    info!(provider_id = %request.provider_id, start = %start, "booking requested");
    let booking = state
        .store
        .create_booking(
            &request.provider_id,
            NewBooking {
                date_time: start,
                summary: request.summary,
            },
        )
        .await
        .map_err(store_error_response)?;

    Ok(Json(BookingResponse {
        success: true,
        booking_id: Some(booking.id),
        message: "Appointment booked successfully.".to_string(),
    }))
}

/// Handler listing a provider's bookings for the management surface.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/bookings",
    params(BookedEventsQuery),
    responses(
        (status = 200, description = "Bookings in range", body = BookedEventsResponse),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Unknown provider")
    ),
    tag = "Availability"
))]
pub async fn get_booked_events_handler(
    State(state): State<Arc<AvailabilityState>>,
    Query(query): Query<BookedEventsQuery>,
) -> Result<Json<BookedEventsResponse>, (StatusCode, String)> {
    state.ensure_enabled()?;
    let start_date = parse_date(&query.start_date, "start_date")?;
    let end_date = parse_date(&query.end_date, "end_date")?;
    if end_date < start_date {
        return Err((
            StatusCode::BAD_REQUEST,
            "end_date must be after start_date".to_string(),
        ));
    }

    let bookings = state
        .store
        .bookings_in_range(
            &query.provider_id,
            start_date,
            end_date,
            query.include_canceled.unwrap_or(false),
        )
        .await
        .map_err(store_error_response)?;

    Ok(Json(BookedEventsResponse { bookings }))
}

#[derive(serde::Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ProviderRef {
    pub provider_id: String,
}

/// Handler marking a booking as canceled, which frees its slot for rebooking.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/admin/mark_cancelled/{booking_id}",
    params(
        ("booking_id" = String, Path, description = "The ID of the booking to cancel"),
        ProviderRef
    ),
    responses(
        (status = 200, description = "Cancellation result", body = CancellationResponse),
        (status = 404, description = "Unknown provider or booking")
    ),
    tag = "Availability"
))]
pub async fn mark_booking_cancelled_handler(
    State(state): State<Arc<AvailabilityState>>,
    Path(booking_id): Path<String>,
    Query(provider): Query<ProviderRef>,
) -> Result<Json<CancellationResponse>, (StatusCode, String)> {
    state.ensure_enabled()?;

    state
        .store
        .cancel_booking(&provider.provider_id, &booking_id)
        .await
        .map_err(store_error_response)?;

    Ok(Json(CancellationResponse {
        success: true,
        message: "Appointment marked as cancelled successfully.".to_string(),
    }))
}
