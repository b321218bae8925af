// File: crates/brobook_availability/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers;
use crate::logic::{
    AvailabilityQuery, AvailableSlotsResponse, BookSlotRequest, BookedEventsQuery,
    BookedEventsResponse, BookingResponse, CancellationResponse, ManagedSlotsResponse,
    NextAvailableQuery, NextAvailableResponse, SlotView,
};
use brobook_common::models::{Booking, BookingStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_availability_handler,
        handlers::get_slot_management_handler,
        handlers::get_next_available_handler,
        handlers::book_slot_handler,
        handlers::get_booked_events_handler,
        handlers::mark_booking_cancelled_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailableSlotsResponse,
            ManagedSlotsResponse,
            NextAvailableQuery,
            NextAvailableResponse,
            SlotView,
            BookSlotRequest,
            BookingResponse,
            BookedEventsQuery,
            BookedEventsResponse,
            CancellationResponse,
            Booking,
            BookingStatus
        )
    ),
    tags(
        (name = "Availability", description = "Provider availability and booking API")
    ),
    servers(
        (url = "/api", description = "Availability API server")
    )
)]
pub struct AvailabilityApiDoc;
