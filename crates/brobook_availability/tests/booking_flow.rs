// End-to-end booking lifecycle over the HTTP surface: seed a provider from
// a registry file, list availability, book, collide, cancel, rebook.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use brobook_availability::routes::routes;
use brobook_config::{AppConfig, AvailabilityConfig, ServerConfig};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use std::io::Write;
use std::sync::Arc;
use tower::ServiceExt;

fn write_seed_file() -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("brobook-seed-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("temp dir is writable");
    let hours = serde_json::json!({ "start": "09:00", "end": "17:00" });
    let seed = serde_json::json!([
        {
            "id": "barber-1",
            "settings": {
                "working_hours": {
                    "monday": hours.clone(), "tuesday": hours.clone(),
                    "wednesday": hours.clone(), "thursday": hours.clone(),
                    "friday": hours.clone(), "saturday": hours.clone(),
                    "sunday": hours
                },
                "slot_policy": {
                    "slot_duration_minutes": 60,
                    "break_minutes": 0,
                    "booking_delay_hours": 0.0
                },
                "blocked_dates": [],
                "blocked_slots": [],
                "time_zone": "Europe/Zurich"
            }
        }
    ]);
    file.write_all(seed.to_string().as_bytes()).unwrap();
    path
}

fn app(seed_path: &std::path::Path) -> Router {
    let config = Arc::new(AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8086,
        },
        use_availability: true,
        availability: Some(AvailabilityConfig {
            horizon_days: Some(60),
            providers_file: Some(seed_path.to_string_lossy().into_owned()),
        }),
    });
    routes(config)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

fn future_date(days_ahead: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days_ahead)
}

#[tokio::test]
async fn full_booking_lifecycle() {
    let seed = write_seed_file();
    let date = future_date(10);

    // The seeded provider is visible and has the full hourly grid
    let response = app(&seed)
        .oneshot(
            Request::builder()
                .uri(format!("/availability?provider_id=barber-1&date={date}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    let slots = listing["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 8);
    let start_time = slots[0]["start_time"].as_str().unwrap().to_string();

    // Each `app(&seed)` call builds a fresh registry from the file, so the
    // lifecycle below runs against one shared instance instead.
    let app = app(&seed);

    let book = |start: String, summary: &str| {
        serde_json::json!({
            "provider_id": "barber-1",
            "start_time": start,
            "summary": summary,
        })
        .to_string()
    };

    // Book the first slot
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/book")
                .header("content-type", "application/json")
                .body(Body::from(book(start_time.clone(), "First customer")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let booked = body_json(response).await;
    let booking_id = booked["booking_id"].as_str().unwrap().to_string();

    // A second attempt at the same instant loses the race
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/book")
                .header("content-type", "application/json")
                .body(Body::from(book(start_time.clone(), "Second customer")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The booking shows up in the admin listing
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/admin/bookings?provider_id=barber-1&start_date={date}&end_date={date}"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let admin = body_json(response).await;
    assert_eq!(admin["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(admin["bookings"][0]["id"], booking_id.as_str());

    // Cancel it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!(
                    "/admin/mark_cancelled/{booking_id}?provider_id=barber-1"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The slot is open again and the second customer can take it
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/book")
                .header("content-type", "application/json")
                .body(Body::from(book(start_time, "Second customer")))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let _ = std::fs::remove_file(seed);
}
