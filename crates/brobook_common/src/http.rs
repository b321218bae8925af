// --- File: crates/brobook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{BroBookError, HttpStatusCode};

/// Extension trait for BroBookError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for BroBookError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_message = self.to_string();

        // Create a JSON response with the error message
        let body = Json(json!({
            "error": {
                "message": error_message,
            }
        }));

        (status_code, body).into_response()
    }
}

/// Converts a Result<T, BroBookError> into an HTTP response, serializing the
/// success value as JSON.
pub fn handle_json_result<T: serde::Serialize>(result: Result<T, BroBookError>) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(error) => error.into_http_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::conflict;

    #[test]
    fn conflict_maps_to_409() {
        let response = conflict("slot already booked").into_http_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn json_result_ok_is_200() {
        let response = handle_json_result(Ok(serde_json::json!({"ok": true})));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
