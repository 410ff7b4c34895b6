use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::{management::LifecycleError, types::NowPlaying};

/// `{"data":{"message":..,"status":200}}`, the confirmation envelope.
pub fn confirmation(message: &str) -> Json<Value> {
    Json(json!({
        "data": {
            "message": message,
            "status": StatusCode::OK.as_u16(),
        }
    }))
}

/// Envelope of the now-playing query.
///
/// Nothing playing is a success with an empty `data` object and `status`
/// 204 inside the body; the HTTP status stays 200 so the body is delivered.
pub fn now_playing(playing: NowPlaying) -> Json<Value> {
    match playing {
        NowPlaying::Playing(track) => Json(json!({
            "data": track,
            "status": StatusCode::OK.as_u16(),
        })),
        NowPlaying::Empty => Json(json!({
            "data": {},
            "status": StatusCode::NO_CONTENT.as_u16(),
        })),
    }
}

fn error_body(status: StatusCode, message: String) -> Value {
    json!({
        "error": {
            "status": status.as_u16(),
            "message": message,
        }
    })
}

impl IntoResponse for LifecycleError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            LifecycleError::Upstream(e) => (e.status(), e.body()),
            LifecycleError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ),
            LifecycleError::NotAuthorized => (
                StatusCode::UNAUTHORIZED,
                error_body(StatusCode::UNAUTHORIZED, self.to_string()),
            ),
            LifecycleError::MissingCode => (
                StatusCode::BAD_REQUEST,
                error_body(StatusCode::BAD_REQUEST, self.to_string()),
            ),
        };

        (status, Json(body)).into_response()
    }
}
