//! API error type, the uniform mutation envelope, and the
//! [`axum::response::IntoResponse`] mapping between them.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use inkline_core::{Error, ErrorKind};
use serde::Serialize;
use serde_json::json;
use thiserror::Error as ThisError;

/// The uniform mutation envelope. Callers branch on `ok` before trusting
/// `data`; `error` is a human-readable message, not a code.
#[derive(Debug, Serialize)]
pub struct Mutation<T> {
  pub ok:    bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:  Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl<T: Serialize> Mutation<T> {
  pub fn ok(data: T) -> Json<Self> {
    Json(Self {
      ok:    true,
      data:  Some(data),
      error: None,
    })
  }
}

/// An engine error crossing the HTTP boundary. The status code follows
/// the stable [`ErrorKind`] taxonomy; the body keeps the envelope shape.
#[derive(Debug, ThisError)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match self.0.kind() {
      ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
      ErrorKind::Suspended | ErrorKind::NotOwner => StatusCode::FORBIDDEN,
      ErrorKind::WrongState | ErrorKind::Conflict => StatusCode::CONFLICT,
      ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
      ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
    };
    let body = Json(json!({ "ok": false, "error": self.0.to_string() }));
    let mut response = (status, body).into_response();

    if let Error::RateLimited { retry_after, .. } = &self.0 {
      let seconds = retry_after.as_secs().max(1).to_string();
      if let Ok(value) = header::HeaderValue::from_str(&seconds) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
      }
    }
    response
  }
}
