//! Actor extraction.
//!
//! The OAuth handshake happens upstream; what reaches this layer is its
//! result, a verified account id in the `x-account-id` header.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// The (possibly absent) verified actor. A missing or malformed header
/// resolves to `None`; the engine decides whether that matters for the
/// operation at hand.
#[derive(Debug, Clone, Copy)]
pub struct ActorId(pub Option<Uuid>);

impl<S: Send + Sync> FromRequestParts<S> for ActorId {
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let actor = parts
      .headers
      .get("x-account-id")
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value).ok());
    Ok(Self(actor))
  }
}
