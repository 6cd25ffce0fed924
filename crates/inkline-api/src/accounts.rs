//! Handlers for session, profile, follow, and notification endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/session/login` | Body: `{"provider":"google","provider_id":"..."}` |
//! | `GET`    | `/accounts/:id` | 404 if not found |
//! | `PATCH`  | `/profile` | Partial update for the actor |
//! | `GET`    | `/notifications` | Actor's inbox, newest first |
//! | `POST`   | `/notifications/read` | Marks all read; returns the count |
//! | `POST`   | `/creators/:id/follow` | Idempotent |
//! | `DELETE` | `/creators/:id/follow` | No-op when not following |
//! | `GET`    | `/creators` | Active creators by reputation |
//! | `GET`    | `/creators/:id` | Computed creator profile |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use inkline_core::{
  account::{Account, IdentityProvider, ProfilePatch},
  engagement::Follow,
  notify::Notification,
  ranking::CreatorProfile,
};
use inkline_engine::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::{ApiError, Mutation},
  extract::ActorId,
};

// ─── Session ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub provider:    IdentityProvider,
  pub provider_id: String,
}

/// `POST /session/login` — create-or-fetch from the verified identity pair.
pub async fn login(
  State(engine): State<Arc<Engine>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Mutation<Account>>, ApiError> {
  let account = engine.login(body.provider, &body.provider_id)?;
  Ok(Mutation::ok(account))
}

/// `GET /accounts/:id`
pub async fn get_account(
  State(engine): State<Arc<Engine>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError> {
  Ok(Json(engine.account(id)?))
}

/// `PATCH /profile`
pub async fn update_profile(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Json(patch): Json<ProfilePatch>,
) -> Result<Json<Mutation<Account>>, ApiError> {
  let account = engine.update_profile(actor, patch)?;
  Ok(Mutation::ok(account))
}

// ─── Notifications ────────────────────────────────────────────────────────────

/// `GET /notifications`
pub async fn notifications(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
) -> Result<Json<Vec<Notification>>, ApiError> {
  Ok(Json(engine.notifications(actor)?))
}

/// `POST /notifications/read`
pub async fn mark_notifications_read(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
) -> Result<Json<Mutation<u64>>, ApiError> {
  let flipped = engine.mark_notifications_read(actor)?;
  Ok(Mutation::ok(flipped))
}

// ─── Follows ──────────────────────────────────────────────────────────────────

/// `POST /creators/:id/follow`
pub async fn follow(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(creator_id): Path<Uuid>,
) -> Result<Json<Mutation<Follow>>, ApiError> {
  let edge = engine.follow(actor, creator_id)?;
  Ok(Mutation::ok(edge))
}

/// `DELETE /creators/:id/follow`
pub async fn unfollow(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(creator_id): Path<Uuid>,
) -> Result<Json<Mutation<()>>, ApiError> {
  engine.unfollow(actor, creator_id)?;
  Ok(Mutation::ok(()))
}

// ─── Creators ─────────────────────────────────────────────────────────────────

/// `GET /creators`
pub async fn creators(State(engine): State<Arc<Engine>>) -> Json<Vec<Account>> {
  Json(engine.creators())
}

/// `GET /creators/:id`
pub async fn creator_profile(
  State(engine): State<Arc<Engine>>,
  Path(creator_id): Path<Uuid>,
) -> Result<Json<CreatorProfile>, ApiError> {
  Ok(Json(engine.creator_profile(creator_id)?))
}
