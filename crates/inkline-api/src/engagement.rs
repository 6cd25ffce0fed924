//! Handlers for comments, votes, reactions, reports, and the live overlay.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/chapters/:id/pages/:n/thread` | `?sort=top\|new` |
//! | `GET`    | `/chapters/:id/pages/:n/overlay` | Polled snapshot |
//! | `POST`   | `/chapters/:id/pages/:n/comments` | Body: [`CommentBody`] |
//! | `POST`   | `/chapters/:id/pages/:n/reactions` | Body: `{"emoji":"🔥"}` |
//! | `POST`   | `/comments/:id/vote` | Body: `{"value":"up"\|"down"}` |
//! | `DELETE` | `/comments/:id` | Author-only soft delete |
//! | `PUT`    | `/comments/:id/pin` | Chapter-owner only |
//! | `POST`   | `/reports` | Always succeeds for live actors |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use inkline_core::{
  engagement::{Comment, OverlayStream, PageThread, Reaction, ThreadSort, VoteValue},
  moderation::{Report, ReportTarget},
};
use inkline_engine::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::{ApiError, Mutation},
  extract::ActorId,
};

// ─── Thread & overlay reads ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ThreadParams {
  #[serde(default)]
  pub sort: ThreadSort,
}

/// `GET /chapters/:id/pages/:n/thread[?sort=top|new]`
pub async fn page_thread(
  State(engine): State<Arc<Engine>>,
  Path((chapter_id, page_number)): Path<(Uuid, u32)>,
  Query(params): Query<ThreadParams>,
) -> Json<PageThread> {
  Json(engine.page_thread(chapter_id, page_number, params.sort))
}

/// `GET /chapters/:id/pages/:n/overlay`
pub async fn overlay(
  State(engine): State<Arc<Engine>>,
  Path((chapter_id, page_number)): Path<(Uuid, u32)>,
) -> Json<OverlayStream> {
  Json(engine.overlay(chapter_id, page_number))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub body:      String,
  pub parent_id: Option<Uuid>,
}

/// `POST /chapters/:id/pages/:n/comments`
pub async fn add_comment(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path((chapter_id, page_number)): Path<(Uuid, u32)>,
  Json(body): Json<CommentBody>,
) -> Result<Json<Mutation<Comment>>, ApiError> {
  let comment = engine.add_comment(actor, chapter_id, page_number, &body.body, body.parent_id)?;
  Ok(Mutation::ok(comment))
}

/// `DELETE /comments/:id`
pub async fn delete_comment(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(comment_id): Path<Uuid>,
) -> Result<Json<Mutation<Comment>>, ApiError> {
  let comment = engine.delete_comment(actor, comment_id)?;
  Ok(Mutation::ok(comment))
}

#[derive(Debug, Deserialize)]
pub struct PinBody {
  pub pinned: bool,
}

/// `PUT /comments/:id/pin`
pub async fn pin_comment(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(comment_id): Path<Uuid>,
  Json(body): Json<PinBody>,
) -> Result<Json<Mutation<Comment>>, ApiError> {
  let comment = engine.set_comment_pinned(actor, comment_id, body.pinned)?;
  Ok(Mutation::ok(comment))
}

// ─── Votes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub value: VoteValue,
}

/// `POST /comments/:id/vote`
pub async fn vote_comment(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(comment_id): Path<Uuid>,
  Json(body): Json<VoteBody>,
) -> Result<Json<Mutation<Comment>>, ApiError> {
  let comment = engine.vote_comment(actor, comment_id, body.value)?;
  Ok(Mutation::ok(comment))
}

// ─── Reactions ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReactionBody {
  pub emoji: String,
}

/// `POST /chapters/:id/pages/:n/reactions`
pub async fn add_reaction(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path((chapter_id, page_number)): Path<(Uuid, u32)>,
  Json(body): Json<ReactionBody>,
) -> Result<Json<Mutation<Reaction>>, ApiError> {
  let reaction = engine.add_reaction(actor, chapter_id, page_number, &body.emoji)?;
  Ok(Mutation::ok(reaction))
}

// ─── Reports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReportBody {
  pub target:  ReportTarget,
  pub reason:  String,
  pub details: Option<String>,
}

/// `POST /reports`
pub async fn report(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Json(body): Json<ReportBody>,
) -> Result<Json<Mutation<Report>>, ApiError> {
  let report = engine.report(actor, body.target, &body.reason, body.details)?;
  Ok(Mutation::ok(report))
}
