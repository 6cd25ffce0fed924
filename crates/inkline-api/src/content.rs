//! Handlers for series, chapter, and page lifecycle endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/series` | All series, recently updated first |
//! | `POST`  | `/series` | Creates; actor becomes a creator |
//! | `GET`   | `/series/:id` | Series with its creator |
//! | `PATCH` | `/series/:id` | Owner-only partial update |
//! | `GET`   | `/series/:id/chapters` | Drafts visible to the owner only |
//! | `POST`  | `/series/:id/chapters` | New draft |
//! | `GET`   | `/drafts` | The actor's drafts |
//! | `GET`   | `/chapters/:id` | Draft resolves for its owner only |
//! | `GET`   | `/chapters/:id/pages` | Pages in page order |
//! | `POST`  | `/chapters/:id/pages` | Draft-only append |
//! | `POST`  | `/chapters/:id/pages/reorder` | Full-permutation replace |
//! | `POST`  | `/chapters/:id/publish` | Fans out follower notifications |
//! | `POST`  | `/chapters/:id/unpublish` | Blocked once engagement exists |
//! | `PUT`   | `/chapters/:id/pages/:n/asset` | Published-only asset swap |
//! | `POST`  | `/chapters/:id/view` | Anonymous view counter |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use inkline_core::{
  account::Account,
  content::{Chapter, ChapterDraftInput, Page, Series, SeriesInput, SeriesPatch},
};
use inkline_engine::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::{ApiError, Mutation},
  extract::ActorId,
};

// ─── Series ───────────────────────────────────────────────────────────────────

/// `GET /series`
pub async fn list_series(State(engine): State<Arc<Engine>>) -> Json<Vec<Series>> {
  Json(engine.series_list())
}

/// `POST /series`
pub async fn create_series(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Json(input): Json<SeriesInput>,
) -> Result<Json<Mutation<Series>>, ApiError> {
  let series = engine.create_series(actor, input)?;
  Ok(Mutation::ok(series))
}

#[derive(Debug, Serialize)]
pub struct SeriesDetail {
  pub series:  Series,
  pub creator: Account,
}

/// `GET /series/:id`
pub async fn series_detail(
  State(engine): State<Arc<Engine>>,
  Path(series_id): Path<Uuid>,
) -> Result<Json<SeriesDetail>, ApiError> {
  let (series, creator) = engine.series_detail(series_id)?;
  Ok(Json(SeriesDetail { series, creator }))
}

/// `PATCH /series/:id`
pub async fn update_series(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(series_id): Path<Uuid>,
  Json(patch): Json<SeriesPatch>,
) -> Result<Json<Mutation<Series>>, ApiError> {
  let series = engine.update_series(actor, series_id, patch)?;
  Ok(Mutation::ok(series))
}

// ─── Chapters ─────────────────────────────────────────────────────────────────

/// `GET /series/:id/chapters`
pub async fn chapters_of_series(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(series_id): Path<Uuid>,
) -> Result<Json<Vec<Chapter>>, ApiError> {
  Ok(Json(engine.chapters_of_series(actor, series_id)?))
}

/// `POST /series/:id/chapters`
pub async fn create_chapter_draft(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(series_id): Path<Uuid>,
  Json(input): Json<ChapterDraftInput>,
) -> Result<Json<Mutation<Chapter>>, ApiError> {
  let chapter = engine.create_chapter_draft(actor, series_id, input)?;
  Ok(Mutation::ok(chapter))
}

/// `GET /drafts`
pub async fn draft_chapters(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
) -> Result<Json<Vec<Chapter>>, ApiError> {
  Ok(Json(engine.draft_chapters(actor)?))
}

/// `GET /chapters/:id`
pub async fn get_chapter(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(chapter_id): Path<Uuid>,
) -> Result<Json<Chapter>, ApiError> {
  Ok(Json(engine.chapter(actor, chapter_id)?))
}

/// `GET /chapters/:id/pages`
pub async fn chapter_pages(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(chapter_id): Path<Uuid>,
) -> Result<Json<Vec<Page>>, ApiError> {
  Ok(Json(engine.chapter_pages(actor, chapter_id)?))
}

// ─── Pages ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageBody {
  pub asset_ref: String,
}

/// `POST /chapters/:id/pages`
pub async fn add_page(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(chapter_id): Path<Uuid>,
  Json(body): Json<PageBody>,
) -> Result<Json<Mutation<Page>>, ApiError> {
  let page = engine.add_page_to_draft(actor, chapter_id, &body.asset_ref)?;
  Ok(Mutation::ok(page))
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
  pub order: Vec<Uuid>,
}

/// `POST /chapters/:id/pages/reorder`
pub async fn reorder_pages(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(chapter_id): Path<Uuid>,
  Json(body): Json<ReorderBody>,
) -> Result<Json<Mutation<Vec<Page>>>, ApiError> {
  let pages = engine.reorder_draft_pages(actor, chapter_id, &body.order)?;
  Ok(Mutation::ok(pages))
}

/// `PUT /chapters/:id/pages/:n/asset`
pub async fn replace_page_asset(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path((chapter_id, page_number)): Path<(Uuid, u32)>,
  Json(body): Json<PageBody>,
) -> Result<Json<Mutation<Page>>, ApiError> {
  let page = engine.replace_page_asset(actor, chapter_id, page_number, &body.asset_ref)?;
  Ok(Mutation::ok(page))
}

// ─── Publish / unpublish / views ──────────────────────────────────────────────

/// `POST /chapters/:id/publish`
pub async fn publish_chapter(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(chapter_id): Path<Uuid>,
) -> Result<Json<Mutation<Chapter>>, ApiError> {
  let chapter = engine.publish_chapter(actor, chapter_id)?;
  Ok(Mutation::ok(chapter))
}

/// `POST /chapters/:id/unpublish`
pub async fn unpublish_chapter(
  State(engine): State<Arc<Engine>>,
  ActorId(actor): ActorId,
  Path(chapter_id): Path<Uuid>,
) -> Result<Json<Mutation<Chapter>>, ApiError> {
  let chapter = engine.unpublish_chapter(actor, chapter_id)?;
  Ok(Mutation::ok(chapter))
}

/// `POST /chapters/:id/view`
pub async fn record_view(
  State(engine): State<Arc<Engine>>,
  Path(chapter_id): Path<Uuid>,
) -> Result<Json<Mutation<u64>>, ApiError> {
  let views = engine.record_view(chapter_id)?;
  Ok(Mutation::ok(views))
}
