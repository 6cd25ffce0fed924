//! Handlers for discovery feeds and period leaderboards.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/feed` | `?kind=trending\|new\|rising\|most_discussed` |
//! | `GET`  | `/search` | `?q=...&tags=a,b` |
//! | `GET`  | `/rankings/:period/:kind` | Rollup-backed, degraded fallback |
//! | `PUT`  | `/rankings/:period/:kind` | Out-of-band refresher write path |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use inkline_core::ranking::{
  FeedItem, FeedKind, RankingEntry, RankingKind, RankingPeriod, RankingRollup, RankingRow,
};
use inkline_engine::Engine;
use serde::Deserialize;

use crate::error::Mutation;

// ─── Feed ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
  #[serde(default)]
  pub kind: FeedKind,
}

/// `GET /feed[?kind=...]`
pub async fn home_feed(
  State(engine): State<Arc<Engine>>,
  Query(params): Query<FeedParams>,
) -> Json<Vec<FeedItem>> {
  Json(engine.home_feed(params.kind))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  #[serde(default)]
  pub q:    String,
  /// Comma-separated tag filter; every tag must match.
  #[serde(default)]
  pub tags: String,
}

/// `GET /search?q=...&tags=a,b`
pub async fn search(
  State(engine): State<Arc<Engine>>,
  Query(params): Query<SearchParams>,
) -> Json<Vec<FeedItem>> {
  let tags: Vec<String> = params
    .tags
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .collect();
  Json(engine.search(&params.q, &tags))
}

// ─── Rankings ─────────────────────────────────────────────────────────────────

/// `GET /rankings/:period/:kind`
pub async fn rankings(
  State(engine): State<Arc<Engine>>,
  Path((period, kind)): Path<(RankingPeriod, RankingKind)>,
) -> Json<Vec<RankingRow>> {
  Json(engine.rankings(period, kind))
}

#[derive(Debug, Deserialize)]
pub struct RollupBody {
  pub entries:     Vec<RankingEntry>,
  pub computed_at: DateTime<Utc>,
}

/// `PUT /rankings/:period/:kind` — install a freshly computed rollup.
pub async fn install_rollup(
  State(engine): State<Arc<Engine>>,
  Path((period, kind)): Path<(RankingPeriod, RankingKind)>,
  Json(body): Json<RollupBody>,
) -> Json<Mutation<()>> {
  engine.install_rollup(RankingRollup {
    period,
    kind,
    entries: body.entries,
    computed_at: body.computed_at,
  });
  Mutation::ok(())
}
