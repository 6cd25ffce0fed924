//! Discovery and ranking types: feeds, badges, and precomputed rollups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  account::Account,
  content::{Chapter, Series},
};

// ─── Periods and kinds ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPeriod {
  Week,
  Month,
  Year,
  AllTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
  Trending,
  Rising,
  MostDiscussed,
  TopRated,
}

/// Ordering of the live home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
  #[default]
  Trending,
  New,
  Rising,
  MostDiscussed,
}

// ─── Rollups ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
  pub chapter_id: Uuid,
  pub score:      f64,
  pub rank:       u32,
}

/// Precomputed ranking snapshot for one (period, kind) pair, refreshed by
/// an out-of-band batch process. Read-only input to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRollup {
  pub period:      RankingPeriod,
  pub kind:        RankingKind,
  pub entries:     Vec<RankingEntry>,
  pub computed_at: DateTime<Utc>,
}

/// A rollup entry joined back to live records at read time.
#[derive(Debug, Clone, Serialize)]
pub struct RankingRow {
  pub chapter: Chapter,
  pub series:  Option<Series>,
  pub score:   f64,
  pub rank:    u32,
}

// ─── Feed projections ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Badge {
  New,
  Trending,
}

/// One card in a discovery feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
  pub series_id:     Uuid,
  pub chapter_id:    Uuid,
  pub creator_id:    Uuid,
  pub cover_ref:     String,
  pub title:         String,
  pub creator_name:  String,
  pub rating:        f64,
  pub comment_count: u64,
  pub view_count:    u64,
  pub updated_at:    DateTime<Utc>,
  pub badges:        Vec<Badge>,
}

// ─── Creator projections ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreatorStats {
  pub reads:     u64,
  pub comments:  u64,
  pub reactions: u64,
}

/// The computed read model for a creator page — never stored.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorProfile {
  pub account:        Account,
  pub follower_count: u64,
  pub series:         Vec<Series>,
  pub stats:          CreatorStats,
}
