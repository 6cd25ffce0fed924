//! Series, chapters, and pages — the creator-owned content tree.
//!
//! A series belongs to exactly one creator; chapters belong to exactly one
//! series; pages belong to exactly one chapter. Children are reached through
//! the store's foreign-key indexes, never through lists on the parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Reading layout ──────────────────────────────────────────────────────────

/// Page-turn direction for paged reading modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDirection {
  Rtl,
  Ltr,
}

/// How a series is meant to be read. Paged modes carry a page-turn
/// direction; continuous scroll has none, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "direction", rename_all = "lowercase")]
pub enum ReadingLayout {
  Manga(ReadingDirection),
  Comic(ReadingDirection),
  Scroll,
}

impl ReadingLayout {
  pub fn direction(&self) -> Option<ReadingDirection> {
    match self {
      Self::Manga(d) | Self::Comic(d) => Some(*d),
      Self::Scroll => None,
    }
  }
}

// ─── Series ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
  Active,
  Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
  pub series_id:        Uuid,
  pub creator_id:       Uuid,
  pub title:            String,
  pub description:      String,
  pub tags:             Vec<String>,
  pub language:         String,
  pub is_mature:        bool,
  pub content_warnings: Vec<String>,
  /// Opaque reference to the stored cover asset.
  pub cover_ref:        String,
  pub layout:           ReadingLayout,
  pub status:           SeriesStatus,
  /// Derived from ratings out of band; never directly writable.
  pub average_rating:   f64,
  pub rating_count:     u64,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Input to series creation.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesInput {
  pub title:            String,
  pub description:      String,
  #[serde(default)]
  pub tags:             Vec<String>,
  pub language:         String,
  #[serde(default)]
  pub is_mature:        bool,
  #[serde(default)]
  pub content_warnings: Vec<String>,
  pub cover_ref:        String,
  pub layout:           ReadingLayout,
}

/// Partial series update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesPatch {
  pub title:            Option<String>,
  pub description:      Option<String>,
  pub tags:             Option<Vec<String>>,
  pub language:         Option<String>,
  pub is_mature:        Option<bool>,
  pub content_warnings: Option<Vec<String>>,
  pub layout:           Option<ReadingLayout>,
}

// ─── Chapter ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
  Draft,
  Published,
}

/// A chapter and its derived counters.
///
/// `published_at` is non-null exactly when `status` is `Published`, and
/// `page_count` always equals the number of page records the store holds
/// for the chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
  pub chapter_id:     Uuid,
  pub series_id:      Uuid,
  pub creator_id:     Uuid,
  /// Caller-supplied; uniqueness within a series is the creator's problem.
  pub chapter_number: u32,
  pub title:          Option<String>,
  pub notes:          Option<String>,
  pub status:         ChapterStatus,
  pub published_at:   Option<DateTime<Utc>>,
  pub page_count:     u32,
  pub comment_count:  u64,
  pub reaction_count: u64,
  pub view_count:     u64,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Chapter {
  pub fn is_published(&self) -> bool {
    matches!(self.status, ChapterStatus::Published)
  }
}

/// Input to draft creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterDraftInput {
  pub chapter_number: u32,
  pub title:          Option<String>,
  pub notes:          Option<String>,
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One page of a chapter. While the chapter is a draft, page numbers are a
/// dense permutation of `1..=count`; after publish they are frozen and only
/// the asset reference may change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
  pub page_id:     Uuid,
  pub chapter_id:  Uuid,
  pub series_id:   Uuid,
  /// 1-based, gapless, unique within the chapter.
  pub page_number: u32,
  /// Opaque reference to the stored image; the engine never inspects it.
  pub asset_ref:   String,
  pub created_at:  DateTime<Utc>,
}
