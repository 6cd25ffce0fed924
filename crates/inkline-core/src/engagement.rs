//! Comments, votes, reactions, and follows — the engagement edges.
//!
//! These reference the content tree and accounts by id only; the referenced
//! entities hold no back-pointers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::limits::COLLAPSE_SCORE_THRESHOLD;

// ─── Comments ────────────────────────────────────────────────────────────────

/// A comment against a specific page of a published chapter. Never
/// physically removed; deletion is a soft flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id:  Uuid,
  pub chapter_id:  Uuid,
  pub series_id:   Uuid,
  pub page_number: u32,
  pub author_id:   Uuid,
  /// Replies nest exactly one level: a parent is always top-level.
  pub parent_id:   Option<Uuid>,
  pub body:        String,
  pub is_deleted:  bool,
  pub is_pinned:   bool,
  pub upvotes:     u64,
  pub downvotes:   u64,
  /// `upvotes - downvotes`, recomputed after every tally change.
  pub score:       i64,
  pub created_at:  DateTime<Utc>,
}

impl Comment {
  /// Low-score collapse is a function of the live score, never stored.
  pub fn is_collapsed(&self) -> bool {
    self.score <= COLLAPSE_SCORE_THRESHOLD
  }
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
  Up,
  Down,
}

impl VoteValue {
  /// The tally contribution: +1 or -1.
  pub fn unit(self) -> i64 {
    match self {
      Self::Up => 1,
      Self::Down => -1,
    }
  }
}

/// At most one per (voter, comment) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentVote {
  pub comment_id: Uuid,
  pub voter_id:   Uuid,
  pub value:      VoteValue,
  pub created_at: DateTime<Utc>,
}

// ─── Reactions ───────────────────────────────────────────────────────────────

/// An emoji reaction against a page. Append-only, never edited, and not
/// deduplicated per actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
  pub reaction_id: Uuid,
  pub chapter_id:  Uuid,
  pub series_id:   Uuid,
  pub page_number: u32,
  pub actor_id:    Uuid,
  pub emoji:       String,
  pub created_at:  DateTime<Utc>,
}

// ─── Follows ─────────────────────────────────────────────────────────────────

/// A reader-follows-creator edge, unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
  pub follower_id: Uuid,
  pub creator_id:  Uuid,
  pub created_at:  DateTime<Utc>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadSort {
  /// Pinned first, then score descending, then recency descending.
  #[default]
  Top,
  /// Recency descending only.
  New,
}

/// Single-level thread view: ordered top-level comments plus reply groups
/// keyed by parent id, each group oldest-first.
#[derive(Debug, Clone, Serialize)]
pub struct PageThread {
  pub comments:          Vec<Comment>,
  pub replies_by_parent: HashMap<Uuid, Vec<Comment>>,
}

/// Live-overlay snapshot for one page. Stateless per call; deduplication
/// against previously-seen ids is the caller's responsibility.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayStream {
  pub comments:     Vec<Comment>,
  pub reactions:    Vec<Reaction>,
  /// Distinct actors who reacted on this page within the live window.
  pub reacting_now: usize,
}
