//! Activity stream: the live-overlay snapshot for one page.
//!
//! Consumers poll this; each call is a fresh, bounded snapshot. Animating
//! only new arrivals is the caller's job, by remembering the ids it has
//! already surfaced.

use std::collections::HashSet;

use chrono::Duration;
use inkline_core::{
  engagement::{Comment, OverlayStream, Reaction},
  limits::{OVERLAY_COMMENT_LIMIT, OVERLAY_REACTION_LIMIT, REACTING_NOW_WINDOW_SECS},
};
use uuid::Uuid;

use crate::engine::Engine;

impl Engine {
  /// The most recent comments and reactions on a page, plus how many
  /// distinct actors reacted within the live window. The distinct-actor
  /// count covers the whole window, not just the returned sample.
  pub fn overlay(&self, chapter_id: Uuid, page_number: u32) -> OverlayStream {
    let now = self.now();
    let state = self.read();

    let mut comments: Vec<Comment> = state
      .store
      .comments_on_page(chapter_id, page_number)
      .filter(|c| !c.is_deleted)
      .cloned()
      .collect();
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    comments.truncate(OVERLAY_COMMENT_LIMIT);

    let mut reactions: Vec<Reaction> = state
      .store
      .reactions_on_page(chapter_id, page_number)
      .cloned()
      .collect();
    reactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let window_floor = now - Duration::seconds(REACTING_NOW_WINDOW_SECS);
    let reacting_now = reactions
      .iter()
      .filter(|r| r.created_at > window_floor)
      .map(|r| r.actor_id)
      .collect::<HashSet<Uuid>>()
      .len();

    reactions.truncate(OVERLAY_REACTION_LIMIT);

    OverlayStream {
      comments,
      reactions,
      reacting_now,
    }
  }
}
