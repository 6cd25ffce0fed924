//! Discovery and ranking: feed scoring, feed orders, badges, search, and
//! periodic leaderboards.
//!
//! Feeds are computed live over published chapters. Period leaderboards
//! are not: the engine only resolves a precomputed rollup against live
//! records, degrading to a small live scoreboard when none is installed.

use chrono::{DateTime, Duration, Utc};
use inkline_core::{
  Error, Result,
  account::Account,
  content::{Chapter, Series},
  limits::{
    NEW_BADGE_WINDOW_HOURS, RANKING_FALLBACK_LIMIT, TRENDING_BADGE_THRESHOLD,
    UNPUBLISHED_RECENCY_HOURS,
  },
  ranking::{
    Badge, CreatorProfile, CreatorStats, FeedItem, FeedKind, RankingKind, RankingPeriod,
    RankingRollup, RankingRow,
  },
};
use uuid::Uuid;

use crate::{engine::Engine, store::Store};

/// The composite trending metric: views, engagement, rating, audience,
/// and a recency boost that decays with hours since publish. A published
/// chapter somehow missing its timestamp counts as 72 hours old.
pub fn feed_score(
  chapter: &Chapter,
  series: &Series,
  follower_count: usize,
  now: DateTime<Utc>,
) -> f64 {
  let recency_hours = match chapter.published_at {
    Some(at) => ((now - at).num_seconds() as f64 / 3600.0).max(1.0),
    None => UNPUBLISHED_RECENCY_HOURS,
  };
  chapter.view_count as f64 * 0.003
    + chapter.comment_count as f64 * 2.0
    + chapter.reaction_count as f64 * 0.4
    + series.average_rating * 8.0
    + follower_count as f64 * 0.03
    + 24.0 / recency_hours
}

impl Engine {
  // ── Feeds ─────────────────────────────────────────────────────────────

  /// The home feed in the requested order. Only published chapters ever
  /// appear.
  pub fn home_feed(&self, kind: FeedKind) -> Vec<FeedItem> {
    let now = self.now();
    let state = self.read();
    let mut chapters = state.store.published_chapters();

    match kind {
      FeedKind::New => {
        chapters.sort_by_key(|c| std::cmp::Reverse(c.published_at));
      }
      FeedKind::MostDiscussed => {
        chapters.sort_by_key(|c| std::cmp::Reverse(c.comment_count));
      }
      FeedKind::Rising => {
        chapters.sort_by(|a, b| {
          rising_score(&state.store, b).total_cmp(&rising_score(&state.store, a))
        });
      }
      FeedKind::Trending => {
        chapters.sort_by(|a, b| {
          live_feed_score(&state.store, b, now).total_cmp(&live_feed_score(&state.store, a, now))
        });
      }
    }

    chapters
      .into_iter()
      .filter_map(|c| build_feed_item(&state.store, c, now))
      .collect()
  }

  /// Case-insensitive discovery search over series title, creator handle,
  /// and tags; every selected tag must be present.
  pub fn search(&self, query: &str, tags: &[String]) -> Vec<FeedItem> {
    let now = self.now();
    let state = self.read();
    let needle = query.trim().to_lowercase();

    let mut chapters = state.store.published_chapters();
    chapters.sort_by_key(|c| std::cmp::Reverse(c.published_at));

    chapters
      .into_iter()
      .filter(|chapter| {
        let Some(series) = state.store.series(chapter.series_id) else {
          return false;
        };
        let Some(creator) = state.store.account(chapter.creator_id) else {
          return false;
        };
        let query_match = needle.is_empty()
          || series.title.to_lowercase().contains(&needle)
          || creator.username.to_lowercase().contains(&needle)
          || series.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        let tag_match = tags.iter().all(|t| series.tags.contains(t));
        query_match && tag_match
      })
      .filter_map(|c| build_feed_item(&state.store, c, now))
      .collect()
  }

  // ── Leaderboards ──────────────────────────────────────────────────────

  /// Resolve a period leaderboard. Rollup entries whose chapter no longer
  /// resolves are dropped; with no rollup installed, a degraded live
  /// scoreboard of the top published chapters is returned instead.
  pub fn rankings(&self, period: RankingPeriod, kind: RankingKind) -> Vec<RankingRow> {
    let state = self.read();

    let Some(rollup) = state.store.rollup(period, kind) else {
      let mut chapters = state.store.published_chapters();
      chapters.sort_by(|a, b| fallback_score(b).total_cmp(&fallback_score(a)));
      return chapters
        .into_iter()
        .take(RANKING_FALLBACK_LIMIT)
        .enumerate()
        .map(|(index, chapter)| RankingRow {
          chapter: chapter.clone(),
          series:  state.store.series(chapter.series_id).cloned(),
          score:   fallback_score(chapter),
          rank:    index as u32 + 1,
        })
        .collect();
    };

    rollup
      .entries
      .iter()
      .filter_map(|entry| {
        // Stale references, and chapters no longer published, drop out.
        let chapter = state.store.chapter(entry.chapter_id).filter(|c| c.is_published())?;
        Some(RankingRow {
          chapter: chapter.clone(),
          series:  state.store.series(chapter.series_id).cloned(),
          score:   entry.score,
          rank:    entry.rank,
        })
      })
      .collect()
  }

  /// Install (or replace) the precomputed rollup for its (period, kind)
  /// pair. This is the out-of-band refresher's write path.
  pub fn install_rollup(&self, rollup: RankingRollup) {
    let mut state = self.write();
    tracing::debug!(
      period = ?rollup.period,
      kind = ?rollup.kind,
      entries = rollup.entries.len(),
      "installed ranking rollup"
    );
    state.store.install_rollup(rollup);
  }

  // ── Creators ──────────────────────────────────────────────────────────

  /// Active creators, highest reputation first.
  pub fn creators(&self) -> Vec<Account> {
    let state = self.read();
    let mut creators: Vec<Account> = state
      .store
      .accounts()
      .filter(|a| a.is_creator && !a.is_suspended)
      .cloned()
      .collect();
    creators.sort_by(|a, b| b.reputation_score.cmp(&a.reputation_score));
    creators
  }

  /// The computed creator page: audience size, series, lifetime stats.
  pub fn creator_profile(&self, creator_id: Uuid) -> Result<CreatorProfile> {
    let state = self.read();
    let account = state
      .store
      .account(creator_id)
      .filter(|a| a.is_creator)
      .cloned()
      .ok_or_else(|| Error::NotFound("creator".into()))?;

    let mut series: Vec<Series> = state
      .store
      .series_of_creator(creator_id)
      .into_iter()
      .cloned()
      .collect();
    series.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let mut stats = CreatorStats {
      reads:     0,
      comments:  0,
      reactions: 0,
    };
    for chapter in state.store.chapters().filter(|c| c.creator_id == creator_id) {
      stats.reads += chapter.view_count;
      stats.comments += state
        .store
        .comments_of_chapter(chapter.chapter_id)
        .filter(|c| !c.is_deleted)
        .count() as u64;
      stats.reactions += state.store.chapter_reaction_count(chapter.chapter_id) as u64;
    }

    Ok(CreatorProfile {
      follower_count: state.store.follower_count(creator_id) as u64,
      account,
      series,
      stats,
    })
  }
}

fn live_feed_score(store: &Store, chapter: &Chapter, now: DateTime<Utc>) -> f64 {
  let Some(series) = store.series(chapter.series_id) else {
    return 0.0;
  };
  feed_score(chapter, series, store.follower_count(chapter.creator_id), now)
}

fn rising_score(store: &Store, chapter: &Chapter) -> f64 {
  let followers = store.follower_count(chapter.creator_id) as f64;
  chapter.comment_count as f64 + chapter.reaction_count as f64 * 0.5 + followers * 1.4
}

/// The simplified score used when no rollup is installed.
fn fallback_score(chapter: &Chapter) -> f64 {
  chapter.comment_count as f64
    + chapter.reaction_count as f64 * 0.4
    + chapter.view_count as f64 * 0.002
}

fn build_feed_item(store: &Store, chapter: &Chapter, now: DateTime<Utc>) -> Option<FeedItem> {
  let series = store.series(chapter.series_id)?;
  let creator = store.account(chapter.creator_id)?;

  let is_new = chapter
    .published_at
    .is_some_and(|at| now - at < Duration::hours(NEW_BADGE_WINDOW_HOURS));
  let is_trending =
    feed_score(chapter, series, store.follower_count(creator.account_id), now)
      > TRENDING_BADGE_THRESHOLD;

  let mut badges = Vec::new();
  if is_new {
    badges.push(Badge::New);
  }
  if is_trending {
    badges.push(Badge::Trending);
  }

  Some(FeedItem {
    series_id: series.series_id,
    chapter_id: chapter.chapter_id,
    creator_id: creator.account_id,
    cover_ref: series.cover_ref.clone(),
    title: series.title.clone(),
    creator_name: creator.username.clone(),
    rating: series.average_rating,
    comment_count: chapter.comment_count,
    view_count: chapter.view_count,
    updated_at: chapter.updated_at,
    badges,
  })
}
