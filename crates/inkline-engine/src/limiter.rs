//! Per-actor rate limiting: cooldowns and sliding vote windows.
//!
//! State is keyed by actor identity only, so a burst spread across many
//! targets is still throttled globally per action class. Checking and
//! charging are separate steps: a mutation checks before it writes
//! anything and charges only once it has succeeded, so a rejected call
//! leaves no limiter state behind.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use inkline_core::{
  Error, Result,
  limits::{COMMENT_COOLDOWN_SECS, REACTION_COOLDOWN_SECS, VOTES_PER_DAY, VOTES_PER_MINUTE},
};
use uuid::Uuid;

#[derive(Default)]
pub struct RateLimiter {
  last_comment_at:  HashMap<Uuid, DateTime<Utc>>,
  last_reaction_at: HashMap<Uuid, DateTime<Utc>>,
  vote_history:     HashMap<Uuid, Vec<DateTime<Utc>>>,
}

impl RateLimiter {
  pub fn new() -> Self {
    Self::default()
  }

  // ── Comment cooldown ──────────────────────────────────────────────────

  pub fn check_comment(&self, actor: Uuid, now: DateTime<Utc>) -> Result<()> {
    check_cooldown(
      self.last_comment_at.get(&actor),
      now,
      Duration::seconds(COMMENT_COOLDOWN_SECS),
      "comment",
    )
  }

  pub fn charge_comment(&mut self, actor: Uuid, now: DateTime<Utc>) {
    self.last_comment_at.insert(actor, now);
  }

  // ── Reaction cooldown ─────────────────────────────────────────────────

  pub fn check_reaction(&self, actor: Uuid, now: DateTime<Utc>) -> Result<()> {
    check_cooldown(
      self.last_reaction_at.get(&actor),
      now,
      Duration::seconds(REACTION_COOLDOWN_SECS),
      "reaction",
    )
  }

  pub fn charge_reaction(&mut self, actor: Uuid, now: DateTime<Utc>) {
    self.last_reaction_at.insert(actor, now);
  }

  // ── Vote windows ──────────────────────────────────────────────────────

  /// Reject if the attempt would exceed either vote ceiling.
  pub fn check_vote(&self, actor: Uuid, now: DateTime<Utc>) -> Result<()> {
    let stamps = match self.vote_history.get(&actor) {
      Some(stamps) => stamps.as_slice(),
      None => return Ok(()),
    };

    let minute_floor = now - Duration::seconds(60);
    let day_floor = now - Duration::hours(24);

    let in_minute: Vec<_> = stamps.iter().filter(|t| **t > minute_floor).collect();
    if in_minute.len() >= VOTES_PER_MINUTE {
      let wait = window_wait(&in_minute, Duration::seconds(60), now);
      return Err(Error::RateLimited {
        message:     "vote rate limit reached for this minute".into(),
        retry_after: wait,
      });
    }

    let in_day = stamps.iter().filter(|t| **t > day_floor).collect::<Vec<_>>();
    if in_day.len() >= VOTES_PER_DAY {
      let wait = window_wait(&in_day, Duration::hours(24), now);
      return Err(Error::RateLimited {
        message:     "daily vote limit reached".into(),
        retry_after: wait,
      });
    }

    Ok(())
  }

  /// Record a successful vote. The history is pruned to the longer window
  /// on every write so it cannot grow without bound.
  pub fn charge_vote(&mut self, actor: Uuid, now: DateTime<Utc>) {
    let day_floor = now - Duration::hours(24);
    let stamps = self.vote_history.entry(actor).or_default();
    stamps.retain(|t| *t > day_floor);
    stamps.push(now);
  }
}

/// Time until the oldest in-window stamp falls out of the window.
fn window_wait(
  in_window: &[&DateTime<Utc>],
  window: Duration,
  now: DateTime<Utc>,
) -> std::time::Duration {
  in_window
    .iter()
    .min()
    .map(|oldest| (**oldest + window - now).to_std().unwrap_or_default())
    .unwrap_or_default()
}

fn check_cooldown(
  last: Option<&DateTime<Utc>>,
  now: DateTime<Utc>,
  cooldown: Duration,
  what: &str,
) -> Result<()> {
  if let Some(last) = last {
    let elapsed = now - *last;
    if elapsed < cooldown {
      let wait = cooldown - elapsed;
      return Err(Error::RateLimited {
        message:     format!(
          "{what} cooldown: one every {} seconds",
          cooldown.num_seconds()
        ),
        retry_after: wait.to_std().unwrap_or_default(),
      });
    }
  }
  Ok(())
}
