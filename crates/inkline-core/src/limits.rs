//! Engine ceilings, cooldowns, and windows.
//!
//! Values carry their units in the name to avoid confusion.

/// Hard cap on pages per chapter.
pub const MAX_PAGES_PER_CHAPTER: usize = 80;

/// Maximum comment body length after trimming, in characters.
pub const COMMENT_MAX_CHARS: usize = 140;

/// Minimum gap between two comments from the same actor.
pub const COMMENT_COOLDOWN_SECS: i64 = 8;

/// Minimum gap between two reactions from the same actor.
pub const REACTION_COOLDOWN_SECS: i64 = 1;

/// Vote ceiling over the short sliding window.
pub const VOTES_PER_MINUTE: usize = 20;

/// Vote ceiling over the long sliding window. Histories are pruned to this
/// window on every successful write.
pub const VOTES_PER_DAY: usize = 300;

/// A comment at or below this score is rendered collapsed.
pub const COLLAPSE_SCORE_THRESHOLD: i64 = -5;

/// Overlay snapshot bounds.
pub const OVERLAY_COMMENT_LIMIT: usize = 12;
pub const OVERLAY_REACTION_LIMIT: usize = 24;

/// Window for the overlay's distinct-actor "reacting now" count.
pub const REACTING_NOW_WINDOW_SECS: i64 = 30;

/// A chapter published within this window carries the NEW badge.
pub const NEW_BADGE_WINDOW_HOURS: i64 = 48;

/// A chapter whose feed score exceeds this carries the TRENDING badge.
pub const TRENDING_BADGE_THRESHOLD: f64 = 70.0;

/// Recency age assumed for a published chapter missing its timestamp.
pub const UNPUBLISHED_RECENCY_HOURS: f64 = 72.0;

/// Row count of the degraded live ranking when no rollup is installed.
pub const RANKING_FALLBACK_LIMIT: usize = 10;
