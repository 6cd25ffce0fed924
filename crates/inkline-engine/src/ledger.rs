//! The engagement ledger: comments, votes, reactions, reports.
//!
//! Tallies and counters are maintained inside the same write-lock unit as
//! the record they derive from, so no reader ever observes them apart.

use inkline_core::{
  Error, Result,
  content::ChapterStatus,
  engagement::{Comment, CommentVote, PageThread, Reaction, ThreadSort, VoteValue},
  limits::COMMENT_MAX_CHARS,
  moderation::{Report, ReportStatus, ReportTarget},
  notify::NotificationKind,
};
use uuid::Uuid;

use crate::{engine::Engine, guard::resolve_actor};

impl Engine {
  // ── Comments ──────────────────────────────────────────────────────────

  /// Add a comment (or a reply) to a page of a published chapter.
  ///
  /// Replies nest exactly one level: the parent must exist, sit in the
  /// same chapter, and itself be top-level. A reply to someone else
  /// notifies the parent's author.
  pub fn add_comment(
    &self,
    actor: Option<Uuid>,
    chapter_id: Uuid,
    page_number: u32,
    body: &str,
    parent_id: Option<Uuid>,
  ) -> Result<Comment> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let (series_id, status, page_count) = {
      let chapter = state
        .store
        .chapter(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      (chapter.series_id, chapter.status, chapter.page_count)
    };
    if status != ChapterStatus::Published {
      return Err(Error::WrongState(
        "comments are allowed on published chapters only".into(),
      ));
    }

    state.limiter.check_comment(actor, now)?;

    if page_number < 1 || page_number > page_count {
      return Err(Error::Validation(format!(
        "page {page_number} is not part of this chapter"
      )));
    }

    let body = body.trim();
    if body.is_empty() {
      return Err(Error::Validation("comment cannot be empty".into()));
    }
    if body.chars().count() > COMMENT_MAX_CHARS {
      return Err(Error::Validation(format!(
        "comment max length is {COMMENT_MAX_CHARS} characters"
      )));
    }

    let parent_author = match parent_id {
      None => None,
      Some(parent_id) => {
        let parent = state
          .store
          .comment(parent_id)
          .ok_or_else(|| Error::NotFound("parent comment".into()))?;
        if parent.chapter_id != chapter_id {
          return Err(Error::Validation("reply must stay in its chapter".into()));
        }
        if parent.parent_id.is_some() {
          return Err(Error::Validation("replies cannot be nested further".into()));
        }
        Some(parent.author_id)
      }
    };

    let comment = Comment {
      comment_id: Uuid::new_v4(),
      chapter_id,
      series_id,
      page_number,
      author_id: actor,
      parent_id,
      body: body.to_owned(),
      is_deleted: false,
      is_pinned: false,
      upvotes: 0,
      downvotes: 0,
      score: 0,
      created_at: now,
    };
    state.store.insert_comment(comment.clone());
    if let Some(chapter) = state.store.chapter_mut(chapter_id) {
      chapter.comment_count += 1;
    }
    state.limiter.charge_comment(actor, now);

    if let Some(author) = parent_author
      && author != actor
    {
      Self::push_notification(
        &mut state.store,
        author,
        NotificationKind::Reply,
        serde_json::json!({
          "chapter_id": chapter_id,
          "page_number": page_number,
          "comment_id": comment.comment_id,
        }),
        now,
      );
    }
    Ok(comment)
  }

  /// Soft-delete a comment. The record stays; only the flag flips, and
  /// the chapter's comment counter is untouched. Idempotent.
  pub fn delete_comment(&self, actor: Option<Uuid>, comment_id: Uuid) -> Result<Comment> {
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let author = state
      .store
      .comment(comment_id)
      .map(|c| c.author_id)
      .ok_or_else(|| Error::NotFound("comment".into()))?;
    if author != actor {
      return Err(Error::NotOwner("only the author can delete a comment".into()));
    }

    let comment = state
      .store
      .comment_mut(comment_id)
      .ok_or_else(|| Error::NotFound("comment".into()))?;
    comment.is_deleted = true;
    Ok(comment.clone())
  }

  /// Pin or unpin a top-level comment; chapter-owner only.
  pub fn set_comment_pinned(
    &self,
    actor: Option<Uuid>,
    comment_id: Uuid,
    pinned: bool,
  ) -> Result<Comment> {
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let (chapter_id, is_reply) = {
      let comment = state
        .store
        .comment(comment_id)
        .ok_or_else(|| Error::NotFound("comment".into()))?;
      (comment.chapter_id, comment.parent_id.is_some())
    };
    let owner = state
      .store
      .chapter(chapter_id)
      .map(|c| c.creator_id)
      .ok_or_else(|| Error::NotFound("chapter".into()))?;
    if owner != actor {
      return Err(Error::NotOwner(
        "only the chapter's creator can pin comments".into(),
      ));
    }
    if is_reply {
      return Err(Error::Validation("only top-level comments can be pinned".into()));
    }

    let comment = state
      .store
      .comment_mut(comment_id)
      .ok_or_else(|| Error::NotFound("comment".into()))?;
    comment.is_pinned = pinned;
    Ok(comment.clone())
  }

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Vote on a comment. A first vote creates the record and bumps a
  /// tally; a changed vote moves one unit between tallies; re-submitting
  /// the same value is a no-op that charges no vote budget. The score is
  /// recomputed with every tally change, all in one atomic unit.
  pub fn vote_comment(
    &self,
    actor: Option<Uuid>,
    comment_id: Uuid,
    value: VoteValue,
  ) -> Result<Comment> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let chapter_id = state
      .store
      .comment(comment_id)
      .filter(|c| !c.is_deleted)
      .map(|c| c.chapter_id)
      .ok_or_else(|| Error::NotFound("comment".into()))?;
    let published = state
      .store
      .chapter(chapter_id)
      .is_some_and(|c| c.is_published());
    if !published {
      return Err(Error::WrongState(
        "votes apply to published chapters only".into(),
      ));
    }

    state.limiter.check_vote(actor, now)?;

    let previous = state.store.vote(comment_id, actor).map(|v| v.value);
    match previous {
      Some(existing) if existing == value => {
        // Idempotent revote: nothing changes, nothing is charged.
        let comment = state
          .store
          .comment(comment_id)
          .cloned()
          .ok_or_else(|| Error::NotFound("comment".into()))?;
        return Ok(comment);
      }
      Some(old) => {
        if let Some(vote) = state.store.vote_mut(comment_id, actor) {
          vote.value = value;
          vote.created_at = now;
        }
        let comment = state
          .store
          .comment_mut(comment_id)
          .ok_or_else(|| Error::NotFound("comment".into()))?;
        match old {
          VoteValue::Up => comment.upvotes -= 1,
          VoteValue::Down => comment.downvotes -= 1,
        }
        apply_vote(comment, value);
      }
      None => {
        state.store.insert_vote(CommentVote {
          comment_id,
          voter_id: actor,
          value,
          created_at: now,
        });
        let comment = state
          .store
          .comment_mut(comment_id)
          .ok_or_else(|| Error::NotFound("comment".into()))?;
        apply_vote(comment, value);
      }
    }
    state.limiter.charge_vote(actor, now);

    state
      .store
      .comment(comment_id)
      .cloned()
      .ok_or_else(|| Error::NotFound("comment".into()))
  }

  // ── Reactions ─────────────────────────────────────────────────────────

  /// Append a reaction. Reactions are never deduplicated per actor; the
  /// cooldown is the only brake.
  pub fn add_reaction(
    &self,
    actor: Option<Uuid>,
    chapter_id: Uuid,
    page_number: u32,
    emoji: &str,
  ) -> Result<Reaction> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let (series_id, status, page_count) = {
      let chapter = state
        .store
        .chapter(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      (chapter.series_id, chapter.status, chapter.page_count)
    };
    if status != ChapterStatus::Published {
      return Err(Error::WrongState(
        "reactions are allowed on published chapters only".into(),
      ));
    }

    state.limiter.check_reaction(actor, now)?;

    if page_number < 1 || page_number > page_count {
      return Err(Error::Validation(format!(
        "page {page_number} is not part of this chapter"
      )));
    }
    let emoji = emoji.trim();
    if emoji.is_empty() {
      return Err(Error::Validation("reaction emoji is required".into()));
    }

    let reaction = Reaction {
      reaction_id: Uuid::new_v4(),
      chapter_id,
      series_id,
      page_number,
      actor_id: actor,
      emoji: emoji.to_owned(),
      created_at: now,
    };
    state.store.insert_reaction(reaction.clone());
    if let Some(chapter) = state.store.chapter_mut(chapter_id) {
      chapter.reaction_count += 1;
    }
    state.limiter.charge_reaction(actor, now);
    Ok(reaction)
  }

  // ── Reports ───────────────────────────────────────────────────────────

  /// File a moderation report. Not rate limited; always succeeds for an
  /// authenticated, non-suspended actor. The target reference is stored
  /// as-is and never dereferenced here.
  pub fn report(
    &self,
    actor: Option<Uuid>,
    target: ReportTarget,
    reason: &str,
    details: Option<String>,
  ) -> Result<Report> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let report = Report {
      report_id: Uuid::new_v4(),
      reporter_id: actor,
      target,
      reason: reason.trim().to_owned(),
      details,
      status: ReportStatus::Open,
      created_at: now,
    };
    state.store.push_report(report.clone());
    Ok(report)
  }

  // ── Thread read ───────────────────────────────────────────────────────

  /// The comment thread of one page: ordered top-level comments plus
  /// reply groups keyed by parent, each group oldest-first. Soft-deleted
  /// top-level comments are dropped; soft-deleted replies stay in their
  /// groups for the renderer to tombstone.
  pub fn page_thread(&self, chapter_id: Uuid, page_number: u32, sort: ThreadSort) -> PageThread {
    let state = self.read();

    let mut top_level: Vec<Comment> = state
      .store
      .comments_on_page(chapter_id, page_number)
      .filter(|c| !c.is_deleted && c.parent_id.is_none())
      .cloned()
      .collect();
    match sort {
      ThreadSort::New => top_level.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
      ThreadSort::Top => top_level.sort_by(|a, b| {
        b.is_pinned
          .cmp(&a.is_pinned)
          .then(b.score.cmp(&a.score))
          .then(b.created_at.cmp(&a.created_at))
      }),
    }

    let mut thread = PageThread {
      comments:          top_level,
      replies_by_parent: Default::default(),
    };
    for reply in state
      .store
      .comments_on_page(chapter_id, page_number)
      .filter(|c| c.parent_id.is_some())
    {
      if let Some(parent) = reply.parent_id {
        thread
          .replies_by_parent
          .entry(parent)
          .or_default()
          .push(reply.clone());
      }
    }
    for replies in thread.replies_by_parent.values_mut() {
      replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    }
    thread
  }
}

fn apply_vote(comment: &mut Comment, value: VoteValue) {
  match value {
    VoteValue::Up => comment.upvotes += 1,
    VoteValue::Down => comment.downvotes += 1,
  }
  comment.score = comment.upvotes as i64 - comment.downvotes as i64;
}
