//! Engine tests against a manual clock.
//!
//! Every test drives the public engine API; time-dependent behavior
//! (cooldowns, vote windows, recency, badges) is exercised by advancing
//! the clock explicitly.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone as _, Utc};
use inkline_core::{
  ErrorKind,
  account::{Account, IdentityProvider},
  content::{
    Chapter, ChapterDraftInput, ChapterStatus, ReadingDirection, ReadingLayout, Series,
    SeriesInput, SeriesStatus,
  },
  engagement::{ThreadSort, VoteValue},
  limits::MAX_PAGES_PER_CHAPTER,
  moderation::{ReportStatus, ReportTarget, ReportTargetKind},
  notify::NotificationKind,
  ranking::{FeedKind, RankingEntry, RankingKind, RankingPeriod, RankingRollup},
};
use uuid::Uuid;

use crate::{clock::ManualClock, engine::Engine, ranking::feed_score};

fn start() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn harness() -> (Engine, Arc<ManualClock>) {
  let clock = Arc::new(ManualClock::starting_at(start()));
  let engine = Engine::with_clock(clock.clone());
  (engine, clock)
}

fn login(engine: &Engine) -> Account {
  engine
    .login(IdentityProvider::Google, &Uuid::new_v4().to_string())
    .expect("login")
}

fn series_input(title: &str) -> SeriesInput {
  SeriesInput {
    title:            title.to_owned(),
    description:      "a story".to_owned(),
    tags:             vec!["action".to_owned()],
    language:         "en".to_owned(),
    is_mature:        false,
    content_warnings: Vec::new(),
    cover_ref:        "cover/1".to_owned(),
    layout:           ReadingLayout::Manga(ReadingDirection::Rtl),
  }
}

/// Creator + series + draft chapter with `pages` pages.
fn draft(engine: &Engine, pages: usize) -> (Account, Uuid, Uuid) {
  let creator = login(engine);
  let series = engine
    .create_series(Some(creator.account_id), series_input("Ink Trials"))
    .expect("series");
  let chapter = engine
    .create_chapter_draft(
      Some(creator.account_id),
      series.series_id,
      ChapterDraftInput {
        chapter_number: 1,
        title:          None,
        notes:          None,
      },
    )
    .expect("draft");
  for i in 0..pages {
    engine
      .add_page_to_draft(Some(creator.account_id), chapter.chapter_id, &format!("asset/{i}"))
      .expect("page");
  }
  (creator, series.series_id, chapter.chapter_id)
}

/// Same as [`draft`], published.
fn published(engine: &Engine, pages: usize) -> (Account, Uuid, Uuid) {
  let (creator, series_id, chapter_id) = draft(engine, pages);
  engine
    .publish_chapter(Some(creator.account_id), chapter_id)
    .expect("publish");
  (creator, series_id, chapter_id)
}

fn chapter_of(engine: &Engine, viewer: Uuid, chapter_id: Uuid) -> Chapter {
  engine.chapter(Some(viewer), chapter_id).expect("chapter")
}

// ─── Lifecycle: publish state machine ────────────────────────────────────────

#[test]
fn published_status_iff_publish_timestamp() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 1);
  let actor = Some(creator.account_id);

  let c = chapter_of(&engine, creator.account_id, chapter_id);
  assert_eq!(c.status, ChapterStatus::Draft);
  assert!(c.published_at.is_none());

  let c = engine.publish_chapter(actor, chapter_id).unwrap();
  assert_eq!(c.status, ChapterStatus::Published);
  assert_eq!(c.published_at, Some(start()));

  let c = engine.unpublish_chapter(actor, chapter_id).unwrap();
  assert_eq!(c.status, ChapterStatus::Draft);
  assert!(c.published_at.is_none());
}

#[test]
fn publish_with_zero_pages_fails() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 0);

  let err = engine
    .publish_chapter(Some(creator.account_id), chapter_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn publish_succeeds_exactly_once() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 1);
  let actor = Some(creator.account_id);

  assert!(engine.publish_chapter(actor, chapter_id).is_ok());
  let err = engine.publish_chapter(actor, chapter_id).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::WrongState);
}

#[test]
fn publish_requires_ownership() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = draft(&engine, 1);
  let stranger = login(&engine);

  let err = engine
    .publish_chapter(Some(stranger.account_id), chapter_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotOwner);
}

#[test]
fn publish_notifies_every_follower() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 1);
  let fan_a = login(&engine);
  let fan_b = login(&engine);
  let bystander = login(&engine);
  engine.follow(Some(fan_a.account_id), creator.account_id).unwrap();
  engine.follow(Some(fan_b.account_id), creator.account_id).unwrap();

  engine.publish_chapter(Some(creator.account_id), chapter_id).unwrap();

  for fan in [&fan_a, &fan_b] {
    let inbox = engine.notifications(Some(fan.account_id)).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::NewChapter);
    assert!(!inbox[0].is_read);
  }
  assert!(engine.notifications(Some(bystander.account_id)).unwrap().is_empty());
}

#[test]
fn suspended_actor_is_rejected_before_anything_else() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 1);
  engine.set_account_suspended(creator.account_id, true).unwrap();

  let err = engine
    .publish_chapter(Some(creator.account_id), chapter_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Suspended);
}

#[test]
fn missing_actor_is_unauthenticated() {
  let (engine, _) = harness();
  let err = engine.create_series(None, series_input("Nope")).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Unauthenticated);

  let err = engine
    .create_series(Some(Uuid::new_v4()), series_input("Nope"))
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Unauthenticated);
}

// ─── Lifecycle: pages ────────────────────────────────────────────────────────

#[test]
fn draft_pages_stay_dense_after_adds() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 3);

  let pages = engine
    .chapter_pages(Some(creator.account_id), chapter_id)
    .unwrap();
  let numbers: Vec<u32> = pages.iter().map(|p| p.page_number).collect();
  assert_eq!(numbers, vec![1, 2, 3]);
  assert_eq!(chapter_of(&engine, creator.account_id, chapter_id).page_count, 3);
}

#[test]
fn page_limit_is_enforced() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, MAX_PAGES_PER_CHAPTER);
  let actor = Some(creator.account_id);

  let err = engine
    .add_page_to_draft(actor, chapter_id, "asset/overflow")
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
  assert_eq!(
    chapter_of(&engine, creator.account_id, chapter_id).page_count,
    MAX_PAGES_PER_CHAPTER as u32
  );
}

#[test]
fn published_chapter_rejects_new_pages() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = published(&engine, 1);

  let err = engine
    .add_page_to_draft(Some(creator.account_id), chapter_id, "asset/late")
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::WrongState);
}

#[test]
fn reorder_applies_the_submitted_order() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 3);
  let actor = Some(creator.account_id);

  let pages = engine.chapter_pages(actor, chapter_id).unwrap();
  let (a, b, c) = (pages[0].page_id, pages[1].page_id, pages[2].page_id);

  let reordered = engine
    .reorder_draft_pages(actor, chapter_id, &[c, a, b])
    .unwrap();
  let got: Vec<(Uuid, u32)> = reordered.iter().map(|p| (p.page_id, p.page_number)).collect();
  assert_eq!(got, vec![(c, 1), (a, 2), (b, 3)]);
}

#[test]
fn reorder_with_missing_page_fails_and_changes_nothing() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 3);
  let actor = Some(creator.account_id);

  let pages = engine.chapter_pages(actor, chapter_id).unwrap();
  let err = engine
    .reorder_draft_pages(actor, chapter_id, &[pages[2].page_id, pages[0].page_id])
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let after = engine.chapter_pages(actor, chapter_id).unwrap();
  let numbers: Vec<(Uuid, u32)> = after.iter().map(|p| (p.page_id, p.page_number)).collect();
  let expected: Vec<(Uuid, u32)> = pages.iter().map(|p| (p.page_id, p.page_number)).collect();
  assert_eq!(numbers, expected);
}

#[test]
fn reorder_with_foreign_page_fails_not_found() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 2);
  let actor = Some(creator.account_id);

  let pages = engine.chapter_pages(actor, chapter_id).unwrap();
  let err = engine
    .reorder_draft_pages(actor, chapter_id, &[pages[0].page_id, Uuid::new_v4()])
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn reorder_with_duplicate_page_fails_validation() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 2);
  let actor = Some(creator.account_id);

  let pages = engine.chapter_pages(actor, chapter_id).unwrap();
  let err = engine
    .reorder_draft_pages(actor, chapter_id, &[pages[0].page_id, pages[0].page_id])
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn reorder_is_locked_after_publish() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = published(&engine, 2);
  let actor = Some(creator.account_id);

  let pages = engine.chapter_pages(actor, chapter_id).unwrap();
  let err = engine
    .reorder_draft_pages(actor, chapter_id, &[pages[1].page_id, pages[0].page_id])
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::WrongState);
}

#[test]
fn replace_asset_swaps_only_the_reference() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = published(&engine, 2);
  let actor = Some(creator.account_id);

  let page = engine
    .replace_page_asset(actor, chapter_id, 2, "asset/corrected")
    .unwrap();
  assert_eq!(page.page_number, 2);
  assert_eq!(page.asset_ref, "asset/corrected");
  assert_eq!(chapter_of(&engine, creator.account_id, chapter_id).page_count, 2);

  let err = engine
    .replace_page_asset(actor, chapter_id, 9, "asset/nowhere")
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn replace_asset_requires_published() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 1);

  let err = engine
    .replace_page_asset(Some(creator.account_id), chapter_id, 1, "asset/x")
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::WrongState);
}

#[test]
fn drafts_are_invisible_to_strangers() {
  let (engine, _) = harness();
  let (creator, series_id, chapter_id) = draft(&engine, 1);
  let stranger = login(&engine);

  assert!(engine.chapter(Some(creator.account_id), chapter_id).is_ok());
  let err = engine.chapter(Some(stranger.account_id), chapter_id).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  let visible = engine
    .chapters_of_series(Some(stranger.account_id), series_id)
    .unwrap();
  assert!(visible.is_empty());
  let own = engine
    .chapters_of_series(Some(creator.account_id), series_id)
    .unwrap();
  assert_eq!(own.len(), 1);
}

// ─── Unpublish and engagement ────────────────────────────────────────────────

#[test]
fn unpublish_blocked_by_comment_even_after_soft_delete() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = published(&engine, 1);
  let reader = login(&engine);

  let comment = engine
    .add_comment(Some(reader.account_id), chapter_id, 1, "first!", None)
    .unwrap();
  let err = engine
    .unpublish_chapter(Some(creator.account_id), chapter_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  // The record survives soft deletion, so the block stands.
  engine
    .delete_comment(Some(reader.account_id), comment.comment_id)
    .unwrap();
  let err = engine
    .unpublish_chapter(Some(creator.account_id), chapter_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn unpublish_blocked_by_any_reaction() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = published(&engine, 1);
  let reader = login(&engine);

  engine
    .add_reaction(Some(reader.account_id), chapter_id, 1, "🔥")
    .unwrap();
  let err = engine
    .unpublish_chapter(Some(creator.account_id), chapter_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[test]
fn comments_require_a_published_chapter() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = draft(&engine, 1);

  let err = engine
    .add_comment(Some(creator.account_id), chapter_id, 1, "too early", None)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::WrongState);
}

#[test]
fn comment_cooldown_bumps_the_counter_exactly_once() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let reader = login(&engine);
  let actor = Some(reader.account_id);

  assert!(engine.add_comment(actor, chapter_id, 1, "one", None).is_ok());
  let err = engine.add_comment(actor, chapter_id, 1, "two", None).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::RateLimited);
  assert_eq!(engine.chapter(actor, chapter_id).unwrap().comment_count, 1);

  clock.advance(Duration::seconds(8));
  assert!(engine.add_comment(actor, chapter_id, 1, "two", None).is_ok());
  assert_eq!(engine.chapter(actor, chapter_id).unwrap().comment_count, 2);
}

#[test]
fn comment_body_is_validated() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let reader = login(&engine);
  let actor = Some(reader.account_id);

  let err = engine.add_comment(actor, chapter_id, 1, "   ", None).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let long = "x".repeat(141);
  let err = engine.add_comment(actor, chapter_id, 1, &long, None).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let max = "x".repeat(140);
  assert!(engine.add_comment(actor, chapter_id, 1, &max, None).is_ok());
}

#[test]
fn comment_page_must_exist_in_the_chapter() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 2);
  let reader = login(&engine);

  let err = engine
    .add_comment(Some(reader.account_id), chapter_id, 3, "ghost page", None)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn replies_nest_exactly_one_level() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let alice = login(&engine);
  let bob = login(&engine);

  let top = engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "top", None)
    .unwrap();
  let reply = engine
    .add_comment(Some(bob.account_id), chapter_id, 1, "reply", Some(top.comment_id))
    .unwrap();

  clock.advance(Duration::seconds(8));
  let err = engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "deeper", Some(reply.comment_id))
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let err = engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "orphan", Some(Uuid::new_v4()))
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn reply_parent_must_share_the_chapter() {
  let (engine, _) = harness();
  let (_, _, chapter_a) = published(&engine, 1);
  let (_, _, chapter_b) = published(&engine, 1);
  let alice = login(&engine);
  let bob = login(&engine);

  let parent = engine
    .add_comment(Some(alice.account_id), chapter_a, 1, "over here", None)
    .unwrap();
  let err = engine
    .add_comment(Some(bob.account_id), chapter_b, 1, "over there", Some(parent.comment_id))
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn reply_notifies_parent_author_but_not_self_replies() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let alice = login(&engine);
  let bob = login(&engine);

  let top = engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "top", None)
    .unwrap();
  engine
    .add_comment(Some(bob.account_id), chapter_id, 1, "reply", Some(top.comment_id))
    .unwrap();

  let inbox = engine.notifications(Some(alice.account_id)).unwrap();
  assert_eq!(inbox.len(), 1);
  assert_eq!(inbox[0].kind, NotificationKind::Reply);

  // A self-reply stays silent.
  clock.advance(Duration::seconds(8));
  engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "me again", Some(top.comment_id))
    .unwrap();
  assert_eq!(engine.notifications(Some(alice.account_id)).unwrap().len(), 1);
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[test]
fn same_value_revote_is_idempotent() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let author = login(&engine);
  let voter = login(&engine);

  let comment = engine
    .add_comment(Some(author.account_id), chapter_id, 1, "vote me", None)
    .unwrap();

  let first = engine
    .vote_comment(Some(voter.account_id), comment.comment_id, VoteValue::Up)
    .unwrap();
  let second = engine
    .vote_comment(Some(voter.account_id), comment.comment_id, VoteValue::Up)
    .unwrap();

  assert_eq!((first.upvotes, first.downvotes, first.score), (1, 0, 1));
  assert_eq!((second.upvotes, second.downvotes, second.score), (1, 0, 1));
}

#[test]
fn changing_a_vote_moves_exactly_one_unit() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let author = login(&engine);
  let voter = login(&engine);

  let comment = engine
    .add_comment(Some(author.account_id), chapter_id, 1, "flip me", None)
    .unwrap();
  let up = engine
    .vote_comment(Some(voter.account_id), comment.comment_id, VoteValue::Up)
    .unwrap();
  assert_eq!((up.upvotes, up.downvotes, up.score), (1, 0, 1));

  let down = engine
    .vote_comment(Some(voter.account_id), comment.comment_id, VoteValue::Down)
    .unwrap();
  assert_eq!((down.upvotes, down.downvotes, down.score), (0, 1, -1));
  assert_eq!(down.score, up.score - 2);
}

#[test]
fn collapse_tracks_the_live_score() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let author = login(&engine);
  let comment = engine
    .add_comment(Some(author.account_id), chapter_id, 1, "contested", None)
    .unwrap();

  let mut latest = comment;
  for _ in 0..5 {
    let critic = login(&engine);
    latest = engine
      .vote_comment(Some(critic.account_id), latest.comment_id, VoteValue::Down)
      .unwrap();
  }
  assert_eq!(latest.score, -5);
  assert!(latest.is_collapsed());

  let fan = login(&engine);
  let latest = engine
    .vote_comment(Some(fan.account_id), latest.comment_id, VoteValue::Up)
    .unwrap();
  assert_eq!(latest.score, -4);
  assert!(!latest.is_collapsed());
}

#[test]
fn votes_on_deleted_comments_fail() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let author = login(&engine);
  let voter = login(&engine);

  let comment = engine
    .add_comment(Some(author.account_id), chapter_id, 1, "fleeting", None)
    .unwrap();
  engine
    .delete_comment(Some(author.account_id), comment.comment_id)
    .unwrap();

  let err = engine
    .vote_comment(Some(voter.account_id), comment.comment_id, VoteValue::Up)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn vote_window_throttles_but_noops_are_free() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let voter = login(&engine);

  // One comment per author so the comment cooldown never interferes.
  let mut comments = Vec::new();
  for _ in 0..21 {
    let author = login(&engine);
    comments.push(
      engine
        .add_comment(Some(author.account_id), chapter_id, 1, "hi", None)
        .unwrap(),
    );
  }

  for comment in comments.iter().take(19) {
    engine
      .vote_comment(Some(voter.account_id), comment.comment_id, VoteValue::Up)
      .unwrap();
  }

  // A same-value revote is a no-op and must not consume budget.
  engine
    .vote_comment(Some(voter.account_id), comments[0].comment_id, VoteValue::Up)
    .unwrap();

  // The 20th distinct vote still fits the per-minute window.
  engine
    .vote_comment(Some(voter.account_id), comments[19].comment_id, VoteValue::Up)
    .unwrap();

  let err = engine
    .vote_comment(Some(voter.account_id), comments[20].comment_id, VoteValue::Up)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::RateLimited);
}

// ─── Thread reads ────────────────────────────────────────────────────────────

#[test]
fn thread_orders_top_by_pin_then_score_then_recency() {
  let (engine, clock) = harness();
  let (creator, _, chapter_id) = published(&engine, 1);

  let alice = login(&engine);
  let bob = login(&engine);
  let carol = login(&engine);

  let older = engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "older", None)
    .unwrap();
  clock.advance(Duration::seconds(10));
  let newer = engine
    .add_comment(Some(bob.account_id), chapter_id, 1, "newer", None)
    .unwrap();
  clock.advance(Duration::seconds(10));
  let pinned = engine
    .add_comment(Some(carol.account_id), chapter_id, 1, "pinned", None)
    .unwrap();

  // Upvote "older" so score outranks recency for the unpinned pair.
  let fan = login(&engine);
  engine
    .vote_comment(Some(fan.account_id), older.comment_id, VoteValue::Up)
    .unwrap();
  engine
    .set_comment_pinned(Some(creator.account_id), pinned.comment_id, true)
    .unwrap();

  let thread = engine.page_thread(chapter_id, 1, ThreadSort::Top);
  let order: Vec<Uuid> = thread.comments.iter().map(|c| c.comment_id).collect();
  assert_eq!(order, vec![pinned.comment_id, older.comment_id, newer.comment_id]);

  let thread = engine.page_thread(chapter_id, 1, ThreadSort::New);
  let order: Vec<Uuid> = thread.comments.iter().map(|c| c.comment_id).collect();
  assert_eq!(order, vec![pinned.comment_id, newer.comment_id, older.comment_id]);
}

#[test]
fn thread_groups_replies_oldest_first_and_hides_deleted_top_level() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let alice = login(&engine);
  let bob = login(&engine);
  let carol = login(&engine);

  let top = engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "top", None)
    .unwrap();
  let gone = engine
    .add_comment(Some(bob.account_id), chapter_id, 1, "soon gone", None)
    .unwrap();
  let first_reply = engine
    .add_comment(Some(carol.account_id), chapter_id, 1, "reply 1", Some(top.comment_id))
    .unwrap();
  clock.advance(Duration::seconds(10));
  let second_reply = engine
    .add_comment(Some(carol.account_id), chapter_id, 1, "reply 2", Some(top.comment_id))
    .unwrap();

  engine.delete_comment(Some(bob.account_id), gone.comment_id).unwrap();
  // Soft-deleted replies stay in their group for tombstoning.
  engine
    .delete_comment(Some(carol.account_id), first_reply.comment_id)
    .unwrap();

  let thread = engine.page_thread(chapter_id, 1, ThreadSort::Top);
  assert_eq!(thread.comments.len(), 1);
  assert_eq!(thread.comments[0].comment_id, top.comment_id);

  let replies = &thread.replies_by_parent[&top.comment_id];
  let ids: Vec<Uuid> = replies.iter().map(|r| r.comment_id).collect();
  assert_eq!(ids, vec![first_reply.comment_id, second_reply.comment_id]);
  assert!(replies[0].is_deleted);
}

#[test]
fn pinning_is_chapter_owner_only_and_top_level_only() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = published(&engine, 1);
  let alice = login(&engine);
  let bob = login(&engine);

  let top = engine
    .add_comment(Some(alice.account_id), chapter_id, 1, "top", None)
    .unwrap();
  let reply = engine
    .add_comment(Some(bob.account_id), chapter_id, 1, "reply", Some(top.comment_id))
    .unwrap();

  let err = engine
    .set_comment_pinned(Some(alice.account_id), top.comment_id, true)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotOwner);

  let err = engine
    .set_comment_pinned(Some(creator.account_id), reply.comment_id, true)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

// ─── Reactions ───────────────────────────────────────────────────────────────

#[test]
fn reactions_append_without_dedup_under_cooldown() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let reader = login(&engine);
  let actor = Some(reader.account_id);

  engine.add_reaction(actor, chapter_id, 1, "🔥").unwrap();
  let err = engine.add_reaction(actor, chapter_id, 1, "🔥").unwrap_err();
  assert_eq!(err.kind(), ErrorKind::RateLimited);

  clock.advance(Duration::seconds(1));
  engine.add_reaction(actor, chapter_id, 1, "🔥").unwrap();
  assert_eq!(engine.chapter(actor, chapter_id).unwrap().reaction_count, 2);
}

#[test]
fn rejected_reaction_leaves_no_trace() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);
  let reader = login(&engine);
  let actor = Some(reader.account_id);

  engine.add_reaction(actor, chapter_id, 1, "🔥").unwrap();
  let before = engine.chapter(actor, chapter_id).unwrap().reaction_count;
  let _ = engine.add_reaction(actor, chapter_id, 1, "😭").unwrap_err();
  assert_eq!(engine.chapter(actor, chapter_id).unwrap().reaction_count, before);
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[test]
fn reports_always_succeed_for_live_actors() {
  let (engine, _) = harness();
  let (_, series_id, _) = published(&engine, 1);
  let reader = login(&engine);

  let report = engine
    .report(
      Some(reader.account_id),
      ReportTarget {
        kind: ReportTargetKind::Series,
        id:   series_id,
      },
      "spoilers in the description",
      None,
    )
    .unwrap();
  assert_eq!(report.status, ReportStatus::Open);
  assert_eq!(engine.read().store.reports().len(), 1);
}

// ─── Overlay stream ──────────────────────────────────────────────────────────

#[test]
fn overlay_is_bounded_and_newest_first() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);

  for i in 0..15 {
    let reader = login(&engine);
    engine
      .add_comment(Some(reader.account_id), chapter_id, 1, &format!("c{i}"), None)
      .unwrap();
    clock.advance(Duration::seconds(1));
  }

  let overlay = engine.overlay(chapter_id, 1);
  assert_eq!(overlay.comments.len(), 12);
  assert_eq!(overlay.comments[0].body, "c14");
  assert_eq!(overlay.comments[11].body, "c3");
}

#[test]
fn reacting_now_counts_distinct_actors_over_the_full_window() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);

  // 30 distinct actors react within the window: more than the returned
  // sample, all of them counted.
  for _ in 0..30 {
    let reader = login(&engine);
    engine
      .add_reaction(Some(reader.account_id), chapter_id, 1, "👏")
      .unwrap();
  }
  // The same actor twice only counts once.
  let repeat = login(&engine);
  engine.add_reaction(Some(repeat.account_id), chapter_id, 1, "🔥").unwrap();
  clock.advance(Duration::seconds(1));
  engine.add_reaction(Some(repeat.account_id), chapter_id, 1, "🔥").unwrap();

  let overlay = engine.overlay(chapter_id, 1);
  assert_eq!(overlay.reactions.len(), 24);
  assert_eq!(overlay.reacting_now, 31);

  clock.advance(Duration::seconds(31));
  let overlay = engine.overlay(chapter_id, 1);
  assert_eq!(overlay.reacting_now, 0);
  assert_eq!(overlay.reactions.len(), 24);
}

// ─── Discovery & ranking ─────────────────────────────────────────────────────

fn bare_series(creator_id: Uuid, rating: f64) -> Series {
  Series {
    series_id: Uuid::new_v4(),
    creator_id,
    title: "Bench".to_owned(),
    description: String::new(),
    tags: Vec::new(),
    language: "en".to_owned(),
    is_mature: false,
    content_warnings: Vec::new(),
    cover_ref: "cover/x".to_owned(),
    layout: ReadingLayout::Scroll,
    status: SeriesStatus::Active,
    average_rating: rating,
    rating_count: 1,
    created_at: start(),
    updated_at: start(),
  }
}

#[test]
fn feed_score_matches_the_worked_example() {
  let creator_id = Uuid::new_v4();
  let series = bare_series(creator_id, 4.0);
  let published_at = start();
  let now = start() + Duration::hours(24);

  let chapter = Chapter {
    chapter_id: Uuid::new_v4(),
    series_id: series.series_id,
    creator_id,
    chapter_number: 1,
    title: None,
    notes: None,
    status: ChapterStatus::Published,
    published_at: Some(published_at),
    page_count: 10,
    comment_count: 10,
    reaction_count: 50,
    view_count: 1000,
    created_at: published_at,
    updated_at: published_at,
  };

  // 1000*0.003 + 10*2 + 50*0.4 + 4.0*8 + 200*0.03 + 24/24 = 82
  let score = feed_score(&chapter, &series, 200, now);
  assert!((score - 82.0).abs() < 1e-9, "score was {score}");
}

#[test]
fn missing_publish_timestamp_counts_as_72_hours() {
  let creator_id = Uuid::new_v4();
  let series = bare_series(creator_id, 0.0);
  let chapter = Chapter {
    chapter_id: Uuid::new_v4(),
    series_id: series.series_id,
    creator_id,
    chapter_number: 1,
    title: None,
    notes: None,
    status: ChapterStatus::Published,
    published_at: None,
    page_count: 1,
    comment_count: 0,
    reaction_count: 0,
    view_count: 0,
    created_at: start(),
    updated_at: start(),
  };
  let score = feed_score(&chapter, &series, 0, start());
  assert!((score - 24.0 / 72.0).abs() < 1e-9);
}

#[test]
fn fresh_busy_chapter_carries_both_badges() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);

  // Enough comments to push the feed score past the trending threshold.
  for _ in 0..36 {
    let reader = login(&engine);
    engine
      .add_comment(Some(reader.account_id), chapter_id, 1, "hype", None)
      .unwrap();
  }
  clock.advance(Duration::hours(1));

  let feed = engine.home_feed(FeedKind::Trending);
  let item = feed.iter().find(|i| i.chapter_id == chapter_id).unwrap();
  assert!(item.badges.contains(&inkline_core::ranking::Badge::New));
  assert!(item.badges.contains(&inkline_core::ranking::Badge::Trending));
}

#[test]
fn stale_quiet_chapter_carries_no_badges() {
  let (engine, clock) = harness();
  let (_, _, chapter_id) = published(&engine, 1);

  clock.advance(Duration::hours(49));
  let feed = engine.home_feed(FeedKind::New);
  let item = feed.iter().find(|i| i.chapter_id == chapter_id).unwrap();
  assert!(item.badges.is_empty());
}

#[test]
fn feeds_only_ever_contain_published_chapters() {
  let (engine, _) = harness();
  let (_, _, published_id) = published(&engine, 1);
  let (_, _, draft_id) = draft(&engine, 1);

  for kind in [
    FeedKind::Trending,
    FeedKind::New,
    FeedKind::Rising,
    FeedKind::MostDiscussed,
  ] {
    let feed = engine.home_feed(kind);
    assert!(feed.iter().any(|i| i.chapter_id == published_id));
    assert!(feed.iter().all(|i| i.chapter_id != draft_id));
  }
}

#[test]
fn feed_variants_order_by_their_own_signal() {
  let (engine, clock) = harness();

  // "loud": more comments. "backed": bigger audience.
  let (_, _, loud) = published(&engine, 1);
  clock.advance(Duration::hours(1));
  let (backed_creator, _, backed) = published(&engine, 1);

  for _ in 0..3 {
    let reader = login(&engine);
    engine
      .add_comment(Some(reader.account_id), loud, 1, "talk", None)
      .unwrap();
  }
  for _ in 0..5 {
    let fan = login(&engine);
    engine.follow(Some(fan.account_id), backed_creator.account_id).unwrap();
  }

  let most_discussed = engine.home_feed(FeedKind::MostDiscussed);
  assert_eq!(most_discussed[0].chapter_id, loud);

  // Rising: loud = 3, backed = 5 * 1.4 = 7.
  let rising = engine.home_feed(FeedKind::Rising);
  assert_eq!(rising[0].chapter_id, backed);

  // New: latest publish first.
  let newest = engine.home_feed(FeedKind::New);
  assert_eq!(newest[0].chapter_id, backed);
}

#[test]
fn search_matches_title_creator_and_tags() {
  let (engine, _) = harness();
  let creator = login(&engine);
  let series = engine
    .create_series(
      Some(creator.account_id),
      SeriesInput {
        tags: vec!["isekai".to_owned(), "comfy".to_owned()],
        ..series_input("Moonlit Courier")
      },
    )
    .unwrap();
  let chapter = engine
    .create_chapter_draft(
      Some(creator.account_id),
      series.series_id,
      ChapterDraftInput {
        chapter_number: 1,
        title:          None,
        notes:          None,
      },
    )
    .unwrap();
  engine
    .add_page_to_draft(Some(creator.account_id), chapter.chapter_id, "asset/0")
    .unwrap();
  engine
    .publish_chapter(Some(creator.account_id), chapter.chapter_id)
    .unwrap();

  assert_eq!(engine.search("moonlit", &[]).len(), 1);
  assert_eq!(engine.search(&creator.username, &[]).len(), 1);
  assert_eq!(engine.search("", &["isekai".to_owned()]).len(), 1);
  assert_eq!(
    engine
      .search("", &["isekai".to_owned(), "space".to_owned()])
      .len(),
    0
  );
  assert_eq!(engine.search("no such thing", &[]).len(), 0);
}

#[test]
fn rankings_resolve_rollups_and_drop_dead_references() {
  let (engine, _) = harness();
  let (_, _, chapter_id) = published(&engine, 1);

  engine.install_rollup(RankingRollup {
    period:      RankingPeriod::Week,
    kind:        RankingKind::Trending,
    entries:     vec![
      RankingEntry {
        chapter_id,
        score: 99.5,
        rank:  1,
      },
      RankingEntry {
        chapter_id: Uuid::new_v4(),
        score:      55.0,
        rank:       2,
      },
    ],
    computed_at: start(),
  });

  let rows = engine.rankings(RankingPeriod::Week, RankingKind::Trending);
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].chapter.chapter_id, chapter_id);
  assert_eq!(rows[0].rank, 1);
  assert!((rows[0].score - 99.5).abs() < f64::EPSILON);
}

#[test]
fn rankings_degrade_to_a_live_scoreboard_without_a_rollup() {
  let (engine, _) = harness();
  let (_, _, quiet) = published(&engine, 1);
  let (_, _, busy) = published(&engine, 1);
  let reader = login(&engine);
  engine
    .add_comment(Some(reader.account_id), busy, 1, "hello", None)
    .unwrap();

  let rows = engine.rankings(RankingPeriod::Month, RankingKind::TopRated);
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].chapter.chapter_id, busy);
  assert_eq!(rows[0].rank, 1);
  assert_eq!(rows[1].chapter.chapter_id, quiet);
  assert_eq!(rows[1].rank, 2);
}

// ─── Accounts, follows, notifications ────────────────────────────────────────

#[test]
fn login_creates_then_fetches_by_identity_pair() {
  let (engine, _) = harness();
  let first = engine.login(IdentityProvider::Discord, "subject-1").unwrap();
  let again = engine.login(IdentityProvider::Discord, "subject-1").unwrap();
  assert_eq!(first.account_id, again.account_id);

  let other = engine.login(IdentityProvider::Discord, "subject-2").unwrap();
  assert_ne!(first.account_id, other.account_id);

  // Same subject under a different provider is a different identity.
  let cross = engine.login(IdentityProvider::Apple, "subject-1").unwrap();
  assert_ne!(first.account_id, cross.account_id);
}

#[test]
fn suspended_accounts_cannot_log_in() {
  let (engine, _) = harness();
  let account = engine.login(IdentityProvider::Google, "subject-9").unwrap();
  engine.set_account_suspended(account.account_id, true).unwrap();

  let err = engine.login(IdentityProvider::Google, "subject-9").unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Suspended);
}

#[test]
fn usernames_stay_globally_unique() {
  let (engine, _) = harness();
  let alice = login(&engine);
  let bob = login(&engine);
  engine
    .update_profile(
      Some(alice.account_id),
      inkline_core::account::ProfilePatch {
        username: Some("inkfan".to_owned()),
        ..Default::default()
      },
    )
    .unwrap();

  let err = engine
    .update_profile(
      Some(bob.account_id),
      inkline_core::account::ProfilePatch {
        username: Some("inkfan".to_owned()),
        ..Default::default()
      },
    )
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn follow_rules() {
  let (engine, _) = harness();
  let (creator, _, _) = published(&engine, 1);
  let reader = login(&engine);

  let err = engine
    .follow(Some(creator.account_id), creator.account_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let err = engine
    .follow(Some(reader.account_id), Uuid::new_v4())
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  // Following a non-creator account is also a miss.
  let plain = login(&engine);
  let err = engine
    .follow(Some(reader.account_id), plain.account_id)
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  let first = engine.follow(Some(reader.account_id), creator.account_id).unwrap();
  let second = engine.follow(Some(reader.account_id), creator.account_id).unwrap();
  assert_eq!(first.created_at, second.created_at);
  assert!(engine.is_following(reader.account_id, creator.account_id));

  engine.unfollow(Some(reader.account_id), creator.account_id).unwrap();
  assert!(!engine.is_following(reader.account_id, creator.account_id));
  // Unfollowing a missing edge stays quiet.
  engine.unfollow(Some(reader.account_id), creator.account_id).unwrap();
}

#[test]
fn mark_notifications_read_reports_the_flip_count() {
  let (engine, _) = harness();
  let (creator, series_id, chapter_id) = draft(&engine, 1);
  let fan = login(&engine);
  engine.follow(Some(fan.account_id), creator.account_id).unwrap();
  engine.publish_chapter(Some(creator.account_id), chapter_id).unwrap();

  // A second chapter brings a second notification.
  let chapter = engine
    .create_chapter_draft(
      Some(creator.account_id),
      series_id,
      ChapterDraftInput {
        chapter_number: 2,
        title:          None,
        notes:          None,
      },
    )
    .unwrap();
  engine
    .add_page_to_draft(Some(creator.account_id), chapter.chapter_id, "asset/0")
    .unwrap();
  engine
    .publish_chapter(Some(creator.account_id), chapter.chapter_id)
    .unwrap();

  assert_eq!(engine.mark_notifications_read(Some(fan.account_id)).unwrap(), 2);
  assert_eq!(engine.mark_notifications_read(Some(fan.account_id)).unwrap(), 0);
  assert!(
    engine
      .notifications(Some(fan.account_id))
      .unwrap()
      .iter()
      .all(|n| n.is_read)
  );
}

#[test]
fn record_view_counts_only_published_chapters() {
  let (engine, _) = harness();
  let (_, _, published_id) = published(&engine, 1);
  let (_, _, draft_id) = draft(&engine, 1);

  assert_eq!(engine.record_view(published_id).unwrap(), 1);
  assert_eq!(engine.record_view(published_id).unwrap(), 2);

  let err = engine.record_view(draft_id).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn creator_profile_aggregates_audience_and_stats() {
  let (engine, _) = harness();
  let (creator, _, chapter_id) = published(&engine, 1);

  let fan = login(&engine);
  engine.follow(Some(fan.account_id), creator.account_id).unwrap();
  engine.record_view(chapter_id).unwrap();
  engine.record_view(chapter_id).unwrap();
  engine
    .add_comment(Some(fan.account_id), chapter_id, 1, "nice", None)
    .unwrap();
  engine.add_reaction(Some(fan.account_id), chapter_id, 1, "💯").unwrap();

  let profile = engine.creator_profile(creator.account_id).unwrap();
  assert_eq!(profile.follower_count, 1);
  assert_eq!(profile.series.len(), 1);
  assert_eq!(profile.stats.reads, 2);
  assert_eq!(profile.stats.comments, 1);
  assert_eq!(profile.stats.reactions, 1);

  let err = engine.creator_profile(fan.account_id).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}
