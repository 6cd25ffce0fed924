//! The in-memory store and its foreign-key indexes.
//!
//! Entities live in flat maps keyed by id. Parent-to-child traversal
//! (chapter to pages, chapter to comments, creator to followers) goes
//! through index maps maintained on every write, never through lists held
//! on the parent entities. The `pages_by_chapter` index is kept in page
//! order: position `i` always holds the page numbered `i + 1`.

use std::collections::{BTreeSet, HashMap};

use inkline_core::{
  account::{Account, IdentityProvider},
  content::{Chapter, ChapterStatus, Page, Series},
  engagement::{Comment, CommentVote, Follow, Reaction},
  moderation::Report,
  notify::Notification,
  ranking::{RankingKind, RankingPeriod, RankingRollup},
};
use uuid::Uuid;

#[derive(Default)]
pub struct Store {
  // ── Entities ──────────────────────────────────────────────────────────
  accounts:  HashMap<Uuid, Account>,
  series:    HashMap<Uuid, Series>,
  chapters:  HashMap<Uuid, Chapter>,
  pages:     HashMap<Uuid, Page>,
  comments:  HashMap<Uuid, Comment>,
  /// Keyed by (comment, voter): at most one vote per pair.
  votes:     HashMap<(Uuid, Uuid), CommentVote>,
  reactions: HashMap<Uuid, Reaction>,
  /// Keyed by (follower, creator): at most one edge per pair.
  follows:   HashMap<(Uuid, Uuid), Follow>,
  reports:   Vec<Report>,
  rollups:   HashMap<(RankingPeriod, RankingKind), RankingRollup>,

  // ── Foreign-key indexes ───────────────────────────────────────────────
  accounts_by_identity:       HashMap<(IdentityProvider, String), Uuid>,
  series_by_creator:          HashMap<Uuid, Vec<Uuid>>,
  chapters_by_series:         HashMap<Uuid, Vec<Uuid>>,
  /// Kept in page order; position i holds the page numbered i + 1.
  pages_by_chapter:           HashMap<Uuid, Vec<Uuid>>,
  /// Chronological (insertion order).
  comments_by_chapter:        HashMap<Uuid, Vec<Uuid>>,
  comments_by_page:           HashMap<(Uuid, u32), Vec<Uuid>>,
  reactions_by_page:          HashMap<(Uuid, u32), Vec<Uuid>>,
  reaction_count_by_chapter:  HashMap<Uuid, usize>,
  followers_by_creator:       HashMap<Uuid, BTreeSet<Uuid>>,
  notifications_by_recipient: HashMap<Uuid, Vec<Notification>>,
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  // ── Accounts ──────────────────────────────────────────────────────────

  pub fn insert_account(&mut self, account: Account) {
    self
      .accounts_by_identity
      .insert((account.provider, account.provider_id.clone()), account.account_id);
    self.accounts.insert(account.account_id, account);
  }

  pub fn account(&self, id: Uuid) -> Option<&Account> {
    self.accounts.get(&id)
  }

  pub fn account_mut(&mut self, id: Uuid) -> Option<&mut Account> {
    self.accounts.get_mut(&id)
  }

  pub fn account_by_identity(
    &self,
    provider: IdentityProvider,
    provider_id: &str,
  ) -> Option<Uuid> {
    self
      .accounts_by_identity
      .get(&(provider, provider_id.to_owned()))
      .copied()
  }

  pub fn username_taken(&self, username: &str, excluding: Uuid) -> bool {
    self
      .accounts
      .values()
      .any(|a| a.account_id != excluding && a.username == username)
  }

  pub fn accounts(&self) -> impl Iterator<Item = &Account> {
    self.accounts.values()
  }

  // ── Series ────────────────────────────────────────────────────────────

  pub fn insert_series(&mut self, series: Series) {
    self
      .series_by_creator
      .entry(series.creator_id)
      .or_default()
      .push(series.series_id);
    self.series.insert(series.series_id, series);
  }

  pub fn series(&self, id: Uuid) -> Option<&Series> {
    self.series.get(&id)
  }

  pub fn series_mut(&mut self, id: Uuid) -> Option<&mut Series> {
    self.series.get_mut(&id)
  }

  pub fn series_of_creator(&self, creator: Uuid) -> Vec<&Series> {
    self
      .series_by_creator
      .get(&creator)
      .into_iter()
      .flatten()
      .filter_map(|id| self.series.get(id))
      .collect()
  }

  pub fn all_series(&self) -> impl Iterator<Item = &Series> {
    self.series.values()
  }

  // ── Chapters ──────────────────────────────────────────────────────────

  pub fn insert_chapter(&mut self, chapter: Chapter) {
    self
      .chapters_by_series
      .entry(chapter.series_id)
      .or_default()
      .push(chapter.chapter_id);
    self.chapters.insert(chapter.chapter_id, chapter);
  }

  pub fn chapter(&self, id: Uuid) -> Option<&Chapter> {
    self.chapters.get(&id)
  }

  pub fn chapter_mut(&mut self, id: Uuid) -> Option<&mut Chapter> {
    self.chapters.get_mut(&id)
  }

  pub fn chapters_of_series(&self, series: Uuid) -> Vec<&Chapter> {
    self
      .chapters_by_series
      .get(&series)
      .into_iter()
      .flatten()
      .filter_map(|id| self.chapters.get(id))
      .collect()
  }

  pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
    self.chapters.values()
  }

  pub fn published_chapters(&self) -> Vec<&Chapter> {
    self
      .chapters
      .values()
      .filter(|c| matches!(c.status, ChapterStatus::Published))
      .collect()
  }

  // ── Pages ─────────────────────────────────────────────────────────────

  /// Append a page. The caller assigns `page_number = count + 1`, so a
  /// plain push keeps the index in page order.
  pub fn insert_page(&mut self, page: Page) {
    self
      .pages_by_chapter
      .entry(page.chapter_id)
      .or_default()
      .push(page.page_id);
    self.pages.insert(page.page_id, page);
  }

  pub fn page_mut(&mut self, id: Uuid) -> Option<&mut Page> {
    self.pages.get_mut(&id)
  }

  pub fn page_ids_of_chapter(&self, chapter: Uuid) -> &[Uuid] {
    self
      .pages_by_chapter
      .get(&chapter)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// The chapter's pages, in page order.
  pub fn pages_of_chapter(&self, chapter: Uuid) -> Vec<Page> {
    self
      .page_ids_of_chapter(chapter)
      .iter()
      .filter_map(|id| self.pages.get(id))
      .cloned()
      .collect()
  }

  pub fn page_id_by_number(&self, chapter: Uuid, number: u32) -> Option<Uuid> {
    let ids = self.page_ids_of_chapter(chapter);
    number
      .checked_sub(1)
      .and_then(|i| ids.get(i as usize))
      .copied()
  }

  /// Reassign page numbers `1..=n` following `order`, which the caller has
  /// already verified to be a permutation of the chapter's page ids.
  pub fn resequence_pages(&mut self, chapter: Uuid, order: &[Uuid]) {
    for (index, id) in order.iter().enumerate() {
      if let Some(page) = self.pages.get_mut(id) {
        page.page_number = index as u32 + 1;
      }
    }
    self.pages_by_chapter.insert(chapter, order.to_vec());
  }

  // ── Comments ──────────────────────────────────────────────────────────

  pub fn insert_comment(&mut self, comment: Comment) {
    self
      .comments_by_chapter
      .entry(comment.chapter_id)
      .or_default()
      .push(comment.comment_id);
    self
      .comments_by_page
      .entry((comment.chapter_id, comment.page_number))
      .or_default()
      .push(comment.comment_id);
    self.comments.insert(comment.comment_id, comment);
  }

  pub fn comment(&self, id: Uuid) -> Option<&Comment> {
    self.comments.get(&id)
  }

  pub fn comment_mut(&mut self, id: Uuid) -> Option<&mut Comment> {
    self.comments.get_mut(&id)
  }

  /// Comments on one page, in chronological order.
  pub fn comments_on_page(
    &self,
    chapter: Uuid,
    page: u32,
  ) -> impl Iterator<Item = &Comment> {
    self
      .comments_by_page
      .get(&(chapter, page))
      .into_iter()
      .flatten()
      .filter_map(|id| self.comments.get(id))
  }

  pub fn comments_of_chapter(&self, chapter: Uuid) -> impl Iterator<Item = &Comment> {
    self
      .comments_by_chapter
      .get(&chapter)
      .into_iter()
      .flatten()
      .filter_map(|id| self.comments.get(id))
  }

  /// Whether any comment record exists against the chapter, soft-deleted
  /// or not.
  pub fn chapter_has_comments(&self, chapter: Uuid) -> bool {
    self
      .comments_by_chapter
      .get(&chapter)
      .is_some_and(|ids| !ids.is_empty())
  }

  // ── Votes ─────────────────────────────────────────────────────────────

  pub fn vote(&self, comment: Uuid, voter: Uuid) -> Option<&CommentVote> {
    self.votes.get(&(comment, voter))
  }

  pub fn vote_mut(&mut self, comment: Uuid, voter: Uuid) -> Option<&mut CommentVote> {
    self.votes.get_mut(&(comment, voter))
  }

  pub fn insert_vote(&mut self, vote: CommentVote) {
    self.votes.insert((vote.comment_id, vote.voter_id), vote);
  }

  // ── Reactions ─────────────────────────────────────────────────────────

  pub fn insert_reaction(&mut self, reaction: Reaction) {
    self
      .reactions_by_page
      .entry((reaction.chapter_id, reaction.page_number))
      .or_default()
      .push(reaction.reaction_id);
    *self
      .reaction_count_by_chapter
      .entry(reaction.chapter_id)
      .or_default() += 1;
    self.reactions.insert(reaction.reaction_id, reaction);
  }

  /// Reactions on one page, in chronological order.
  pub fn reactions_on_page(
    &self,
    chapter: Uuid,
    page: u32,
  ) -> impl Iterator<Item = &Reaction> {
    self
      .reactions_by_page
      .get(&(chapter, page))
      .into_iter()
      .flatten()
      .filter_map(|id| self.reactions.get(id))
  }

  pub fn chapter_has_reactions(&self, chapter: Uuid) -> bool {
    self
      .reaction_count_by_chapter
      .get(&chapter)
      .is_some_and(|n| *n > 0)
  }

  pub fn chapter_reaction_count(&self, chapter: Uuid) -> usize {
    self
      .reaction_count_by_chapter
      .get(&chapter)
      .copied()
      .unwrap_or_default()
  }

  // ── Follows ───────────────────────────────────────────────────────────

  pub fn follow(&self, follower: Uuid, creator: Uuid) -> Option<&Follow> {
    self.follows.get(&(follower, creator))
  }

  pub fn insert_follow(&mut self, follow: Follow) {
    self
      .followers_by_creator
      .entry(follow.creator_id)
      .or_default()
      .insert(follow.follower_id);
    self
      .follows
      .insert((follow.follower_id, follow.creator_id), follow);
  }

  pub fn remove_follow(&mut self, follower: Uuid, creator: Uuid) -> bool {
    if let Some(set) = self.followers_by_creator.get_mut(&creator) {
      set.remove(&follower);
    }
    self.follows.remove(&(follower, creator)).is_some()
  }

  pub fn follower_count(&self, creator: Uuid) -> usize {
    self
      .followers_by_creator
      .get(&creator)
      .map(BTreeSet::len)
      .unwrap_or_default()
  }

  /// Follower ids in a stable order, for deterministic fan-out.
  pub fn followers_of(&self, creator: Uuid) -> impl Iterator<Item = Uuid> + '_ {
    self
      .followers_by_creator
      .get(&creator)
      .into_iter()
      .flatten()
      .copied()
  }

  // ── Notifications ─────────────────────────────────────────────────────

  pub fn push_notification(&mut self, notification: Notification) {
    self
      .notifications_by_recipient
      .entry(notification.recipient_id)
      .or_default()
      .push(notification);
  }

  /// The recipient's notifications, in insertion order.
  pub fn notifications_of(&self, recipient: Uuid) -> &[Notification] {
    self
      .notifications_by_recipient
      .get(&recipient)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn notifications_of_mut(&mut self, recipient: Uuid) -> &mut [Notification] {
    self
      .notifications_by_recipient
      .get_mut(&recipient)
      .map(Vec::as_mut_slice)
      .unwrap_or_default()
  }

  // ── Reports ───────────────────────────────────────────────────────────

  pub fn push_report(&mut self, report: Report) {
    self.reports.push(report);
  }

  pub fn reports(&self) -> &[Report] {
    &self.reports
  }

  // ── Rollups ───────────────────────────────────────────────────────────

  pub fn install_rollup(&mut self, rollup: RankingRollup) {
    self.rollups.insert((rollup.period, rollup.kind), rollup);
  }

  pub fn rollup(&self, period: RankingPeriod, kind: RankingKind) -> Option<&RankingRollup> {
    self.rollups.get(&(period, kind))
  }
}
