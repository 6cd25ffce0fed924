//! Content lifecycle: series, chapter drafts, pages, publish/unpublish.
//!
//! Chapters move `Draft → Published → Draft` and nowhere else. Page
//! structure is mutable only while drafting; the single sanctioned
//! post-publish correction is swapping a page's asset reference in place.

use std::collections::HashSet;

use inkline_core::{
  Error, Result,
  account::Account,
  content::{
    Chapter, ChapterDraftInput, ChapterStatus, Page, Series, SeriesInput, SeriesPatch,
    SeriesStatus,
  },
  limits::MAX_PAGES_PER_CHAPTER,
  notify::NotificationKind,
};
use uuid::Uuid;

use crate::{
  engine::Engine,
  guard::{ensure_owns_chapter, ensure_owns_series, resolve_actor},
};

impl Engine {
  // ── Series ────────────────────────────────────────────────────────────

  /// Create a series. The actor becomes a creator if they were not one.
  pub fn create_series(&self, actor: Option<Uuid>, input: SeriesInput) -> Result<Series> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let title = input.title.trim().to_owned();
    if title.is_empty() {
      return Err(Error::Validation("series title cannot be empty".into()));
    }

    let series = Series {
      series_id: Uuid::new_v4(),
      creator_id: actor,
      title,
      description: input.description.trim().to_owned(),
      tags: input.tags,
      language: input.language,
      is_mature: input.is_mature,
      content_warnings: input.content_warnings,
      cover_ref: input.cover_ref,
      layout: input.layout,
      status: SeriesStatus::Active,
      average_rating: 0.0,
      rating_count: 0,
      created_at: now,
      updated_at: now,
    };

    if let Some(account) = state.store.account_mut(actor) {
      account.is_creator = true;
    }
    state.store.insert_series(series.clone());
    tracing::info!(series = %series.series_id, creator = %actor, "created series");
    Ok(series)
  }

  pub fn update_series(
    &self,
    actor: Option<Uuid>,
    series_id: Uuid,
    patch: SeriesPatch,
  ) -> Result<Series> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    {
      let series = state
        .store
        .series(series_id)
        .ok_or_else(|| Error::NotFound("series".into()))?;
      ensure_owns_series(actor, series)?;
    }

    if let Some(title) = patch.title.as_deref().map(str::trim)
      && title.is_empty()
    {
      return Err(Error::Validation("series title cannot be empty".into()));
    }

    let series = state
      .store
      .series_mut(series_id)
      .ok_or_else(|| Error::NotFound("series".into()))?;
    if let Some(title) = patch.title {
      series.title = title.trim().to_owned();
    }
    if let Some(description) = patch.description {
      series.description = description.trim().to_owned();
    }
    if let Some(tags) = patch.tags {
      series.tags = tags;
    }
    if let Some(language) = patch.language {
      series.language = language;
    }
    if let Some(is_mature) = patch.is_mature {
      series.is_mature = is_mature;
    }
    if let Some(content_warnings) = patch.content_warnings {
      series.content_warnings = content_warnings;
    }
    if let Some(layout) = patch.layout {
      series.layout = layout;
    }
    series.updated_at = now;
    Ok(series.clone())
  }

  // ── Chapter drafts ────────────────────────────────────────────────────

  pub fn create_chapter_draft(
    &self,
    actor: Option<Uuid>,
    series_id: Uuid,
    input: ChapterDraftInput,
  ) -> Result<Chapter> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let series = state
      .store
      .series(series_id)
      .ok_or_else(|| Error::NotFound("series".into()))?;
    ensure_owns_series(actor, series)?;

    let chapter = Chapter {
      chapter_id: Uuid::new_v4(),
      series_id,
      creator_id: actor,
      chapter_number: input.chapter_number,
      title: input.title,
      notes: input.notes,
      status: ChapterStatus::Draft,
      published_at: None,
      page_count: 0,
      comment_count: 0,
      reaction_count: 0,
      view_count: 0,
      created_at: now,
      updated_at: now,
    };
    state.store.insert_chapter(chapter.clone());
    Ok(chapter)
  }

  /// Append a page to a draft; the new page takes `count + 1`.
  pub fn add_page_to_draft(
    &self,
    actor: Option<Uuid>,
    chapter_id: Uuid,
    asset_ref: &str,
  ) -> Result<Page> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let (series_id, status) = {
      let chapter = state
        .store
        .chapter(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      ensure_owns_chapter(actor, chapter)?;
      (chapter.series_id, chapter.status)
    };
    if status != ChapterStatus::Draft {
      return Err(Error::WrongState(
        "published chapters cannot take new pages".into(),
      ));
    }

    let current = state.store.page_ids_of_chapter(chapter_id).len();
    if current >= MAX_PAGES_PER_CHAPTER {
      return Err(Error::Validation(format!(
        "page limit reached ({MAX_PAGES_PER_CHAPTER})"
      )));
    }

    let asset_ref = asset_ref.trim();
    if asset_ref.is_empty() {
      return Err(Error::Validation("page asset reference is required".into()));
    }

    let page = Page {
      page_id: Uuid::new_v4(),
      chapter_id,
      series_id,
      page_number: current as u32 + 1,
      asset_ref: asset_ref.to_owned(),
      created_at: now,
    };
    state.store.insert_page(page.clone());

    let count = state.store.page_ids_of_chapter(chapter_id).len() as u32;
    if let Some(chapter) = state.store.chapter_mut(chapter_id) {
      chapter.page_count = count;
      chapter.updated_at = now;
    }
    Ok(page)
  }

  /// Replace the draft's page order wholesale. `order` must be a
  /// permutation of the chapter's current page ids; on success pages are
  /// renumbered `1..=n` in the given order.
  pub fn reorder_draft_pages(
    &self,
    actor: Option<Uuid>,
    chapter_id: Uuid,
    order: &[Uuid],
  ) -> Result<Vec<Page>> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let status = {
      let chapter = state
        .store
        .chapter(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      ensure_owns_chapter(actor, chapter)?;
      chapter.status
    };
    if status != ChapterStatus::Draft {
      return Err(Error::WrongState("page order is locked after publish".into()));
    }

    let current: HashSet<Uuid> = state
      .store
      .page_ids_of_chapter(chapter_id)
      .iter()
      .copied()
      .collect();
    if order.len() != current.len() {
      return Err(Error::Validation(
        "new order must include every page exactly once".into(),
      ));
    }
    let distinct: HashSet<Uuid> = order.iter().copied().collect();
    if distinct.len() != order.len() {
      return Err(Error::Validation("new order repeats a page".into()));
    }
    if let Some(foreign) = order.iter().find(|id| !current.contains(id)) {
      return Err(Error::NotFound(format!("page {foreign}")));
    }

    state.store.resequence_pages(chapter_id, order);
    if let Some(chapter) = state.store.chapter_mut(chapter_id) {
      chapter.updated_at = now;
    }
    Ok(state.store.pages_of_chapter(chapter_id))
  }

  // ── Publish / unpublish ───────────────────────────────────────────────

  /// Publish a draft with at least one page. Fans out one notification
  /// per follower of the creator.
  pub fn publish_chapter(&self, actor: Option<Uuid>, chapter_id: Uuid) -> Result<Chapter> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let (series_id, status) = {
      let chapter = state
        .store
        .chapter(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      ensure_owns_chapter(actor, chapter)?;
      (chapter.series_id, chapter.status)
    };
    if status != ChapterStatus::Draft {
      return Err(Error::WrongState("chapter is already published".into()));
    }

    let page_count = state.store.page_ids_of_chapter(chapter_id).len();
    if page_count == 0 {
      return Err(Error::Validation(
        "at least one page is required to publish".into(),
      ));
    }

    let chapter = {
      let chapter = state
        .store
        .chapter_mut(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      chapter.status = ChapterStatus::Published;
      chapter.published_at = Some(now);
      chapter.page_count = page_count as u32;
      chapter.updated_at = now;
      chapter.clone()
    };

    let followers: Vec<Uuid> = state.store.followers_of(actor).collect();
    for follower in &followers {
      Self::push_notification(
        &mut state.store,
        *follower,
        NotificationKind::NewChapter,
        serde_json::json!({
          "chapter_id": chapter_id,
          "series_id": series_id,
          "creator_id": actor,
        }),
        now,
      );
    }
    tracing::info!(
      chapter = %chapter_id,
      followers = followers.len(),
      "published chapter"
    );
    Ok(chapter)
  }

  /// Revert a published chapter to draft. Blocked once the chapter has
  /// any engagement record: a comment (soft-deleted or not) or a
  /// reaction. The corrective path is publishing a fixed chapter, not
  /// withdrawing one the community has already responded to.
  pub fn unpublish_chapter(&self, actor: Option<Uuid>, chapter_id: Uuid) -> Result<Chapter> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let status = {
      let chapter = state
        .store
        .chapter(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      ensure_owns_chapter(actor, chapter)?;
      chapter.status
    };
    if status != ChapterStatus::Published {
      return Err(Error::WrongState("chapter is already a draft".into()));
    }

    if state.store.chapter_has_comments(chapter_id)
      || state.store.chapter_has_reactions(chapter_id)
    {
      return Err(Error::Conflict(
        "unpublish is blocked once a chapter has comments or reactions; \
         publish a corrected chapter instead"
          .into(),
      ));
    }

    let chapter = state
      .store
      .chapter_mut(chapter_id)
      .ok_or_else(|| Error::NotFound("chapter".into()))?;
    chapter.status = ChapterStatus::Draft;
    chapter.published_at = None;
    chapter.updated_at = now;
    tracing::info!(chapter = %chapter_id, "unpublished chapter");
    Ok(chapter.clone())
  }

  /// Swap the asset of an existing page slot on a published chapter.
  /// Numbering and count never change here.
  pub fn replace_page_asset(
    &self,
    actor: Option<Uuid>,
    chapter_id: Uuid,
    page_number: u32,
    asset_ref: &str,
  ) -> Result<Page> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let status = {
      let chapter = state
        .store
        .chapter(chapter_id)
        .ok_or_else(|| Error::NotFound("chapter".into()))?;
      ensure_owns_chapter(actor, chapter)?;
      chapter.status
    };
    if status != ChapterStatus::Published {
      return Err(Error::WrongState(
        "in-place replacement applies to published chapters only".into(),
      ));
    }

    let asset_ref = asset_ref.trim();
    if asset_ref.is_empty() {
      return Err(Error::Validation("page asset reference is required".into()));
    }

    let page_id = state
      .store
      .page_id_by_number(chapter_id, page_number)
      .ok_or_else(|| Error::NotFound("page".into()))?;
    let page = {
      let page = state
        .store
        .page_mut(page_id)
        .ok_or_else(|| Error::NotFound("page".into()))?;
      page.asset_ref = asset_ref.to_owned();
      page.clone()
    };
    if let Some(chapter) = state.store.chapter_mut(chapter_id) {
      chapter.updated_at = now;
    }
    Ok(page)
  }

  /// Record one anonymous view against a published chapter.
  pub fn record_view(&self, chapter_id: Uuid) -> Result<u64> {
    let mut state = self.write();
    let chapter = state
      .store
      .chapter_mut(chapter_id)
      .filter(|c| c.is_published())
      .ok_or_else(|| Error::NotFound("chapter".into()))?;
    chapter.view_count += 1;
    Ok(chapter.view_count)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All series, most recently updated first.
  pub fn series_list(&self) -> Vec<Series> {
    let state = self.read();
    let mut all: Vec<Series> = state.store.all_series().cloned().collect();
    all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    all
  }

  /// A series together with its creator.
  pub fn series_detail(&self, series_id: Uuid) -> Result<(Series, Account)> {
    let state = self.read();
    let series = state
      .store
      .series(series_id)
      .cloned()
      .ok_or_else(|| Error::NotFound("series".into()))?;
    let creator = state
      .store
      .account(series.creator_id)
      .cloned()
      .ok_or_else(|| Error::NotFound("creator".into()))?;
    Ok((series, creator))
  }

  /// Chapters of a series, newest chapter number first. Drafts are
  /// visible to the series owner only.
  pub fn chapters_of_series(
    &self,
    viewer: Option<Uuid>,
    series_id: Uuid,
  ) -> Result<Vec<Chapter>> {
    let state = self.read();
    let series = state
      .store
      .series(series_id)
      .ok_or_else(|| Error::NotFound("series".into()))?;
    let is_owner = viewer == Some(series.creator_id);

    let mut chapters: Vec<Chapter> = state
      .store
      .chapters_of_series(series_id)
      .into_iter()
      .filter(|c| c.is_published() || is_owner)
      .cloned()
      .collect();
    chapters.sort_by(|a, b| b.chapter_number.cmp(&a.chapter_number));
    Ok(chapters)
  }

  /// One chapter. A draft resolves only for its owner; to anyone else it
  /// does not exist.
  pub fn chapter(&self, viewer: Option<Uuid>, chapter_id: Uuid) -> Result<Chapter> {
    let state = self.read();
    state
      .store
      .chapter(chapter_id)
      .filter(|c| c.is_published() || viewer == Some(c.creator_id))
      .cloned()
      .ok_or_else(|| Error::NotFound("chapter".into()))
  }

  /// The chapter's pages in page order, under the same visibility rule as
  /// [`Engine::chapter`].
  pub fn chapter_pages(&self, viewer: Option<Uuid>, chapter_id: Uuid) -> Result<Vec<Page>> {
    let state = self.read();
    state
      .store
      .chapter(chapter_id)
      .filter(|c| c.is_published() || viewer == Some(c.creator_id))
      .ok_or_else(|| Error::NotFound("chapter".into()))?;
    Ok(state.store.pages_of_chapter(chapter_id))
  }

  /// A creator's drafts, most recently touched first.
  pub fn draft_chapters(&self, actor: Option<Uuid>) -> Result<Vec<Chapter>> {
    let state = self.read();
    let actor = resolve_actor(&state.store, actor)?;
    let mut drafts: Vec<Chapter> = state
      .store
      .chapters()
      .filter(|c| c.creator_id == actor && c.status == ChapterStatus::Draft)
      .cloned()
      .collect();
    drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(drafts)
  }
}
