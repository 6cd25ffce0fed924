//! [`Engine`] — the single mutation authority over the shared store.
//!
//! Accounts, sessions, follows, and notifications live here; content
//! lifecycle, the engagement ledger, the activity stream, and discovery
//! are implemented on `Engine` in their own modules.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use inkline_core::{
  Error, Result,
  account::{Account, IdentityProvider, ProfilePatch},
  engagement::Follow,
  notify::{Notification, NotificationKind},
};
use uuid::Uuid;

use crate::{
  clock::{Clock, SystemClock},
  guard::resolve_actor,
  limiter::RateLimiter,
  store::Store,
};

pub(crate) struct State {
  pub store:   Store,
  pub limiter: RateLimiter,
}

/// The engine. Mutations take the write lock for their whole
/// read-check-write unit; reads take the read lock and may observe any
/// serializable prior state.
pub struct Engine {
  state: RwLock<State>,
  clock: Arc<dyn Clock>,
}

impl Engine {
  pub fn new() -> Self {
    Self::with_clock(Arc::new(SystemClock))
  }

  pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
    Self {
      state: RwLock::new(State {
        store:   Store::new(),
        limiter: RateLimiter::new(),
      }),
      clock,
    }
  }

  pub(crate) fn read(&self) -> RwLockReadGuard<'_, State> {
    self.state.read().expect("engine state poisoned")
  }

  pub(crate) fn write(&self) -> RwLockWriteGuard<'_, State> {
    self.state.write().expect("engine state poisoned")
  }

  pub(crate) fn now(&self) -> DateTime<Utc> {
    self.clock.now()
  }

  // ── Session ───────────────────────────────────────────────────────────

  /// Create-or-fetch an account from a verified `(provider, provider_id)`
  /// pair. The verification itself happens upstream; this consumes its
  /// result.
  pub fn login(&self, provider: IdentityProvider, provider_id: &str) -> Result<Account> {
    let now = self.now();
    let mut state = self.write();

    if let Some(id) = state.store.account_by_identity(provider, provider_id) {
      let account = state.store.account_mut(id).ok_or(Error::Unauthenticated)?;
      if account.is_suspended {
        return Err(Error::Suspended);
      }
      account.last_active_at = now;
      return Ok(account.clone());
    }

    let account_id = Uuid::new_v4();
    let mut username = reader_handle(provider, account_id);
    while state.store.username_taken(&username, account_id) {
      username = reader_handle(provider, Uuid::new_v4());
    }

    let account = Account {
      account_id,
      provider,
      provider_id: provider_id.to_owned(),
      username,
      avatar_url: String::new(),
      bio: None,
      is_creator: false,
      is_suspended: false,
      reputation_score: 0,
      created_at: now,
      last_active_at: now,
    };
    state.store.insert_account(account.clone());
    tracing::info!(
      account = %account.account_id,
      provider = provider.as_str(),
      "created account on first login"
    );
    Ok(account)
  }

  pub fn account(&self, id: Uuid) -> Result<Account> {
    self
      .read()
      .store
      .account(id)
      .cloned()
      .ok_or_else(|| Error::NotFound("account".into()))
  }

  /// Flip the suspension flag. This is the moderation surface's hook;
  /// accounts are never hard-deleted.
  pub fn set_account_suspended(&self, account_id: Uuid, suspended: bool) -> Result<Account> {
    let mut state = self.write();
    let account = state
      .store
      .account_mut(account_id)
      .ok_or_else(|| Error::NotFound("account".into()))?;
    account.is_suspended = suspended;
    Ok(account.clone())
  }

  pub fn update_profile(&self, actor: Option<Uuid>, patch: ProfilePatch) -> Result<Account> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    let username = match patch.username.as_deref().map(str::trim) {
      Some("") => return Err(Error::Validation("username cannot be empty".into())),
      Some(name) => {
        if state.store.username_taken(name, actor) {
          return Err(Error::Conflict("username is already taken".into()));
        }
        Some(name.to_owned())
      }
      None => None,
    };

    let account = state.store.account_mut(actor).ok_or(Error::Unauthenticated)?;
    if let Some(username) = username {
      account.username = username;
    }
    if let Some(bio) = patch.bio {
      account.bio = Some(bio.trim().to_owned());
    }
    if let Some(avatar_url) = patch.avatar_url {
      let avatar_url = avatar_url.trim();
      if !avatar_url.is_empty() {
        account.avatar_url = avatar_url.to_owned();
      }
    }
    account.last_active_at = now;
    Ok(account.clone())
  }

  // ── Follows ───────────────────────────────────────────────────────────

  /// Follow a creator. Idempotent: re-following returns the existing edge.
  pub fn follow(&self, actor: Option<Uuid>, creator_id: Uuid) -> Result<Follow> {
    let now = self.now();
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;

    if actor == creator_id {
      return Err(Error::Validation("you cannot follow yourself".into()));
    }
    let is_creator = state
      .store
      .account(creator_id)
      .is_some_and(|a| a.is_creator);
    if !is_creator {
      return Err(Error::NotFound("creator".into()));
    }

    if let Some(existing) = state.store.follow(actor, creator_id) {
      return Ok(existing.clone());
    }

    let follow = Follow {
      follower_id: actor,
      creator_id,
      created_at:  now,
    };
    state.store.insert_follow(follow.clone());
    Ok(follow)
  }

  /// Unfollow. Removing a non-existent edge is a no-op.
  pub fn unfollow(&self, actor: Option<Uuid>, creator_id: Uuid) -> Result<()> {
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;
    state.store.remove_follow(actor, creator_id);
    Ok(())
  }

  pub fn is_following(&self, follower: Uuid, creator: Uuid) -> bool {
    self.read().store.follow(follower, creator).is_some()
  }

  // ── Notifications ─────────────────────────────────────────────────────

  pub fn notifications(&self, actor: Option<Uuid>) -> Result<Vec<Notification>> {
    let state = self.read();
    let actor = resolve_actor(&state.store, actor)?;
    let mut all: Vec<Notification> = state.store.notifications_of(actor).to_vec();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(all)
  }

  /// Mark every unread notification read; returns how many were flipped.
  pub fn mark_notifications_read(&self, actor: Option<Uuid>) -> Result<u64> {
    let mut state = self.write();
    let actor = resolve_actor(&state.store, actor)?;
    let mut flipped = 0;
    for notification in state.store.notifications_of_mut(actor) {
      if !notification.is_read {
        notification.is_read = true;
        flipped += 1;
      }
    }
    Ok(flipped)
  }

  pub(crate) fn push_notification(
    store: &mut Store,
    recipient: Uuid,
    kind: NotificationKind,
    payload: serde_json::Value,
    now: DateTime<Utc>,
  ) {
    store.push_notification(Notification {
      notification_id: Uuid::new_v4(),
      recipient_id: recipient,
      kind,
      payload,
      is_read: false,
      created_at: now,
    });
  }
}

impl Default for Engine {
  fn default() -> Self {
    Self::new()
  }
}

fn reader_handle(provider: IdentityProvider, seed: Uuid) -> String {
  let suffix = seed.simple().to_string();
  format!("{}_reader_{}", provider.as_str(), &suffix[..6])
}
