//! Identity resolution and ownership checks.
//!
//! Every mutation runs these before touching anything else, in a fixed
//! order: resolve the actor, reject suspension, then check ownership.

use inkline_core::{
  Error, Result,
  content::{Chapter, Series},
};
use uuid::Uuid;

use crate::store::Store;

/// Resolve an optional actor reference to a live, non-suspended account id.
pub fn resolve_actor(store: &Store, actor: Option<Uuid>) -> Result<Uuid> {
  let id = actor.ok_or(Error::Unauthenticated)?;
  let account = store.account(id).ok_or(Error::Unauthenticated)?;
  if account.is_suspended {
    return Err(Error::Suspended);
  }
  Ok(account.account_id)
}

pub fn ensure_owns_series(actor: Uuid, series: &Series) -> Result<()> {
  if series.creator_id != actor {
    return Err(Error::NotOwner("you do not own this series".into()));
  }
  Ok(())
}

pub fn ensure_owns_chapter(actor: Uuid, chapter: &Chapter) -> Result<()> {
  if chapter.creator_id != actor {
    return Err(Error::NotOwner("you do not own this chapter".into()));
  }
  Ok(())
}
