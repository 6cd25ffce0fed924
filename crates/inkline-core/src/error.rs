//! Error types for `inkline-core`.
//!
//! Messages are human-readable and free to change; the [`ErrorKind`]
//! taxonomy is the stable contract callers may branch on.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
  /// No actor reference was supplied, or it resolved to no account.
  #[error("sign in required")]
  Unauthenticated,

  /// The actor's account is suspended.
  #[error("this account is restricted")]
  Suspended,

  /// A creator-only operation was attempted by someone else.
  #[error("{0}")]
  NotOwner(String),

  /// The target entity is not in the lifecycle state the operation needs.
  #[error("{0}")]
  WrongState(String),

  /// The payload failed validation.
  #[error("{0}")]
  Validation(String),

  /// A limiter ceiling was hit or a cooldown has not yet elapsed.
  #[error("{message}")]
  RateLimited {
    message:     String,
    /// How long until the limiter would admit this action again.
    retry_after: Duration,
  },

  /// The referenced entity does not exist or is not visible to the caller.
  #[error("{0} not found")]
  NotFound(String),

  /// The operation is blocked by existing related state.
  #[error("{0}")]
  Conflict(String),
}

/// The stable error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
  Unauthenticated,
  Suspended,
  NotOwner,
  WrongState,
  Validation,
  RateLimited,
  NotFound,
  Conflict,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Unauthenticated => ErrorKind::Unauthenticated,
      Self::Suspended => ErrorKind::Suspended,
      Self::NotOwner(_) => ErrorKind::NotOwner,
      Self::WrongState(_) => ErrorKind::WrongState,
      Self::Validation(_) => ErrorKind::Validation,
      Self::RateLimited { .. } => ErrorKind::RateLimited,
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::Conflict(_) => ErrorKind::Conflict,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
