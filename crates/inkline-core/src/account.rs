//! Account — the identity envelope every mutation resolves first.
//!
//! Accounts are created on the first verified-identity login and are never
//! hard-deleted; suspension is a soft state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The external identity verifier a login arrived through. The handshake
/// itself happens upstream; the engine only consumes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
  Google,
  Discord,
  Apple,
}

impl IdentityProvider {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Google => "google",
      Self::Discord => "discord",
      Self::Apple => "apple",
    }
  }
}

/// A platform account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub account_id:       Uuid,
  pub provider:         IdentityProvider,
  /// Stable subject id issued by the provider; unique together with it.
  pub provider_id:      String,
  /// Globally unique display handle.
  pub username:         String,
  pub avatar_url:       String,
  pub bio:              Option<String>,
  pub is_creator:       bool,
  pub is_suspended:     bool,
  pub reputation_score: i64,
  pub created_at:       DateTime<Utc>,
  pub last_active_at:   DateTime<Utc>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
  pub username:   Option<String>,
  pub bio:        Option<String>,
  pub avatar_url: Option<String>,
}
