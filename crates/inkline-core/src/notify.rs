//! Notifications — created only as side effects of other mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  /// A followed creator published a chapter.
  NewChapter,
  /// Someone replied to the recipient's comment.
  Reply,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub recipient_id:    Uuid,
  pub kind:            NotificationKind,
  /// Small structured payload; shape depends on the kind.
  pub payload:         serde_json::Value,
  pub is_read:         bool,
  pub created_at:      DateTime<Utc>,
}
