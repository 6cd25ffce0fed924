//! Reports — append-only moderation records.
//!
//! Status transitions belong to an out-of-scope moderation surface; the
//! engine only ever appends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTargetKind {
  Series,
  Chapter,
  Comment,
  Account,
}

/// Tagged reference to whatever a report points at. The engine never
/// dereferences it; resolution happens where moderation renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTarget {
  pub kind: ReportTargetKind,
  pub id:   Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
  Open,
  Reviewing,
  Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub report_id:   Uuid,
  pub reporter_id: Uuid,
  pub target:      ReportTarget,
  pub reason:      String,
  pub details:     Option<String>,
  pub status:      ReportStatus,
  pub created_at:  DateTime<Utc>,
}
