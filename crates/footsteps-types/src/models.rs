use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::timestamp::Timestamp;

/// Server-assigned row id. The hosted tables use either bigint or uuid keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

// -- Waitlist --

/// A row of the `footsteps-waitlist` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistRow {
    pub email: String,
    #[serde(default)]
    pub suggested_feature: Option<Vec<String>>,
    #[serde(default)]
    pub comments: Option<String>,
    pub created_at: Timestamp,
    /// Columns this service does not interpret (id, phone_number, ...),
    /// carried through untouched so analytics can echo the raw rows.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WaitlistRow {
    /// Trimmed comment, if the row carries a non-blank one.
    pub fn comment(&self) -> Option<&str> {
        self.comments
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Insert payload for the waitlist table. `created_at` is left to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWaitlistSignup {
    pub email: String,
    pub suggested_feature: Option<Vec<String>>,
    pub comments: Option<String>,
}

// -- Support --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportCategory {
    Bug,
    Feedback,
    Account,
    Other,
}

impl SupportCategory {
    pub const ALL: [SupportCategory; 4] = [Self::Bug, Self::Feedback, Self::Account, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feedback => "feedback",
            Self::Account => "account",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SupportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown support category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for SupportCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Validated support ticket, ready to insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSupportMessage {
    pub name: String,
    pub email: String,
    pub category: SupportCategory,
    pub message: String,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
}

/// A row of the `support_messages` table as returned after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportMessageRow {
    #[serde(default)]
    pub id: Option<RowId>,
    pub name: String,
    pub email: String,
    pub category: SupportCategory,
    pub message: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}
