use serde::{Deserialize, Serialize};

use crate::models::{SupportMessageRow, WaitlistRow};
use crate::timestamp::Timestamp;

// -- Envelope --

/// JSON envelope every endpoint answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error,
        }
    }
}

// -- Waitlist --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistRequest {
    pub email: Option<String>,
    pub selected_features: Option<Vec<String>>,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WaitlistEmailRequest {
    pub email: Option<String>,
}

// -- Support --

/// Raw support form body. Every field is optional so each missing one
/// gets its own validation message.
#[derive(Debug, Default, Deserialize)]
pub struct SupportRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub message: Option<String>,
}

/// Outcome of one outbound email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    Sent,
    Failed,
}

/// Per-message outcome of the two support notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDelivery {
    pub internal: Delivery,
    pub acknowledgment: Delivery,
}

/// Collapsed notification status, kept for clients that only read `emailStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Sent,
    Skipped,
    Failed,
}

impl From<Option<EmailDelivery>> for EmailStatus {
    fn from(delivery: Option<EmailDelivery>) -> Self {
        match delivery {
            None => Self::Skipped,
            Some(EmailDelivery {
                internal: Delivery::Sent,
                acknowledgment: Delivery::Sent,
            }) => Self::Sent,
            Some(_) => Self::Failed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<SupportMessageRow>,
    pub email_status: EmailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_delivery: Option<EmailDelivery>,
}

// -- Analytics --

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_signups: usize,
    pub recent_signups: usize,
    pub total_comments: usize,
    pub features_selected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStat {
    pub feature: String,
    pub count: usize,
    /// Share of all signups, one decimal place (`"33.3"`).
    pub percentage: String,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentEntry {
    pub email: String,
    pub comment: String,
    pub created_at: Timestamp,
    pub suggested_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySignups {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistAnalytics {
    pub summary: AnalyticsSummary,
    pub features: Vec<FeatureStat>,
    pub comments: Vec<CommentEntry>,
    pub daily_signups: Vec<DailySignups>,
    pub raw_data: Vec<WaitlistRow>,
}
