use std::collections::{BTreeMap, HashMap};

use axum::{Json, extract::State};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use footsteps_types::api::{
    AnalyticsSummary, ApiResponse, CommentEntry, DailySignups, FeatureStat, WaitlistAnalytics,
};
use footsteps_types::models::WaitlistRow;

use crate::error::ApiError;
use crate::state::AppState;

const RECENT_WINDOW_DAYS: i64 = 7;
const DAILY_WINDOW_DAYS: i64 = 30;

/// GET /api/waitlist/analytics
pub async fn waitlist_analytics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WaitlistAnalytics>>, ApiError> {
    let rows = state
        .store
        .list_waitlist()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch analytics data", e))?;

    debug!("Summarizing {} waitlist rows", rows.len());
    Ok(Json(ApiResponse::data(summarize(rows, Utc::now()))))
}

/// Builds the analytics payload from rows ordered newest first.
pub fn summarize(rows: Vec<WaitlistRow>, now: DateTime<Utc>) -> WaitlistAnalytics {
    let total = rows.len();
    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let daily_cutoff = now - Duration::days(DAILY_WINDOW_DAYS);

    let recent_signups = rows.iter().filter(|r| r.created_at.at() > recent_cutoff).count();

    // Feature groups in first-seen order; the stable sort below keeps that order for ties.
    let mut features: Vec<FeatureStat> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for row in &rows {
        for feature in row.suggested_feature.iter().flatten() {
            let slot = *index.entry(feature.as_str()).or_insert_with(|| {
                features.push(FeatureStat {
                    feature: feature.clone(),
                    count: 0,
                    percentage: String::new(),
                    users: Vec::new(),
                });
                features.len() - 1
            });
            features[slot].count += 1;
            features[slot].users.push(row.email.clone());
        }
    }
    for stat in &mut features {
        stat.percentage = percentage(stat.count, total);
    }
    features.sort_by(|a, b| b.count.cmp(&a.count));

    let comments: Vec<CommentEntry> = rows
        .iter()
        .filter(|r| r.comment().is_some())
        .map(|r| CommentEntry {
            email: r.email.clone(),
            comment: r.comments.clone().unwrap_or_default(),
            created_at: r.created_at.clone(),
            suggested_features: r.suggested_feature.clone().unwrap_or_default(),
        })
        .collect();

    let mut per_day: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.created_at.at() > daily_cutoff) {
        *per_day
            .entry(row.created_at.at().format("%Y-%m-%d").to_string())
            .or_default() += 1;
    }
    let daily_signups = per_day
        .into_iter()
        .map(|(date, count)| DailySignups { date, count })
        .collect();

    WaitlistAnalytics {
        summary: AnalyticsSummary {
            total_signups: total,
            recent_signups,
            total_comments: comments.len(),
            features_selected: features.len(),
        },
        features,
        comments,
        daily_signups,
        raw_data: rows,
    }
}

fn percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", count as f64 / total as f64 * 100.0)
}
