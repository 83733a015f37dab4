use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for the hosted store's PostgREST interface (`/rest/v1/{table}`).
#[derive(Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
}

/// Error body PostgREST returns on failure.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

impl RestStore {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(anon_key).context("invalid anon key")?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {anon_key}")).context("invalid anon key")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build store HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Inserts one row and returns the representation the store assigned.
    pub async fn insert<T, R>(&self, table: &str, row: &T) -> Result<Vec<R>>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("Inserting into {}", table);
        let resp = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .with_context(|| format!("insert into {table} failed"))?;

        read_rows(resp).await
    }

    /// Every row of `table`, ordered by `created_at` descending.
    pub async fn select_newest_first<R: DeserializeOwned>(&self, table: &str) -> Result<Vec<R>> {
        let resp = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .with_context(|| format!("select from {table} failed"))?;

        read_rows(resp).await
    }
}

async fn read_rows<R: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<R>> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("Database error: {} ({})", error_message(&body), status);
    }

    resp.json::<Vec<R>>()
        .await
        .context("unexpected row shape from store")
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<PostgrestError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_ignores_trailing_slash() {
        let store = RestStore::new("https://abc.supabase.co/", "anon", Duration::from_secs(5)).unwrap();
        assert_eq!(
            store.table_url(crate::WAITLIST_TABLE),
            "https://abc.supabase.co/rest/v1/footsteps-waitlist"
        );
    }

    #[test]
    fn error_message_prefers_postgrest_message() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table support_messages"}"#;
        assert_eq!(error_message(body), "permission denied for table support_messages");
        assert_eq!(error_message(" upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn rejects_key_with_control_characters() {
        assert!(RestStore::new("https://abc.supabase.co", "bad\nkey", Duration::from_secs(5)).is_err());
    }
}
