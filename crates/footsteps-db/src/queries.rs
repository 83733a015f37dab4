use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde_json::{Map, Value};
use uuid::Uuid;

use footsteps_types::models::{
    NewSupportMessage, NewWaitlistSignup, RowId, SupportMessageRow, WaitlistRow,
};
use footsteps_types::timestamp::Timestamp;

use crate::Database;

impl Database {
    // -- Waitlist --

    pub fn insert_waitlist(&self, signup: &NewWaitlistSignup) -> Result<WaitlistRow> {
        let created_at = Timestamp::now();
        let features = signup
            .suggested_feature
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let id = self.with_conn(|conn| {
            conn.execute(
                r#"INSERT INTO "footsteps-waitlist" (email, suggested_feature, comments, created_at)
                   VALUES (?1, ?2, ?3, ?4)"#,
                rusqlite::params![
                    signup.email,
                    features,
                    signup.comments,
                    created_at.as_str()
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        let mut extra = Map::new();
        extra.insert("id".to_string(), Value::from(id));

        Ok(WaitlistRow {
            email: signup.email.clone(),
            suggested_feature: signup.suggested_feature.clone(),
            comments: signup.comments.clone(),
            created_at,
            extra,
        })
    }

    pub fn list_waitlist(&self) -> Result<Vec<WaitlistRow>> {
        self.with_conn(query_waitlist)
    }

    // -- Support --

    pub fn insert_support_message(&self, message: &NewSupportMessage) -> Result<SupportMessageRow> {
        let id = Uuid::new_v4().to_string();
        let created_at = Timestamp::now();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO support_messages (id, name, email, category, message, user_agent, page_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    id,
                    message.name,
                    message.email,
                    message.category.as_str(),
                    message.message,
                    message.user_agent,
                    message.page_url,
                    created_at.as_str()
                ],
            )?;
            Ok(())
        })?;

        Ok(SupportMessageRow {
            id: Some(RowId::Text(id)),
            name: message.name.clone(),
            email: message.email.clone(),
            category: message.category,
            message: message.message.clone(),
            user_agent: message.user_agent.clone(),
            page_url: message.page_url.clone(),
            created_at: created_at.at(),
        })
    }
}

fn query_waitlist(conn: &Connection) -> Result<Vec<WaitlistRow>> {
    let mut stmt = conn.prepare(
        r#"SELECT id, email, suggested_feature, comments, created_at
           FROM "footsteps-waitlist"
           ORDER BY created_at DESC, id DESC"#,
    )?;

    let raw = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(id, email, features, comments, created_at)| {
            let suggested_feature = features
                .map(|json| serde_json::from_str::<Vec<String>>(&json))
                .transpose()
                .with_context(|| format!("Corrupt suggested_feature on waitlist row {id}"))?;
            let created_at = Timestamp::parse(&created_at)
                .ok_or_else(|| anyhow!("Corrupt created_at '{}' on waitlist row {}", created_at, id))?;

            let mut extra = Map::new();
            extra.insert("id".to_string(), Value::from(id));

            Ok(WaitlistRow {
                email,
                suggested_feature,
                comments,
                created_at,
                extra,
            })
        })
        .collect()
}
