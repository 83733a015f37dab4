pub mod migrations;
pub mod queries;
pub mod rest;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use footsteps_types::models::{
    NewSupportMessage, NewWaitlistSignup, SupportMessageRow, WaitlistRow,
};

pub use rest::RestStore;

pub const WAITLIST_TABLE: &str = "footsteps-waitlist";
pub const SUPPORT_TABLE: &str = "support_messages";

/// Local SQLite database holding the same two tables as the hosted store.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

/// Where submissions are persisted: the hosted REST store in production,
/// a SQLite file for local runs and tests.
#[derive(Clone)]
pub enum Store {
    Hosted(RestStore),
    Local(Arc<Database>),
}

impl Store {
    pub fn local(db: Database) -> Self {
        Self::Local(Arc::new(db))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Hosted(_) => "hosted",
            Self::Local(_) => "sqlite",
        }
    }

    /// Inserts one waitlist row and returns the stored representation.
    pub async fn insert_waitlist(&self, signup: NewWaitlistSignup) -> Result<Vec<WaitlistRow>> {
        match self {
            Self::Hosted(rest) => rest.insert(WAITLIST_TABLE, &signup).await,
            Self::Local(db) => {
                let db = db.clone();
                let row = tokio::task::spawn_blocking(move || db.insert_waitlist(&signup))
                    .await
                    .context("waitlist insert task failed")??;
                Ok(vec![row])
            }
        }
    }

    /// Every waitlist row, newest first.
    pub async fn list_waitlist(&self) -> Result<Vec<WaitlistRow>> {
        match self {
            Self::Hosted(rest) => rest.select_newest_first(WAITLIST_TABLE).await,
            Self::Local(db) => {
                let db = db.clone();
                tokio::task::spawn_blocking(move || db.list_waitlist())
                    .await
                    .context("waitlist query task failed")?
            }
        }
    }

    /// Inserts one support message and returns the stored representation,
    /// including the server-assigned id and timestamp.
    pub async fn insert_support_message(
        &self,
        message: NewSupportMessage,
    ) -> Result<Vec<SupportMessageRow>> {
        match self {
            Self::Hosted(rest) => rest.insert(SUPPORT_TABLE, &message).await,
            Self::Local(db) => {
                let db = db.clone();
                let row = tokio::task::spawn_blocking(move || db.insert_support_message(&message))
                    .await
                    .context("support insert task failed")??;
                Ok(vec![row])
            }
        }
    }
}
