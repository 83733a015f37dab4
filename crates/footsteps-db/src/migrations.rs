use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Mirrors the hosted tables closely enough for local development.
/// `suggested_feature` holds a JSON array.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "footsteps-waitlist" (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            email               TEXT NOT NULL,
            suggested_feature   TEXT,
            comments            TEXT,
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_waitlist_created
            ON "footsteps-waitlist"(created_at);

        CREATE TABLE IF NOT EXISTS support_messages (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL,
            category    TEXT NOT NULL
                        CHECK (category IN ('bug', 'feedback', 'account', 'other')),
            message     TEXT NOT NULL,
            user_agent  TEXT,
            page_url    TEXT,
            created_at  TEXT NOT NULL
        );
        "#,
    )?;

    info!("Database migrations complete");
    Ok(())
}
