//! Key/value table backing the local session (token and cached profile).

use crate::errors::AppResult;
use crate::utils::time::now_iso;
use rusqlite::{Connection, OptionalExtension, params};

pub fn get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO session (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now_iso()],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, key: &str) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM session WHERE key = ?1", [key])?;
    Ok(n > 0)
}
