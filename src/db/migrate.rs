use crate::core::catalog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Single-table item store plus its secondary indexes.
fn create_items_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            pk          TEXT NOT NULL,
            sk          TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            gsi1pk      TEXT,
            gsi1sk      TEXT,
            gsi2pk      TEXT,
            gsi2sk      TEXT,
            gsi3pk      TEXT,
            gsi3sk      TEXT,
            data        TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            PRIMARY KEY (pk, sk)
        );

        CREATE INDEX IF NOT EXISTS idx_items_gsi1 ON items(gsi1pk, gsi1sk);
        CREATE INDEX IF NOT EXISTS idx_items_gsi2 ON items(gsi2pk, gsi2sk);
        CREATE INDEX IF NOT EXISTS idx_items_gsi3 ON items(gsi3pk, gsi3sk);
        CREATE INDEX IF NOT EXISTS idx_items_entity ON items(entity_type);
        "#,
    )?;
    Ok(())
}

fn create_support_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS blobs (
            pk   TEXT NOT NULL,
            sk   TEXT NOT NULL,
            data BLOB NOT NULL,
            PRIMARY KEY (pk, sk)
        );

        CREATE TABLE IF NOT EXISTS counters (
            name  TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

type Step = fn(&Connection) -> AppResult<()>;

fn step_create_items(conn: &Connection) -> AppResult<()> {
    Ok(create_items_table(conn)?)
}

fn step_create_support_tables(conn: &Connection) -> AppResult<()> {
    Ok(create_support_tables(conn)?)
}

/// Ordered list of schema migrations. Each runs at most once per database.
const MIGRATIONS: &[(&str, &str, Step)] = &[
    (
        "20250601_0001_create_items",
        "Created single-table item store",
        step_create_items,
    ),
    (
        "20250601_0002_create_support_tables",
        "Created blobs, counters and session tables",
        step_create_support_tables,
    ),
    (
        "20250601_0003_seed_reference_data",
        "Seeded inspection checklist and PMI reference data",
        catalog::seed,
    ),
];

/// Public entry point: run all pending migrations.
///
/// Called by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for (version, message, step) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        step(conn).map_err(|e| AppError::Migration(format!("{version}: {e}")))?;
        mark_applied(conn, version, message)?;

        success(format!("Migration applied: {version} → {message}"));
    }

    Ok(())
}

/// Number of migrations recorded as applied.
pub fn applied_count(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
        [],
        |row| row.get(0),
    )?;
    Ok(n)
}
