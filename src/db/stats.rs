use crate::db::migrate::applied_count;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::formatting::human_size;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {}", CYAN, RESET, human_size(file_size));

    //
    // 2) ITEMS PER ENTITY TYPE
    //
    let mut stmt = pool.conn.prepare(
        "SELECT entity_type, COUNT(*) FROM items GROUP BY entity_type ORDER BY entity_type",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    println!("{}• Items:{}", CYAN, RESET);
    let mut total = 0;
    for r in rows {
        let (entity, n) = r?;
        total += n;
        println!("    {:<22} {}{}{}", entity, GREEN, n, RESET);
    }
    println!("    {:<22} {}{}{}", "total", GREEN, total, RESET);

    //
    // 3) PAYLOADS
    //
    let (blobs, bytes): (i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*), IFNULL(SUM(length(data)), 0) FROM blobs",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!(
        "{}• Attachments:{} {} ({})",
        CYAN,
        RESET,
        blobs,
        human_size(bytes.max(0) as u64)
    );

    //
    // 4) SO COUNTER + MIGRATIONS
    //
    let last_so: Option<i64> = pool
        .conn
        .query_row(
            "SELECT value FROM counters WHERE name = 'so_number'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last_so = last_so
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{}• Last SO number:{} {}", CYAN, RESET, last_so);
    println!(
        "{}• Migrations applied:{} {}",
        CYAN,
        RESET,
        applied_count(&pool.conn)?
    );

    println!();
    Ok(())
}
