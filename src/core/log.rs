use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

const MAX_OP_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    match RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// Colour of an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "create" => Colour::Green,
        "del" => Colour::Red,
        "update" => Colour::Yellow,
        "submit" => Colour::Cyan,
        "response" | "pmi" => Colour::White,
        "image" | "signature" => Colour::Fixed(74),
        "login" | "logout" => Colour::Fixed(141),
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        "init" | "seed" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn truncate_visible(s: &str) -> String {
    if s.chars().count() > MAX_OP_WIDTH {
        let mut out: String = s.chars().take(MAX_OP_WIDTH - 3).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        let rows: Vec<(i64, String, String, String, String)> = entries
            .into_iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(e.date);
                let op_target = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                (e.id, date, e.operation, op_target, e.message)
            })
            .collect();

        let op_w = rows
            .iter()
            .map(|(_, _, _, t, _)| t.chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = rows
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rows.iter().map(|(_, d, ..)| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in rows {
            let color = color_for_operation(&operation);
            let visible = truncate_visible(&op_target);

            // only the operation word is coloured
            let painted = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&painted).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                painted,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_codes_are_stripped() {
        let painted = Colour::Green.paint("create").to_string();
        assert_eq!(strip_ansi(&painted), "create");
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(80);
        let t = truncate_visible(&long);
        assert_eq!(t.chars().count(), MAX_OP_WIDTH);
        assert!(t.ends_with("..."));
    }
}
