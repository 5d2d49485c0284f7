use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dashboard::DashboardLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::dashboard::DashboardFilter;
use crate::ui::messages::info;
use crate::utils::colors::{BLUE, GREEN, RESET, YELLOW};
use crate::utils::formatting::bold;
use crate::utils::or_dash;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dashboard {
        area,
        year,
        month,
        site,
        json,
    } = cmd
    {
        let filter = DashboardFilter {
            area: area.clone(),
            year: *year,
            month: *month,
            site_code: site.clone(),
        };

        let pool = DbPool::open(&cfg.database)?;
        let summary = DashboardLogic::summary(&pool, &filter)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        if summary.sites.is_empty() {
            info("No inspections match the selected filters.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("SITE", 5),
            Column::new("NAME", 20),
            Column::new("NEW", 5),
            Column::new("IN PROG", 7),
            Column::new("CLOSED", 6),
            Column::new("TOTAL", 5),
        ]);
        for s in &summary.sites {
            table.add_row(vec![
                s.site_code.clone(),
                or_dash(s.site_name.as_deref()),
                s.new_count.to_string(),
                s.in_progress_count.to_string(),
                s.closed_count.to_string(),
                s.total.to_string(),
            ]);
        }
        println!("{}", table.render());

        let t = &summary.totals;
        println!(
            "\n{}  {}New {}{}  {}In progress {}{}  {}Closed {}{}",
            bold(&format!("Total {}", t.total)),
            BLUE,
            t.new,
            RESET,
            YELLOW,
            t.in_progress,
            RESET,
            GREEN,
            t.closed,
            RESET
        );
    }

    Ok(())
}
