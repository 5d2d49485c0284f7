use crate::cli::parser::AreaCmd;
use crate::config::Config;
use crate::core::catalog::CatalogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::table::{Column, Table};

pub fn handle(action: &AreaCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        AreaCmd::List => {
            let mut table = Table::new(vec![Column::new("#", 3), Column::new("AREA", 24)]);
            for area in CatalogLogic::areas(&pool)? {
                table.add_row(vec![area.sort_order.to_string(), area.area_name]);
            }
            println!("{}", table.render());
        }
        AreaCmd::Items { area } => {
            let items = CatalogLogic::items(&pool, area)?;
            let mut table = Table::new(vec![
                Column::new("ITEM", 8),
                Column::new("DESCRIPTION", 40),
            ]);
            for item in items {
                table.add_row(vec![item.item_id, item.description]);
            }
            println!("📋 {area}\n");
            println!("{}", table.render());
        }
    }

    Ok(())
}
