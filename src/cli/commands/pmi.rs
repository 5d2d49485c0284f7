use crate::cli::parser::PmiCmd;
use crate::config::Config;
use crate::core::catalog::CatalogLogic;
use crate::core::pmi::PmiLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::pmi::CreatePmiResponseRequest;
use crate::ui::messages::{info, success};
use crate::utils::or_dash;
use crate::utils::table::{Column, Table};

pub fn handle(action: &PmiCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        PmiCmd::Categories => {
            let mut table = Table::new(vec![Column::new("ID", 6), Column::new("CATEGORY", 24)]);
            for c in CatalogLogic::pmi_categories(&pool)? {
                table.add_row(vec![c.category_id, c.name]);
            }
            println!("{}", table.render());
        }

        PmiCmd::Items { category } => {
            let mut table = Table::new(vec![Column::new("ITEM", 7), Column::new("TASK", 40)]);
            for i in CatalogLogic::pmi_items(&pool, category)? {
                table.add_row(vec![i.item_id, i.description]);
            }
            println!("{}", table.render());
        }

        PmiCmd::Set {
            so,
            item,
            category,
            pending,
            notes,
        } => {
            let req = CreatePmiResponseRequest {
                item_id: item.clone(),
                category_id: category.clone(),
                completed: Some(!*pending),
                notes: notes.clone(),
            };
            let saved = PmiLogic::save(&pool, so, &req)?;
            success(format!(
                "PMI task {} {} for {}",
                saved.item_id,
                if saved.completed { "completed" } else { "left open" },
                so
            ));
        }

        PmiCmd::List { so } => {
            let results = PmiLogic::list(&pool, so)?;
            if results.is_empty() {
                info(format!("No PMI results recorded for {so}."));
                return Ok(());
            }
            let mut table = Table::new(vec![
                Column::new("ITEM", 7),
                Column::new("CATEGORY", 8),
                Column::new("DONE", 4),
                Column::new("NOTES", 30),
            ]);
            for r in results {
                table.add_row(vec![
                    r.item_id,
                    r.category_id,
                    if r.completed { "yes" } else { "no" }.to_string(),
                    or_dash(r.notes.as_deref()),
                ]);
            }
            println!("{}", table.render());
        }

        PmiCmd::Del { so, item } => {
            PmiLogic::delete(&pool, so, item)?;
            success(format!("PMI result {so}/{item} deleted"));
        }
    }

    Ok(())
}
