use crate::cli::parser::InspectorCmd;
use crate::config::Config;
use crate::core::inspector::InspectorLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::inspector::CreateInspectorRequest;
use crate::ui::messages::{info, success};
use crate::utils::or_dash;
use crate::utils::table::{Column, Table};

pub fn handle(action: &InspectorCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        InspectorCmd::Add {
            id,
            name,
            vehicle_tag,
        } => {
            let inspector = InspectorLogic::create(
                &pool,
                CreateInspectorRequest {
                    inspector_id: id.clone(),
                    name: name.clone(),
                    vehicle_tag_id: vehicle_tag.clone(),
                },
            )?;
            success(format!(
                "Inspector {} registered ({})",
                inspector.inspector_id, inspector.name
            ));
        }

        InspectorCmd::List => {
            let inspectors = InspectorLogic::list(&pool)?;
            if inspectors.is_empty() {
                info("No inspectors registered.");
                return Ok(());
            }
            let mut table = Table::new(vec![
                Column::new("ID", 8),
                Column::new("NAME", 20),
                Column::new("VEHICLE", 8),
                Column::new("ACTIVE", 6),
            ]);
            for i in inspectors {
                table.add_row(vec![
                    i.inspector_id,
                    i.name,
                    or_dash(i.vehicle_tag_id.as_deref()),
                    if i.active { "yes" } else { "no" }.to_string(),
                ]);
            }
            println!("{}", table.render());
        }

        InspectorCmd::Deactivate { id } => {
            InspectorLogic::set_active(&pool, id, false)?;
            success(format!("Inspector {id} deactivated"));
        }
    }

    Ok(())
}
