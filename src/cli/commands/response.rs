use crate::cli::parser::ResponseCmd;
use crate::config::Config;
use crate::core::response::ResponseLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::response::{CreateResponseRequest, InspectionResponse};
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_outcome};
use crate::utils::or_dash;
use crate::utils::table::{Column, Table};

pub fn handle(action: &ResponseCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        ResponseCmd::Set {
            so,
            item,
            response,
            scope_of_work,
            material_description,
            service_id,
            activity_code,
            tenant_charge,
            urgent,
            rrp,
        } => {
            let req = CreateResponseRequest {
                item_id: item.clone(),
                response: response.clone(),
                scope_of_work: scope_of_work.clone(),
                material_required: Some(material_description.is_some()),
                material_description: material_description.clone(),
                service_id: service_id.clone(),
                activity_code: activity_code.clone(),
                tenant_charge: Some(*tenant_charge),
                urgent: Some(*urgent),
                rrp: Some(*rrp),
            };
            let saved = ResponseLogic::save(&pool, so, &req)?;
            success(format!(
                "Response {} recorded for {}/{}",
                saved.outcome.kind(),
                so,
                saved.item_id
            ));
        }

        ResponseCmd::List { so } => {
            let responses = ResponseLogic::list(&pool, so)?;
            if responses.is_empty() {
                info(format!("No responses recorded for {so}."));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ITEM", 6),
                Column::new("RESULT", 6),
                Column::new("SCOPE OF WORK", 30),
                Column::new("URGENT", 6),
            ]);
            for r in &responses {
                let def = r.outcome.deficiency();
                table.add_row(vec![
                    r.item_id.clone(),
                    r.outcome.kind().to_string(),
                    or_dash(def.map(|d| d.scope_of_work.as_str())),
                    if def.is_some_and(|d| d.urgent) { "yes" } else { "" }.to_string(),
                ]);
            }
            println!("{}", table.render());
        }

        ResponseCmd::Show { so, item } => {
            let r = ResponseLogic::get(&pool, so, item)?;
            print_response(&r);
        }

        ResponseCmd::Del { so, item } => {
            ResponseLogic::delete(&pool, so, item)?;
            success(format!("Response {so}/{item} deleted"));
        }

        ResponseCmd::Progress { so } => {
            let p = ResponseLogic::progress(&pool, so)?;
            println!(
                "{}: {}/{} items answered, {} deficiencies{}",
                p.so_number,
                p.answered,
                p.total,
                p.deficiencies,
                if p.is_complete() { " (complete)" } else { "" }
            );
        }
    }

    Ok(())
}

fn print_response(r: &InspectionResponse) {
    let kind = r.outcome.kind();
    println!(
        "{}/{}: {}{}{}",
        r.so_number,
        r.item_id,
        color_for_outcome(kind),
        kind,
        RESET
    );
    if let Some(d) = r.outcome.deficiency() {
        println!("  Scope of work : {}", d.scope_of_work);
        println!("  Service       : {}", d.service_id);
        println!("  Activity      : {}", d.activity_code);
        println!("  Material      : {}", or_dash(d.material_description.as_deref()));
        println!(
            "  Flags         : tenant charge={} urgent={} rrp={}",
            d.tenant_charge, d.urgent, d.rrp
        );
    }
    println!("  Recorded      : {}", r.created_at);
}
