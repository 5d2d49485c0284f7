use crate::cli::parser::InspectionCmd;
use crate::config::Config;
use crate::core::inspection::InspectionLogic;
use crate::core::response::ResponseLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::inspection::{
    CreateInspectionRequest, Inspection, InspectionFilter, SubmitInspectionRequest,
    UpdateInspectionRequest,
};
use crate::ui::messages::{info, success};
use crate::utils::colors::{CYAN, RESET, color_for_status};
use crate::utils::or_dash;
use crate::utils::table::{Column, Table};

pub fn handle(action: &InspectionCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        InspectionCmd::List {
            status,
            area,
            site,
            page,
            size,
        } => {
            let filter = InspectionFilter {
                status: status.as_deref().map(str::parse).transpose()?,
                area: area.as_deref().map(str::parse).transpose()?,
                site_code: site.clone(),
            };
            let result = InspectionLogic::list(&pool, cfg, &filter, *page, *size)?;

            if result.inspections.is_empty() {
                info("No inspections found.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("SO", 8),
                Column::new("UNIT", 7),
                Column::new("SITE", 5),
                Column::new("SITE NAME", 12),
                Column::new("DATE", 10),
                Column::new("STATUS", 10),
                Column::new("ADDRESS", 20),
            ]);
            for row in &result.inspections {
                table.add_row(vec![
                    row.so_number.clone(),
                    row.unit_number.clone(),
                    row.site_code.clone(),
                    or_dash(row.site_name.as_deref()),
                    or_dash(row.so_date.as_deref()),
                    row.status.to_string(),
                    row.address.clone(),
                ]);
            }
            println!("{}", table.render());
            println!(
                "\nPage {} of {} ({} inspection(s))",
                result.page + 1,
                result.total_pages.max(1),
                result.total_elements
            );
        }

        InspectionCmd::Show { so } => {
            let inspection = InspectionLogic::get(&pool, so)?;
            print_inspection(&inspection);
            let progress = ResponseLogic::progress(&pool, so)?;
            println!(
                "{}Checklist:{} {}/{} answered, {} deficiencies",
                CYAN, RESET, progress.answered, progress.total, progress.deficiencies
            );
        }

        InspectionCmd::Create {
            unit,
            site_code,
            site_name,
            address,
            division,
            tenant,
            tenant_phone,
            br_size,
            hardwired,
            inspector,
            date,
            time,
        } => {
            let req = CreateInspectionRequest {
                unit_number: unit.clone(),
                site_code: site_code.clone(),
                site_name: site_name.clone(),
                address: address.clone(),
                division_code: division.clone(),
                tenant_name: tenant.clone(),
                tenant_phone: tenant_phone.clone(),
                br_size: *br_size,
                is_hardwired: Some(*hardwired),
                inspector_id: inspector.clone(),
                start_date: date.clone(),
                start_time: time.clone(),
                ..Default::default()
            };
            let so_number = InspectionLogic::create(&pool, cfg, req)?;
            success(format!("Inspection created: SO {so_number}"));
        }

        InspectionCmd::Update {
            so,
            status,
            start_time,
            end_date,
            end_time,
            tenant,
            tenant_phone,
            tenant_available,
            smoke_detectors,
            co_detectors,
        } => {
            let req = UpdateInspectionRequest {
                status: status.as_deref().map(str::parse).transpose()?,
                start_time: start_time.clone(),
                end_date: end_date.clone(),
                end_time: end_time.clone(),
                tenant_name: tenant.clone(),
                tenant_phone: tenant_phone.clone(),
                tenant_availability: *tenant_available,
                smoke_detectors_count: *smoke_detectors,
                co_detectors_count: *co_detectors,
                ..Default::default()
            };
            let updated = InspectionLogic::update(&pool, so, req)?;
            success(format!("Inspection {} updated ({})", so, updated.status));
        }

        InspectionCmd::Submit {
            so,
            end_time,
            completion_date,
        } => {
            let req = SubmitInspectionRequest {
                end_time: end_time.clone(),
                completion_date: completion_date.clone(),
            };
            let closed = InspectionLogic::submit(&pool, so, req)?;
            success(format!(
                "Inspection {} submitted, completed on {}",
                so,
                or_dash(closed.completion_date.as_deref())
            ));
        }
    }

    Ok(())
}

fn print_inspection(i: &Inspection) {
    let field = |label: &str, value: String| println!("{}{:<14}{} {}", CYAN, label, RESET, value);

    println!();
    field("SO number", i.so_number.clone());
    field(
        "Status",
        format!("{}{}{}", color_for_status(i.status.as_str()), i.status, RESET),
    );
    field("Unit", i.unit_number.clone());
    field(
        "Site",
        format!("{} {}", i.site_code, or_dash(i.site_name.as_deref())),
    );
    field("Address", i.address.clone());
    field("Division", or_dash(i.division_code.as_deref()));
    field("Tenant", or_dash(i.tenant_name.as_deref()));
    field("Phone", or_dash(i.tenant_phone.as_deref()));
    field("Inspector", or_dash(i.inspector_name.as_deref()));
    field("Start", format!(
        "{} {}",
        or_dash(i.start_date.as_deref()),
        or_dash(i.start_time.as_deref())
    ));
    field("End", format!(
        "{} {}",
        or_dash(i.end_date.as_deref()),
        or_dash(i.end_time.as_deref())
    ));
    field("Completed", or_dash(i.completion_date.as_deref()));
    field("Smoke / CO", format!(
        "{} / {}",
        or_dash(i.smoke_detectors_count),
        or_dash(i.co_detectors_count)
    ));
    println!();
}
