//! Demo data: three inspectors and fifteen inspections spread over five
//! sites and every status.

use crate::config::Config;
use crate::core::inspection::SO_COUNTER;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{self, Entity};
use crate::errors::AppResult;
use crate::models::inspection::{Inspection, InspectionStatus};
use crate::models::inspector::Inspector;
use crate::utils::time::now_iso;

const INSPECTORS: &[(&str, &str, &str)] = &[
    ("INS001", "CASTOR_USER5", "Q"),
    ("INS002", "CASTOR_USER6", "R"),
    ("INS003", "CASTOR_USER7", "S"),
];

/// (unit, site code, site name, address, division, inspector idx, status, start date)
const INSPECTIONS: &[(&str, &str, &str, &str, &str, usize, InspectionStatus, &str)] = &[
    ("041529", "901", "Haddington", "123 Main St, Unit 041529", "D1", 0, InspectionStatus::New, "2025-05-02"),
    ("041530", "901", "Haddington", "125 Main St, Unit 041530", "D1", 0, InspectionStatus::New, "2025-05-02"),
    ("041531", "901", "Haddington", "127 Main St, Unit 041531", "D1", 1, InspectionStatus::InProgress, "2025-05-01"),
    ("042001", "902", "Mantua", "200 Oak St, Unit 042001", "D1", 0, InspectionStatus::New, "2025-05-03"),
    ("042002", "902", "Mantua", "202 Oak St, Unit 042002", "D1", 1, InspectionStatus::Closed, "2025-04-28"),
    ("050001", "903", "Strawberry Mansion", "300 Pine St, Unit 050001", "D2", 0, InspectionStatus::New, "2025-05-04"),
    ("050002", "903", "Strawberry Mansion", "302 Pine St, Unit 050002", "D2", 2, InspectionStatus::InProgress, "2025-05-02"),
    ("050003", "903", "Strawberry Mansion", "304 Pine St, Unit 050003", "D2", 2, InspectionStatus::Closed, "2025-04-25"),
    ("060001", "801", "Queen Lane", "400 Elm St, Unit 060001", "D3", 1, InspectionStatus::New, "2025-05-05"),
    ("060002", "801", "Queen Lane", "402 Elm St, Unit 060002", "D3", 1, InspectionStatus::InProgress, "2025-05-03"),
    ("060003", "801", "Queen Lane", "404 Elm St, Unit 060003", "D3", 0, InspectionStatus::Closed, "2025-04-20"),
    ("070001", "701", "Martin Luther King", "500 Maple St, Unit 070001", "D4", 2, InspectionStatus::New, "2025-05-06"),
    ("070002", "701", "Martin Luther King", "502 Maple St, Unit 070002", "D4", 2, InspectionStatus::InProgress, "2025-05-04"),
    ("070003", "701", "Martin Luther King", "504 Maple St, Unit 070003", "D4", 1, InspectionStatus::Closed, "2025-04-18"),
    ("070004", "701", "Martin Luther King", "506 Maple St, Unit 070004", "D4", 0, InspectionStatus::Closed, "2025-04-15"),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inspectors: usize,
    pub inspections: usize,
}

pub struct SeedLogic;

impl SeedLogic {
    /// Load the demo set. Inspectors already present are kept; inspections
    /// are only added to a database that has none.
    pub fn seed_demo(pool: &DbPool, cfg: &Config) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();
        let now = now_iso();

        for (id, name, tag) in INSPECTORS {
            let inspector = Inspector {
                inspector_id: id.to_string(),
                name: name.to_string(),
                vehicle_tag_id: Some(tag.to_string()),
                active: true,
                created_at: now.clone(),
            };
            if store::get_item(&pool.conn, &inspector.key())?.is_none() {
                store::put(&pool.conn, &inspector)?;
                report.inspectors += 1;
            }
        }

        if store::count(&pool.conn, Inspection::ENTITY_TYPE)? > 0 {
            tracing::info!("inspections present, demo inspections skipped");
            return Ok(report);
        }

        for (unit, site, site_name, address, division, ins, status, start) in INSPECTIONS {
            let so_number =
                store::next_sequence(&pool.conn, SO_COUNTER, cfg.so_number_seed)?.to_string();
            let (ins_id, ins_name, tag) = INSPECTORS[*ins];
            let started = *status != InspectionStatus::New;
            let closed = *status == InspectionStatus::Closed;

            let inspection = Inspection {
                so_number,
                unit_number: unit.to_string(),
                site_code: site.to_string(),
                site_name: Some(site_name.to_string()),
                address: address.to_string(),
                division_code: Some(division.to_string()),
                tenant_name: Some(format!("Tenant {unit}")),
                tenant_phone: Some(format!("+1215555{}", &unit[unit.len() - 4..])),
                tenant_availability: true,
                br_size: Some(2),
                is_hardwired: false,
                inspector_id: Some(ins_id.to_string()),
                inspector_name: Some(ins_name.to_string()),
                vehicle_tag_id: Some(tag.to_string()),
                status: *status,
                start_date: Some(start.to_string()),
                start_time: Some("08:30:00".to_string()),
                end_date: closed.then(|| start.to_string()),
                end_time: closed.then(|| "09:30:00".to_string()),
                submit_time: closed.then(|| now.clone()),
                completion_date: closed.then(|| start.to_string()),
                smoke_detectors_count: started.then_some(5),
                co_detectors_count: started.then_some(3),
                created_at: now.clone(),
                updated_at: now.clone(),
            };
            store::put(&pool.conn, &inspection)?;
            report.inspections += 1;
        }

        ttlog(
            &pool.conn,
            "seed",
            "",
            &format!(
                "Demo data loaded: {} inspectors, {} inspections",
                report.inspectors, report.inspections
            ),
        )?;
        Ok(report)
    }
}
