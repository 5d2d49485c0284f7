use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{self, ItemKey, METADATA};
use crate::errors::{AppError, AppResult};
use crate::models::inspection::{
    CreateInspectionRequest, Inspection, InspectionFilter, InspectionPage, InspectionStatus,
    InspectionSummary, SubmitInspectionRequest, UpdateInspectionRequest,
};
use crate::models::inspection_pk;
use crate::models::inspector::Inspector;
use crate::utils::date::{today_str, validate_optional_date};
use crate::utils::time::{normalize_optional_time, now_iso};

pub const SO_COUNTER: &str = "so_number";

fn inspection_key(so_number: &str) -> ItemKey {
    ItemKey::new(inspection_pk(so_number), METADATA)
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

pub struct InspectionLogic;

impl InspectionLogic {
    /// Filtered page of inspections ordered by SO number. Pages are 0-based.
    pub fn list(
        pool: &DbPool,
        cfg: &Config,
        filter: &InspectionFilter,
        page: usize,
        size: Option<usize>,
    ) -> AppResult<InspectionPage> {
        let size = size.unwrap_or(cfg.page_size);
        if size == 0 {
            return Err(AppError::validation(["size must be greater than 0"]));
        }

        let mut all: Vec<Inspection> = store::scan_as(&pool.conn)?;
        all.retain(|i| filter.matches(i));
        all.sort_by(|a, b| a.so_sort_key().cmp(&b.so_sort_key()));

        let total_elements = all.len();
        let total_pages = total_elements.div_ceil(size);
        let inspections = all
            .iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .map(InspectionSummary::from)
            .collect();

        Ok(InspectionPage {
            inspections,
            total_elements,
            page,
            size,
            total_pages,
        })
    }

    pub fn get(pool: &DbPool, so_number: &str) -> AppResult<Inspection> {
        store::get(&pool.conn, &inspection_key(so_number))?
            .ok_or_else(|| AppError::not_found("Inspection", so_number))
    }

    /// Load the inspection for a write on one of its child records.
    pub fn ensure_editable(pool: &DbPool, so_number: &str) -> AppResult<Inspection> {
        let inspection = Self::get(pool, so_number)?;
        if inspection.status.is_closed() {
            return Err(AppError::InspectionClosed(so_number.to_string()));
        }
        Ok(inspection)
    }

    /// Create a New inspection and return its SO number.
    pub fn create(
        pool: &DbPool,
        cfg: &Config,
        mut req: CreateInspectionRequest,
    ) -> AppResult<String> {
        req.validate()?;

        let inspector_id = blank_to_none(req.inspector_id.take());
        let mut inspector_name = blank_to_none(req.inspector_name.take());
        let mut vehicle_tag_id = blank_to_none(req.vehicle_tag_id.take());

        if let Some(id) = &inspector_id
            && (inspector_name.is_none() || vehicle_tag_id.is_none())
        {
            let key = ItemKey::new(format!("INSPECTOR#{id}"), METADATA);
            if let Some(ins) = store::get::<Inspector>(&pool.conn, &key)? {
                inspector_name = inspector_name.or(Some(ins.name));
                vehicle_tag_id = vehicle_tag_id.or(ins.vehicle_tag_id);
            }
        }

        let so_number = store::next_sequence(&pool.conn, SO_COUNTER, cfg.so_number_seed)?.to_string();
        let now = now_iso();

        let inspection = Inspection {
            so_number: so_number.clone(),
            unit_number: req.unit_number.trim().to_string(),
            site_code: req.site_code.trim().to_string(),
            site_name: blank_to_none(req.site_name),
            address: req.address.trim().to_string(),
            division_code: blank_to_none(req.division_code),
            tenant_name: blank_to_none(req.tenant_name),
            tenant_phone: blank_to_none(req.tenant_phone),
            tenant_availability: req.tenant_availability.unwrap_or(true),
            br_size: req.br_size,
            is_hardwired: req.is_hardwired.unwrap_or(false),
            inspector_id,
            inspector_name,
            vehicle_tag_id,
            status: InspectionStatus::New,
            start_date: req.start_date,
            start_time: req.start_time,
            end_date: None,
            end_time: None,
            submit_time: None,
            completion_date: None,
            smoke_detectors_count: None,
            co_detectors_count: None,
            created_at: now.clone(),
            updated_at: now,
        };

        store::put(&pool.conn, &inspection)?;
        ttlog(
            &pool.conn,
            "create",
            &so_number,
            &format!("Inspection created for unit {}", inspection.unit_number),
        )?;
        tracing::info!(so_number = %so_number, unit = %inspection.unit_number, "inspection created");

        Ok(so_number)
    }

    /// Partial update. Closed inspections are immutable and status only
    /// moves forward.
    pub fn update(
        pool: &DbPool,
        so_number: &str,
        mut req: UpdateInspectionRequest,
    ) -> AppResult<Inspection> {
        req.validate()?;
        let mut inspection = Self::ensure_editable(pool, so_number)?;
        let previous = inspection.status;

        if let Some(next) = req.status
            && next != previous
        {
            if !previous.can_transition_to(next) {
                return Err(AppError::InvalidTransition {
                    so_number: so_number.to_string(),
                    from: previous.to_string(),
                    to: next.to_string(),
                });
            }
            inspection.status = next;
            if next.is_closed() {
                inspection.submit_time = Some(req.submit_time.clone().unwrap_or_else(now_iso));
            }
        }

        if req.start_time.is_some() {
            inspection.start_time = req.start_time;
        }
        if req.end_date.is_some() {
            inspection.end_date = req.end_date;
        }
        if req.end_time.is_some() {
            inspection.end_time = req.end_time;
        }
        if req.submit_time.is_some() {
            inspection.submit_time = req.submit_time;
        }
        if req.completion_date.is_some() {
            inspection.completion_date = req.completion_date;
        }
        if req.tenant_name.is_some() {
            inspection.tenant_name = req.tenant_name;
        }
        if req.tenant_phone.is_some() {
            inspection.tenant_phone = req.tenant_phone;
        }
        if let Some(a) = req.tenant_availability {
            inspection.tenant_availability = a;
        }
        if req.smoke_detectors_count.is_some() {
            inspection.smoke_detectors_count = req.smoke_detectors_count;
        }
        if req.co_detectors_count.is_some() {
            inspection.co_detectors_count = req.co_detectors_count;
        }

        inspection.updated_at = now_iso();
        store::put(&pool.conn, &inspection)?;

        let message = if inspection.status != previous {
            format!("Status {} -> {}", previous, inspection.status)
        } else {
            "Inspection updated".to_string()
        };
        ttlog(&pool.conn, "update", so_number, &message)?;
        tracing::info!(so_number, status = %inspection.status, "inspection updated");

        Ok(inspection)
    }

    /// Close the inspection. Completion and end dates default to today.
    pub fn submit(
        pool: &DbPool,
        so_number: &str,
        req: SubmitInspectionRequest,
    ) -> AppResult<Inspection> {
        let end_time = normalize_optional_time(req.end_time.as_deref())?;
        let completion_date = validate_optional_date(req.completion_date.as_deref())?;

        let mut inspection = Self::ensure_editable(pool, so_number)?;

        inspection.status = InspectionStatus::Closed;
        if end_time.is_some() {
            inspection.end_time = end_time;
        }
        inspection.completion_date = completion_date
            .or(inspection.completion_date.take())
            .or_else(|| Some(today_str()));
        if inspection.end_date.is_none() {
            inspection.end_date = Some(today_str());
        }
        let now = now_iso();
        inspection.submit_time = Some(now.clone());
        inspection.updated_at = now;

        store::put(&pool.conn, &inspection)?;
        ttlog(&pool.conn, "submit", so_number, "Inspection submitted and closed")?;
        tracing::info!(so_number, "inspection submitted");

        Ok(inspection)
    }
}
