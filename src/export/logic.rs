use crate::core::attachment::AttachmentLogic;
use crate::core::pmi::PmiLogic;
use crate::core::response::ResponseLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::model::{InspectionExport, InspectionExportRow};
use crate::export::{ExportFormat, notify_export_success};
use crate::models::inspection::{Inspection, InspectionFilter};
use crate::ui::messages::warning;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// High level export of inspections.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the inspections matching `filter` to `file`.
    ///
    /// - `csv`: one summary row per inspection
    /// - `json`: every inspection with responses, PMI tasks and attachment
    ///   metadata (payloads are not included)
    ///
    /// Returns the number of exported inspections.
    pub fn export(
        pool: &DbPool,
        format: ExportFormat,
        file: &str,
        filter: &InspectionFilter,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let records = load_inspections(pool, filter)?;
        if records.is_empty() {
            warning("No inspections match the selected filters. Nothing to export.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&records, path)?,
            ExportFormat::Json => export_json(&records, path)?,
        }

        ttlog(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} inspection(s) exported as {}", records.len(), format.as_str()),
        )?;
        notify_export_success(&format.as_str().to_uppercase(), records.len(), path);

        Ok(records.len())
    }
}

fn load_inspections(pool: &DbPool, filter: &InspectionFilter) -> AppResult<Vec<InspectionExport>> {
    let mut inspections: Vec<Inspection> = store::scan_as(&pool.conn)?;
    inspections.retain(|i| filter.matches(i));
    inspections.sort_by(|a, b| a.so_sort_key().cmp(&b.so_sort_key()));

    inspections
        .into_iter()
        .map(|inspection| {
            let so = inspection.so_number.clone();
            Ok(InspectionExport {
                responses: ResponseLogic::list(pool, &so)?,
                pmi_responses: PmiLogic::list(pool, &so)?,
                images: AttachmentLogic::list_images(pool, &so)?,
                signatures: AttachmentLogic::list_signatures(pool, &so)?,
                inspection,
            })
        })
        .collect()
}

fn export_json(records: &[InspectionExport], path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(records)?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

fn export_csv(records: &[InspectionExport], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    for record in records {
        wtr.serialize(InspectionExportRow::from(record))
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;
    Ok(())
}
