use crate::models::attachment::{InspectionImage, InspectionSignature};
use crate::models::inspection::Inspection;
use crate::models::pmi::PmiResponse;
use crate::models::response::InspectionResponse;
use serde::Serialize;

/// One CSV line per inspection.
#[derive(Serialize, Clone, Debug)]
pub struct InspectionExportRow {
    pub so_number: String,
    pub unit_number: String,
    pub site_code: String,
    pub site_name: String,
    pub address: String,
    pub division_code: String,
    pub status: String,
    pub inspector_id: String,
    pub start_date: String,
    pub completion_date: String,
    pub responses: usize,
    pub deficiencies: usize,
    pub pmi_completed: usize,
    pub images: usize,
    pub signatures: usize,
}

/// Full inspection with its child records, for JSON.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InspectionExport {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub responses: Vec<InspectionResponse>,
    pub pmi_responses: Vec<PmiResponse>,
    pub images: Vec<InspectionImage>,
    pub signatures: Vec<InspectionSignature>,
}

impl From<&InspectionExport> for InspectionExportRow {
    fn from(e: &InspectionExport) -> Self {
        let i = &e.inspection;
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            so_number: i.so_number.clone(),
            unit_number: i.unit_number.clone(),
            site_code: i.site_code.clone(),
            site_name: text(&i.site_name),
            address: i.address.clone(),
            division_code: text(&i.division_code),
            status: i.status.to_string(),
            inspector_id: text(&i.inspector_id),
            start_date: text(&i.start_date),
            completion_date: text(&i.completion_date),
            responses: e.responses.len(),
            deficiencies: e
                .responses
                .iter()
                .filter(|r| r.outcome.is_deficiency())
                .count(),
            pmi_completed: e.pmi_responses.iter().filter(|p| p.completed).count(),
            images: e.images.len(),
            signatures: e.signatures.len(),
        }
    }
}
