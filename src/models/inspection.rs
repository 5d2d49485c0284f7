use super::dashboard::ServiceArea;
use super::inspection_pk;
use crate::db::store::{Entity, IndexKeys, ItemKey, METADATA};
use crate::errors::{AppError, AppResult};
use crate::utils::{date, time};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of an inspection. Status only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum InspectionStatus {
    New,
    InProgress,
    Closed,
}

impl InspectionStatus {
    pub const ALL: [InspectionStatus; 3] = [Self::New, Self::InProgress, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "InProgress",
            Self::Closed => "Closed",
        }
    }

    /// Whether `self -> next` is a legal move. Staying put is handled by
    /// the caller as a no-op.
    pub fn can_transition_to(&self, next: InspectionStatus) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::InProgress) | (Self::New, Self::Closed) | (Self::InProgress, Self::Closed)
        )
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspectionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "inprogress" | "in-progress" | "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for InspectionStatus {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub so_number: String,
    pub unit_number: String,
    #[serde(default)]
    pub site_code: String,
    pub site_name: Option<String>,
    #[serde(default)]
    pub address: String,
    pub division_code: Option<String>,
    pub tenant_name: Option<String>,
    pub tenant_phone: Option<String>,
    #[serde(default = "super::default_true")]
    pub tenant_availability: bool,
    pub br_size: Option<u32>,
    #[serde(default)]
    pub is_hardwired: bool,
    pub inspector_id: Option<String>,
    pub inspector_name: Option<String>,
    pub vehicle_tag_id: Option<String>,
    pub status: InspectionStatus,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub submit_time: Option<String>,
    pub completion_date: Option<String>,
    pub smoke_detectors_count: Option<u32>,
    pub co_detectors_count: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Entity for Inspection {
    const ENTITY_TYPE: &'static str = "Inspection";

    fn key(&self) -> ItemKey {
        ItemKey::new(inspection_pk(&self.so_number), METADATA)
    }

    fn index_keys(&self) -> IndexKeys {
        let date_sk = format!("DATE#{}", self.start_date.as_deref().unwrap_or(""));
        IndexKeys {
            gsi1: Some((
                format!("UNIT#{}", self.unit_number),
                format!("INSPECTION#{}", self.so_number),
            )),
            gsi2: Some((format!("STATUS#{}", self.status), date_sk.clone())),
            gsi3: self
                .inspector_id
                .as_ref()
                .filter(|id| !id.is_empty())
                .map(|id| (format!("INSPECTOR#{id}"), date_sk)),
        }
    }
}

impl Inspection {
    /// Numeric SO for ordering; non-numeric numbers sort last.
    pub fn so_sort_key(&self) -> (u64, &str) {
        (self.so_number.parse().unwrap_or(u64::MAX), &self.so_number)
    }

    pub fn in_area(&self, area: ServiceArea) -> bool {
        area.contains_site(&self.site_code)
    }
}

/// Row of the inspection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSummary {
    pub so_number: String,
    pub unit_number: String,
    pub so_date: Option<String>,
    pub division_code: Option<String>,
    pub site_code: String,
    pub site_name: Option<String>,
    pub tenant_name: Option<String>,
    pub address: String,
    pub completion_date: Option<String>,
    pub status: InspectionStatus,
}

impl From<&Inspection> for InspectionSummary {
    fn from(i: &Inspection) -> Self {
        Self {
            so_number: i.so_number.clone(),
            unit_number: i.unit_number.clone(),
            so_date: i.start_date.clone(),
            division_code: i.division_code.clone(),
            site_code: i.site_code.clone(),
            site_name: i.site_name.clone(),
            tenant_name: i.tenant_name.clone(),
            address: i.address.clone(),
            completion_date: i.completion_date.clone(),
            status: i.status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateInspectionRequest {
    pub unit_number: String,
    pub site_code: String,
    pub site_name: Option<String>,
    pub address: String,
    pub division_code: Option<String>,
    pub tenant_name: Option<String>,
    pub tenant_phone: Option<String>,
    pub tenant_availability: Option<bool>,
    pub br_size: Option<u32>,
    pub is_hardwired: Option<bool>,
    pub inspector_id: Option<String>,
    pub inspector_name: Option<String>,
    pub vehicle_tag_id: Option<String>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
}

impl CreateInspectionRequest {
    /// Check required fields (all reported together) and normalize the
    /// schedule fields.
    pub fn validate(&mut self) -> AppResult<()> {
        let mut missing = Vec::new();
        if self.unit_number.trim().is_empty() {
            missing.push("unitNumber is required");
        }
        if self.site_code.trim().is_empty() {
            missing.push("siteCode is required");
        }
        if self.address.trim().is_empty() {
            missing.push("address is required");
        }
        if !missing.is_empty() {
            return Err(AppError::validation(missing));
        }

        self.start_date = date::validate_optional_date(self.start_date.as_deref())?;
        self.start_time = time::normalize_optional_time(self.start_time.as_deref())?;
        Ok(())
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateInspectionRequest {
    pub status: Option<InspectionStatus>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub submit_time: Option<String>,
    pub completion_date: Option<String>,
    pub tenant_name: Option<String>,
    pub tenant_phone: Option<String>,
    pub tenant_availability: Option<bool>,
    pub smoke_detectors_count: Option<u32>,
    pub co_detectors_count: Option<u32>,
}

impl UpdateInspectionRequest {
    pub fn validate(&mut self) -> AppResult<()> {
        self.start_time = time::normalize_optional_time(self.start_time.as_deref())?;
        self.end_time = time::normalize_optional_time(self.end_time.as_deref())?;
        self.end_date = date::validate_optional_date(self.end_date.as_deref())?;
        self.completion_date = date::validate_optional_date(self.completion_date.as_deref())?;
        if let Some(ts) = &self.submit_time
            && chrono::DateTime::parse_from_rfc3339(ts).is_err()
        {
            return Err(AppError::validation([format!(
                "submitTime must be an RFC 3339 timestamp: {ts}"
            )]));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitInspectionRequest {
    pub end_time: Option<String>,
    pub completion_date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InspectionFilter {
    pub status: Option<InspectionStatus>,
    pub area: Option<ServiceArea>,
    pub site_code: Option<String>,
}

impl InspectionFilter {
    pub fn matches(&self, i: &Inspection) -> bool {
        self.status.is_none_or(|s| i.status == s)
            && self.area.is_none_or(|a| i.in_area(a))
            && self
                .site_code
                .as_deref()
                .is_none_or(|code| i.site_code == code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionPage {
    pub inspections: Vec<InspectionSummary>,
    pub total_elements: usize,
    pub page: usize,
    pub size: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInspection {
    pub so_number: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_lenient() {
        assert_eq!("new".parse::<InspectionStatus>().unwrap(), InspectionStatus::New);
        assert_eq!(
            "in-progress".parse::<InspectionStatus>().unwrap(),
            InspectionStatus::InProgress
        );
        assert_eq!(
            "IN_PROGRESS".parse::<InspectionStatus>().unwrap(),
            InspectionStatus::InProgress
        );
        assert!("done".parse::<InspectionStatus>().is_err());
    }

    #[test]
    fn status_wire_format() {
        let s = serde_json::to_string(&InspectionStatus::InProgress).unwrap();
        assert_eq!(s, "\"InProgress\"");
        let back: InspectionStatus = serde_json::from_str("\"Closed\"").unwrap();
        assert_eq!(back, InspectionStatus::Closed);
    }

    #[test]
    fn transitions_only_move_forward() {
        use InspectionStatus::*;
        assert!(New.can_transition_to(InProgress));
        assert!(New.can_transition_to(Closed));
        assert!(InProgress.can_transition_to(Closed));
        assert!(!InProgress.can_transition_to(New));
        assert!(!Closed.can_transition_to(InProgress));
        assert!(!New.can_transition_to(New));
    }

    #[test]
    fn create_request_reports_all_missing_fields() {
        let mut req = CreateInspectionRequest::default();
        let err = req.validate().unwrap_err().to_string();
        assert!(err.contains("unitNumber"));
        assert!(err.contains("siteCode"));
        assert!(err.contains("address"));
    }

    #[test]
    fn create_request_normalizes_start_time() {
        let mut req = CreateInspectionRequest {
            unit_number: "041529".into(),
            site_code: "901".into(),
            address: "123 Main St".into(),
            start_date: Some("2025-05-02".into()),
            start_time: Some("08:30".into()),
            ..Default::default()
        };
        req.validate().unwrap();
        assert_eq!(req.start_time.as_deref(), Some("08:30:00"));

        req.start_date = Some("May 2".into());
        assert!(matches!(req.validate(), Err(AppError::InvalidDate(_))));
    }
}
