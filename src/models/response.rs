//! Checklist responses.
//!
//! A response is one of three outcomes. Only a deficiency carries repair
//! details, so the details live inside the `Deficiency` variant rather than
//! as optional fields next to the tag.

use super::inspection_pk;
use crate::db::store::{Entity, ItemKey};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub fn response_sk(item_id: &str) -> String {
    format!("RESPONSE#{item_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deficiency {
    pub scope_of_work: String,
    #[serde(default)]
    pub material_required: bool,
    pub material_description: Option<String>,
    pub service_id: String,
    pub activity_code: String,
    #[serde(default)]
    pub tenant_charge: bool,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub rrp: bool,
}

/// Serialized with the client tag: `"response": "OK" | "NA" | "Def"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response")]
pub enum ResponseOutcome {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NA")]
    Na,
    #[serde(rename = "Def")]
    Deficiency(Deficiency),
}

impl ResponseOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Na => "NA",
            Self::Deficiency(_) => "Def",
        }
    }

    pub fn deficiency(&self) -> Option<&Deficiency> {
        match self {
            Self::Deficiency(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_deficiency(&self) -> bool {
        self.deficiency().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResponse {
    pub so_number: String,
    pub item_id: String,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
    pub created_at: String,
}

impl Entity for InspectionResponse {
    const ENTITY_TYPE: &'static str = "InspectionResponse";

    fn key(&self) -> ItemKey {
        ItemKey::new(inspection_pk(&self.so_number), response_sk(&self.item_id))
    }
}

/// Flat request body as the clients send it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateResponseRequest {
    pub item_id: String,
    pub response: String,
    pub scope_of_work: Option<String>,
    pub material_required: Option<bool>,
    pub material_description: Option<String>,
    pub service_id: Option<String>,
    pub activity_code: Option<String>,
    pub tenant_charge: Option<bool>,
    pub urgent: Option<bool>,
    pub rrp: Option<bool>,
}

fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl CreateResponseRequest {
    /// Turn the flat body into a typed outcome. Every problem is reported in
    /// one validation error. Deficiency fields sent with OK/NA are dropped.
    pub fn to_outcome(&self) -> AppResult<ResponseOutcome> {
        let mut errors = Vec::new();
        if self.item_id.trim().is_empty() {
            errors.push("itemId is required".to_string());
        }

        let kind = self.response.trim().to_ascii_uppercase();
        let outcome = match kind.as_str() {
            "OK" => Some(ResponseOutcome::Ok),
            "NA" => Some(ResponseOutcome::Na),
            "DEF" => {
                let scope = non_blank(&self.scope_of_work);
                let service = non_blank(&self.service_id);
                let activity = non_blank(&self.activity_code);
                if scope.is_none() {
                    errors.push("scopeOfWork is required for a deficiency".to_string());
                }
                if service.is_none() {
                    errors.push("serviceId is required for a deficiency".to_string());
                }
                if activity.is_none() {
                    errors.push("activityCode is required for a deficiency".to_string());
                }
                match (scope, service, activity) {
                    (Some(scope_of_work), Some(service_id), Some(activity_code)) => {
                        Some(ResponseOutcome::Deficiency(Deficiency {
                            scope_of_work,
                            material_required: self.material_required.unwrap_or(false),
                            material_description: non_blank(&self.material_description),
                            service_id,
                            activity_code,
                            tenant_charge: self.tenant_charge.unwrap_or(false),
                            urgent: self.urgent.unwrap_or(false),
                            rrp: self.rrp.unwrap_or(false),
                        }))
                    }
                    _ => None,
                }
            }
            _ => {
                errors.push(format!(
                    "response must be OK, NA or Def (got '{}')",
                    self.response
                ));
                None
            }
        };

        match outcome {
            Some(o) if errors.is_empty() => Ok(o),
            _ => Err(AppError::validation(errors)),
        }
    }
}

/// How far the main checklist of one inspection has been answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseProgress {
    pub so_number: String,
    pub answered: usize,
    pub total: usize,
    pub deficiencies: usize,
}

impl ResponseProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.answered >= self.total
    }
}
