//! Preventive maintenance checklist: categories, items and responses.

use super::inspection_pk;
use crate::db::store::{Entity, ItemKey, METADATA};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub fn category_pk(category_id: &str) -> String {
    format!("PMI_CATEGORY#{category_id}")
}

pub fn pmi_response_sk(item_id: &str) -> String {
    format!("PMI#{item_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmiCategory {
    pub category_id: String,
    pub name: String,
    pub sort_order: u32,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl Entity for PmiCategory {
    const ENTITY_TYPE: &'static str = "PMICategory";

    fn key(&self) -> ItemKey {
        ItemKey::new(category_pk(&self.category_id), METADATA)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmiItem {
    pub item_id: String,
    pub category_id: String,
    pub description: String,
    pub sort_order: u32,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl Entity for PmiItem {
    const ENTITY_TYPE: &'static str = "PMIItem";

    fn key(&self) -> ItemKey {
        ItemKey::new(category_pk(&self.category_id), format!("ITEM#{}", self.item_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmiResponse {
    pub so_number: String,
    pub item_id: String,
    pub category_id: String,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: String,
}

impl Entity for PmiResponse {
    const ENTITY_TYPE: &'static str = "PMIResponse";

    fn key(&self) -> ItemKey {
        ItemKey::new(inspection_pk(&self.so_number), pmi_response_sk(&self.item_id))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePmiResponseRequest {
    pub item_id: String,
    pub category_id: String,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

impl CreatePmiResponseRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        if self.item_id.trim().is_empty() {
            missing.push("itemId is required");
        }
        if self.category_id.trim().is_empty() {
            missing.push("categoryId is required");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(missing))
        }
    }
}
