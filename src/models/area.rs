//! Checklist taxonomy: inspection areas and the items inside them.

use crate::db::store::{Entity, ItemKey, METADATA};
use serde::{Deserialize, Serialize};

pub fn area_pk(area_name: &str) -> String {
    format!("AREA#{area_name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionArea {
    pub area_name: String,
    pub sort_order: u32,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl Entity for InspectionArea {
    const ENTITY_TYPE: &'static str = "InspectionArea";

    fn key(&self) -> ItemKey {
        ItemKey::new(area_pk(&self.area_name), METADATA)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionItem {
    pub item_id: String,
    pub area_name: String,
    pub description: String,
    pub sort_order: u32,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl Entity for InspectionItem {
    const ENTITY_TYPE: &'static str = "InspectionItem";

    fn key(&self) -> ItemKey {
        ItemKey::new(area_pk(&self.area_name), format!("ITEM#{}", self.item_id))
    }
}
