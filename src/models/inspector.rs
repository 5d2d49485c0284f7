use crate::db::store::{Entity, IndexKeys, ItemKey, METADATA};
use serde::{Deserialize, Serialize};

pub const INSPECTORS_INDEX_PK: &str = "INSPECTORS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspector {
    pub inspector_id: String,
    pub name: String,
    pub vehicle_tag_id: Option<String>,
    #[serde(default = "super::default_true")]
    pub active: bool,
    pub created_at: String,
}

impl Entity for Inspector {
    const ENTITY_TYPE: &'static str = "Inspector";

    fn key(&self) -> ItemKey {
        ItemKey::new(format!("INSPECTOR#{}", self.inspector_id), METADATA)
    }

    fn index_keys(&self) -> IndexKeys {
        IndexKeys {
            gsi1: Some((
                INSPECTORS_INDEX_PK.to_string(),
                format!("INSPECTOR#{}", self.inspector_id),
            )),
            ..Default::default()
        }
    }
}

/// Profile cached in the local session after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorProfile {
    pub inspector_id: String,
    pub name: String,
    pub vehicle_tag_id: Option<String>,
    pub active: bool,
}

impl From<&Inspector> for InspectorProfile {
    fn from(i: &Inspector) -> Self {
        Self {
            inspector_id: i.inspector_id.clone(),
            name: i.name.clone(),
            vehicle_tag_id: i.vehicle_tag_id.clone(),
            active: i.active,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateInspectorRequest {
    pub inspector_id: String,
    pub name: String,
    pub vehicle_tag_id: Option<String>,
}
