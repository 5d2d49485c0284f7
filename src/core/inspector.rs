use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{self, Entity, Index, ItemKey, METADATA};
use crate::errors::{AppError, AppResult};
use crate::models::inspector::{CreateInspectorRequest, INSPECTORS_INDEX_PK, Inspector};
use crate::utils::time::now_iso;
use serde_json::{Map, Value};

fn inspector_key(id: &str) -> ItemKey {
    ItemKey::new(format!("INSPECTOR#{id}"), METADATA)
}

pub struct InspectorLogic;

impl InspectorLogic {
    pub fn create(pool: &DbPool, req: CreateInspectorRequest) -> AppResult<Inspector> {
        let mut missing = Vec::new();
        if req.inspector_id.trim().is_empty() {
            missing.push("inspectorId is required".to_string());
        }
        if req.name.trim().is_empty() {
            missing.push("name is required".to_string());
        }
        if !missing.is_empty() {
            return Err(AppError::validation(missing));
        }

        let id = req.inspector_id.trim();
        if store::get_item(&pool.conn, &inspector_key(id))?.is_some() {
            return Err(AppError::validation([format!(
                "inspector {id} already exists"
            )]));
        }

        let inspector = Inspector {
            inspector_id: id.to_string(),
            name: req.name.trim().to_string(),
            vehicle_tag_id: req.vehicle_tag_id.filter(|t| !t.trim().is_empty()),
            active: true,
            created_at: now_iso(),
        };
        store::put(&pool.conn, &inspector)?;
        ttlog(&pool.conn, "create", id, &format!("Inspector {} added", inspector.name))?;

        Ok(inspector)
    }

    /// All inspectors, in id order.
    pub fn list(pool: &DbPool) -> AppResult<Vec<Inspector>> {
        store::query_index_as(&pool.conn, Index::Gsi1, INSPECTORS_INDEX_PK)
    }

    pub fn get(pool: &DbPool, id: &str) -> AppResult<Inspector> {
        store::get(&pool.conn, &inspector_key(id))?
            .ok_or_else(|| AppError::not_found("Inspector", id))
    }

    pub fn set_active(pool: &DbPool, id: &str, active: bool) -> AppResult<Inspector> {
        let mut attrs = Map::new();
        attrs.insert("active".to_string(), Value::Bool(active));

        let item = store::update_item(&pool.conn, &inspector_key(id), &attrs)?
            .ok_or_else(|| AppError::not_found("Inspector", id))?;
        let inspector = Inspector::from_item(&item)?;

        ttlog(
            &pool.conn,
            "update",
            id,
            if active {
                "Inspector activated"
            } else {
                "Inspector deactivated"
            },
        )?;
        Ok(inspector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: &str, name: &str) -> CreateInspectorRequest {
        CreateInspectorRequest {
            inspector_id: id.into(),
            name: name.into(),
            vehicle_tag_id: Some("Q".into()),
        }
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let pool = DbPool::open_in_memory().unwrap();
        InspectorLogic::create(&pool, req("INS001", "CASTOR_USER5")).unwrap();
        let err = InspectorLogic::create(&pool, req("INS001", "Other")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn list_uses_registry_index() {
        let pool = DbPool::open_in_memory().unwrap();
        InspectorLogic::create(&pool, req("INS002", "B")).unwrap();
        InspectorLogic::create(&pool, req("INS001", "A")).unwrap();
        let ids: Vec<_> = InspectorLogic::list(&pool)
            .unwrap()
            .into_iter()
            .map(|i| i.inspector_id)
            .collect();
        assert_eq!(ids, vec!["INS001", "INS002"]);
    }

    #[test]
    fn deactivate_keeps_other_fields() {
        let pool = DbPool::open_in_memory().unwrap();
        InspectorLogic::create(&pool, req("INS003", "CASTOR_USER7")).unwrap();
        let off = InspectorLogic::set_active(&pool, "INS003", false).unwrap();
        assert!(!off.active);
        assert_eq!(off.name, "CASTOR_USER7");
        assert!(!InspectorLogic::get(&pool, "INS003").unwrap().active);

        assert!(matches!(
            InspectorLogic::set_active(&pool, "NOPE", true),
            Err(AppError::NotFound { .. })
        ));
    }
}
