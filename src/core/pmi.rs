use crate::core::inspection::InspectionLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{self, ItemKey};
use crate::errors::{AppError, AppResult};
use crate::models::inspection_pk;
use crate::models::pmi::{
    CreatePmiResponseRequest, PmiItem, PmiResponse, category_pk, pmi_response_sk,
};
use crate::utils::time::now_iso;

fn pmi_key(so_number: &str, item_id: &str) -> ItemKey {
    ItemKey::new(inspection_pk(so_number), pmi_response_sk(item_id))
}

pub struct PmiLogic;

impl PmiLogic {
    /// Record a PMI task outcome. The item has to belong to the category.
    pub fn save(
        pool: &DbPool,
        so_number: &str,
        req: &CreatePmiResponseRequest,
    ) -> AppResult<PmiResponse> {
        InspectionLogic::ensure_editable(pool, so_number)?;
        req.validate()?;

        let item_id = req.item_id.trim();
        let category_id = req.category_id.trim();
        let item_key = ItemKey::new(category_pk(category_id), format!("ITEM#{item_id}"));
        if store::get::<PmiItem>(&pool.conn, &item_key)?.is_none() {
            return Err(AppError::validation([format!(
                "PMI item {item_id} does not belong to category {category_id}"
            )]));
        }

        let response = PmiResponse {
            so_number: so_number.to_string(),
            item_id: item_id.to_string(),
            category_id: category_id.to_string(),
            completed: req.completed.unwrap_or(false),
            notes: req.notes.clone().filter(|n| !n.trim().is_empty()),
            created_at: now_iso(),
        };
        store::put(&pool.conn, &response)?;

        ttlog(
            &pool.conn,
            "pmi",
            &format!("{so_number}/{item_id}"),
            if response.completed {
                "PMI task completed"
            } else {
                "PMI task recorded as not completed"
            },
        )?;

        Ok(response)
    }

    pub fn get(pool: &DbPool, so_number: &str, item_id: &str) -> AppResult<PmiResponse> {
        store::get(&pool.conn, &pmi_key(so_number, item_id))?
            .ok_or_else(|| AppError::not_found("PMI response", format!("{so_number}/{item_id}")))
    }

    pub fn list(pool: &DbPool, so_number: &str) -> AppResult<Vec<PmiResponse>> {
        InspectionLogic::get(pool, so_number)?;
        store::query_as(&pool.conn, &inspection_pk(so_number), "PMI#")
    }

    pub fn delete(pool: &DbPool, so_number: &str, item_id: &str) -> AppResult<()> {
        InspectionLogic::ensure_editable(pool, so_number)?;
        if !store::delete_item(&pool.conn, &pmi_key(so_number, item_id))? {
            return Err(AppError::not_found(
                "PMI response",
                format!("{so_number}/{item_id}"),
            ));
        }
        ttlog(
            &pool.conn,
            "del",
            &format!("{so_number}/{item_id}"),
            "PMI response deleted",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::inspection::CreateInspectionRequest;

    fn setup() -> (DbPool, String) {
        let pool = DbPool::open_in_memory().unwrap();
        let so = InspectionLogic::create(
            &pool,
            &Config::with_database(":memory:"),
            CreateInspectionRequest {
                unit_number: "050001".into(),
                site_code: "903".into(),
                address: "300 Pine St".into(),
                ..Default::default()
            },
        )
        .unwrap();
        (pool, so)
    }

    fn task(item: &str, category: &str) -> CreatePmiResponseRequest {
        CreatePmiResponseRequest {
            item_id: item.into(),
            category_id: category.into(),
            completed: None,
            notes: Some("filter swapped".into()),
        }
    }

    #[test]
    fn completed_defaults_to_false() {
        let (pool, so) = setup();
        let saved = PmiLogic::save(&pool, &so, &task("PMI001", "CAT001")).unwrap();
        assert!(!saved.completed);
        assert_eq!(PmiLogic::get(&pool, &so, "PMI001").unwrap(), saved);
    }

    #[test]
    fn item_must_belong_to_category() {
        let (pool, so) = setup();
        let err = PmiLogic::save(&pool, &so, &task("PMI001", "CAT002")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn overwrite_and_delete() {
        let (pool, so) = setup();
        PmiLogic::save(&pool, &so, &task("PMI005", "CAT002")).unwrap();
        let mut again = task("PMI005", "CAT002");
        again.completed = Some(true);
        PmiLogic::save(&pool, &so, &again).unwrap();

        let all = PmiLogic::list(&pool, &so).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].completed);

        PmiLogic::delete(&pool, &so, "PMI005").unwrap();
        assert!(PmiLogic::list(&pool, &so).unwrap().is_empty());
    }
}
