use crate::core::catalog::CatalogLogic;
use crate::core::inspection::InspectionLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{self, ItemKey};
use crate::errors::{AppError, AppResult};
use crate::models::inspection_pk;
use crate::models::response::{
    CreateResponseRequest, InspectionResponse, ResponseProgress, response_sk,
};
use crate::utils::time::now_iso;
use std::collections::HashSet;

fn response_key(so_number: &str, item_id: &str) -> ItemKey {
    ItemKey::new(inspection_pk(so_number), response_sk(item_id))
}

pub struct ResponseLogic;

impl ResponseLogic {
    /// Store the response for one checklist item, replacing any earlier one.
    pub fn save(
        pool: &DbPool,
        so_number: &str,
        req: &CreateResponseRequest,
    ) -> AppResult<InspectionResponse> {
        InspectionLogic::ensure_editable(pool, so_number)?;
        let outcome = req.to_outcome()?;

        let item_id = req.item_id.trim();
        if CatalogLogic::find_item(pool, item_id)?.is_none() {
            return Err(AppError::validation([format!(
                "unknown checklist item: {item_id}"
            )]));
        }

        let response = InspectionResponse {
            so_number: so_number.to_string(),
            item_id: item_id.to_string(),
            outcome,
            created_at: now_iso(),
        };
        store::put(&pool.conn, &response)?;

        ttlog(
            &pool.conn,
            "response",
            &format!("{so_number}/{item_id}"),
            &format!("Response {} recorded", response.outcome.kind()),
        )?;
        tracing::debug!(so_number, item_id, kind = response.outcome.kind(), "response saved");

        Ok(response)
    }

    pub fn get(pool: &DbPool, so_number: &str, item_id: &str) -> AppResult<InspectionResponse> {
        store::get(&pool.conn, &response_key(so_number, item_id))?
            .ok_or_else(|| AppError::not_found("Response", format!("{so_number}/{item_id}")))
    }

    /// Responses of an inspection ordered by item id.
    pub fn list(pool: &DbPool, so_number: &str) -> AppResult<Vec<InspectionResponse>> {
        InspectionLogic::get(pool, so_number)?;
        store::query_as(&pool.conn, &inspection_pk(so_number), "RESPONSE#")
    }

    pub fn delete(pool: &DbPool, so_number: &str, item_id: &str) -> AppResult<()> {
        InspectionLogic::ensure_editable(pool, so_number)?;
        if !store::delete_item(&pool.conn, &response_key(so_number, item_id))? {
            return Err(AppError::not_found(
                "Response",
                format!("{so_number}/{item_id}"),
            ));
        }
        ttlog(
            &pool.conn,
            "del",
            &format!("{so_number}/{item_id}"),
            "Response deleted",
        )?;
        Ok(())
    }

    pub fn progress(pool: &DbPool, so_number: &str) -> AppResult<ResponseProgress> {
        let responses = Self::list(pool, so_number)?;
        let checklist: HashSet<String> = CatalogLogic::checklist(pool)?
            .into_iter()
            .map(|i| i.item_id)
            .collect();

        let answered = responses
            .iter()
            .filter(|r| checklist.contains(&r.item_id))
            .count();
        let deficiencies = responses
            .iter()
            .filter(|r| r.outcome.is_deficiency())
            .count();

        Ok(ResponseProgress {
            so_number: so_number.to_string(),
            answered,
            total: checklist.len(),
            deficiencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::inspection::{CreateInspectionRequest, SubmitInspectionRequest};
    use crate::models::response::ResponseOutcome;

    fn setup() -> (DbPool, String) {
        let pool = DbPool::open_in_memory().unwrap();
        let cfg = Config::with_database(":memory:");
        let so = InspectionLogic::create(
            &pool,
            &cfg,
            CreateInspectionRequest {
                unit_number: "041529".into(),
                site_code: "901".into(),
                address: "123 Main St".into(),
                ..Default::default()
            },
        )
        .unwrap();
        (pool, so)
    }

    fn answer(item: &str, kind: &str) -> CreateResponseRequest {
        CreateResponseRequest {
            item_id: item.into(),
            response: kind.into(),
            ..Default::default()
        }
    }

    #[test]
    fn second_save_overwrites_first() {
        let (pool, so) = setup();
        ResponseLogic::save(&pool, &so, &answer("K001", "OK")).unwrap();
        ResponseLogic::save(&pool, &so, &answer("K001", "NA")).unwrap();

        let all = ResponseLogic::list(&pool, &so).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].outcome, ResponseOutcome::Na);
    }

    #[test]
    fn unknown_item_is_rejected() {
        let (pool, so) = setup();
        let err = ResponseLogic::save(&pool, &so, &answer("X999", "OK")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn closed_inspection_blocks_writes() {
        let (pool, so) = setup();
        ResponseLogic::save(&pool, &so, &answer("K001", "OK")).unwrap();
        InspectionLogic::submit(&pool, &so, SubmitInspectionRequest::default()).unwrap();

        assert!(matches!(
            ResponseLogic::save(&pool, &so, &answer("K002", "OK")),
            Err(AppError::InspectionClosed(_))
        ));
        assert!(matches!(
            ResponseLogic::delete(&pool, &so, "K001"),
            Err(AppError::InspectionClosed(_))
        ));
        // reads still work
        assert_eq!(ResponseLogic::list(&pool, &so).unwrap().len(), 1);
    }

    #[test]
    fn delete_missing_response_is_not_found() {
        let (pool, so) = setup();
        assert!(matches!(
            ResponseLogic::delete(&pool, &so, "K001"),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn progress_counts_answers_and_deficiencies() {
        let (pool, so) = setup();
        ResponseLogic::save(&pool, &so, &answer("K001", "OK")).unwrap();
        let def = CreateResponseRequest {
            scope_of_work: Some("Fix leak".into()),
            service_id: Some("100-PLUMBING".into()),
            activity_code: Some("703".into()),
            ..answer("B001", "Def")
        };
        ResponseLogic::save(&pool, &so, &def).unwrap();

        let p = ResponseLogic::progress(&pool, &so).unwrap();
        assert_eq!(p.answered, 2);
        assert_eq!(p.total, 54);
        assert_eq!(p.deficiencies, 1);
        assert!(!p.is_complete());
    }
}
