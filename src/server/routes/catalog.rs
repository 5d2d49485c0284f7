//! Checklist and PMI taxonomy routes

use crate::core::catalog::CatalogLogic;
use crate::models::area::{InspectionArea, InspectionItem};
use crate::models::pmi::{PmiCategory, PmiItem};
use crate::server::{ApiPath, ApiQuery, ApiResult, AppState};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaItemsQuery {
    pub area_name: String,
}

pub async fn list_areas(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<InspectionArea>>> {
    Ok(Json(state.call(move |pool, _| CatalogLogic::areas(pool)).await?))
}

pub async fn list_area_items(
    State(state): State<Arc<AppState>>,
    ApiPath(area): ApiPath<String>,
) -> ApiResult<Json<Vec<InspectionItem>>> {
    Ok(Json(state.call(move |pool, _| CatalogLogic::items(pool, &area)).await?))
}

/// `GET /inspections/areas/items?areaName=...`
pub async fn list_area_items_by_name(
    State(state): State<Arc<AppState>>,
    ApiQuery(q): ApiQuery<AreaItemsQuery>,
) -> ApiResult<Json<Vec<InspectionItem>>> {
    Ok(Json(state.call(move |pool, _| CatalogLogic::items(pool, &q.area_name)).await?))
}

pub async fn list_pmi_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PmiCategory>>> {
    Ok(Json(state.call(move |pool, _| CatalogLogic::pmi_categories(pool)).await?))
}

pub async fn list_pmi_items(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Vec<PmiItem>>> {
    Ok(Json(state.call(move |pool, _| CatalogLogic::pmi_items(pool, &id)).await?))
}
