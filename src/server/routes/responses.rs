//! Checklist and PMI response routes

use crate::core::pmi::PmiLogic;
use crate::core::response::ResponseLogic;
use crate::models::pmi::{CreatePmiResponseRequest, PmiResponse};
use crate::models::response::{CreateResponseRequest, InspectionResponse};
use crate::server::{ApiJson, ApiPath, ApiResult, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

pub async fn list_responses(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
) -> ApiResult<Json<Vec<InspectionResponse>>> {
    Ok(Json(state.call(move |pool, _| ResponseLogic::list(pool, &so)).await?))
}

pub async fn save_response(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
    ApiJson(req): ApiJson<CreateResponseRequest>,
) -> ApiResult<(StatusCode, Json<InspectionResponse>)> {
    let saved = state.call(move |pool, _| ResponseLogic::save(pool, &so, &req)).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_response(
    State(state): State<Arc<AppState>>,
    ApiPath((so, item)): ApiPath<(String, String)>,
) -> ApiResult<Json<InspectionResponse>> {
    Ok(Json(state.call(move |pool, _| ResponseLogic::get(pool, &so, &item)).await?))
}

pub async fn delete_response(
    State(state): State<Arc<AppState>>,
    ApiPath((so, item)): ApiPath<(String, String)>,
) -> ApiResult<StatusCode> {
    state.call(move |pool, _| ResponseLogic::delete(pool, &so, &item)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_pmi_responses(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
) -> ApiResult<Json<Vec<PmiResponse>>> {
    Ok(Json(state.call(move |pool, _| PmiLogic::list(pool, &so)).await?))
}

pub async fn save_pmi_response(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
    ApiJson(req): ApiJson<CreatePmiResponseRequest>,
) -> ApiResult<(StatusCode, Json<PmiResponse>)> {
    let saved = state.call(move |pool, _| PmiLogic::save(pool, &so, &req)).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_pmi_response(
    State(state): State<Arc<AppState>>,
    ApiPath((so, item)): ApiPath<(String, String)>,
) -> ApiResult<Json<PmiResponse>> {
    Ok(Json(state.call(move |pool, _| PmiLogic::get(pool, &so, &item)).await?))
}

pub async fn delete_pmi_response(
    State(state): State<Arc<AppState>>,
    ApiPath((so, item)): ApiPath<(String, String)>,
) -> ApiResult<StatusCode> {
    state.call(move |pool, _| PmiLogic::delete(pool, &so, &item)).await?;
    Ok(StatusCode::NO_CONTENT)
}
