//! Inspection routes

use crate::core::inspection::InspectionLogic;
use crate::errors::AppError;
use crate::models::inspection::{
    CreateInspectionRequest, CreatedInspection, Inspection, InspectionFilter, InspectionPage,
    SubmitInspectionRequest, UpdateInspectionRequest,
};
use crate::server::{ApiJson, ApiPath, ApiQuery, ApiResult, AppState};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub area: Option<String>,
    pub site_code: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

fn blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub async fn list_inspections(
    State(state): State<Arc<AppState>>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> ApiResult<Json<InspectionPage>> {
    let page = state
        .call(move |pool, cfg| {
            let filter = InspectionFilter {
                status: blank(&q.status).map(str::parse).transpose()?,
                area: blank(&q.area).map(str::parse).transpose()?,
                site_code: blank(&q.site_code).map(str::to_string),
            };
            InspectionLogic::list(pool, cfg, &filter, q.page.unwrap_or(0), q.size)
        })
        .await?;
    Ok(Json(page))
}

pub async fn create_inspection(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateInspectionRequest>,
) -> ApiResult<(StatusCode, Json<CreatedInspection>)> {
    let so_number = state.call(move |pool, cfg| InspectionLogic::create(pool, cfg, req)).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedInspection {
            message: format!("Inspection {so_number} created"),
            so_number,
        }),
    ))
}

pub async fn get_inspection(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
) -> ApiResult<Json<Inspection>> {
    Ok(Json(state.call(move |pool, _| InspectionLogic::get(pool, &so)).await?))
}

pub async fn update_inspection(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
    ApiJson(req): ApiJson<UpdateInspectionRequest>,
) -> ApiResult<Json<Inspection>> {
    Ok(Json(state.call(move |pool, _| InspectionLogic::update(pool, &so, req)).await?))
}

pub async fn submit_inspection(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
    body: Bytes,
) -> ApiResult<Json<Inspection>> {
    // The body is optional; an empty one closes the inspection as of now.
    let req: SubmitInspectionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SubmitInspectionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("invalid submit body: {e}")))?
    };
    Ok(Json(state.call(move |pool, _| InspectionLogic::submit(pool, &so, req)).await?))
}
