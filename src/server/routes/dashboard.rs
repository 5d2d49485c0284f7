//! Dashboard and inspector registry routes

use crate::core::dashboard::DashboardLogic;
use crate::core::inspector::InspectorLogic;
use crate::models::dashboard::{DashboardFilter, DashboardSummary};
use crate::models::inspector::InspectorProfile;
use crate::server::{ApiQuery, ApiResult, AppState};
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn summary(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<DashboardFilter>,
) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(state.call(move |pool, _| DashboardLogic::summary(pool, &filter)).await?))
}

pub async fn list_inspectors(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<InspectorProfile>>> {
    let inspectors = state.call(move |pool, _| InspectorLogic::list(pool)).await?;
    Ok(Json(inspectors.iter().map(InspectorProfile::from).collect()))
}
