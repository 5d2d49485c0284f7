//! Image and signature routes

use crate::core::attachment::AttachmentLogic;
use crate::models::attachment::{
    InspectionImage, InspectionSignature, SignatureType, UploadImageRequest,
    UploadSignatureRequest,
};
use crate::server::{ApiJson, ApiPath, ApiResult, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::sync::Arc;

/// Image metadata with its payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageWithData {
    #[serde(flatten)]
    pub image: InspectionImage,
    pub image_data: String,
}

/// Signature metadata with its payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureWithData {
    #[serde(flatten)]
    pub signature: InspectionSignature,
    pub signature_data: String,
}

pub async fn list_images(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
) -> ApiResult<Json<Vec<InspectionImage>>> {
    Ok(Json(state.call(move |pool, _| AttachmentLogic::list_images(pool, &so)).await?))
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
    ApiJson(req): ApiJson<UploadImageRequest>,
) -> ApiResult<(StatusCode, Json<InspectionImage>)> {
    let image = state
        .call(move |pool, cfg| AttachmentLogic::upload_image(pool, cfg, &so, &req))
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    ApiPath((so, id)): ApiPath<(String, String)>,
) -> ApiResult<Json<ImageWithData>> {
    let (image, bytes) = state
        .call(move |pool, _| {
            Ok((
                AttachmentLogic::get_image(pool, &so, &id)?,
                AttachmentLogic::image_data(pool, &so, &id)?,
            ))
        })
        .await?;
    Ok(Json(ImageWithData {
        image,
        image_data: STANDARD.encode(bytes),
    }))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    ApiPath((so, id)): ApiPath<(String, String)>,
) -> ApiResult<StatusCode> {
    state.call(move |pool, _| AttachmentLogic::delete_image(pool, &so, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_signatures(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
) -> ApiResult<Json<Vec<InspectionSignature>>> {
    Ok(Json(state.call(move |pool, _| AttachmentLogic::list_signatures(pool, &so)).await?))
}

pub async fn upload_signature(
    State(state): State<Arc<AppState>>,
    ApiPath(so): ApiPath<String>,
    ApiJson(req): ApiJson<UploadSignatureRequest>,
) -> ApiResult<(StatusCode, Json<InspectionSignature>)> {
    let sig = state
        .call(move |pool, cfg| AttachmentLogic::upload_signature(pool, cfg, &so, &req))
        .await?;
    Ok((StatusCode::CREATED, Json(sig)))
}

pub async fn get_signature(
    State(state): State<Arc<AppState>>,
    ApiPath((so, kind)): ApiPath<(String, String)>,
) -> ApiResult<Json<SignatureWithData>> {
    let (signature, bytes) = state
        .call(move |pool, _| {
            let kind: SignatureType = kind.parse()?;
            Ok((
                AttachmentLogic::get_signature(pool, &so, kind)?,
                AttachmentLogic::signature_data(pool, &so, kind)?,
            ))
        })
        .await?;
    Ok(Json(SignatureWithData {
        signature,
        signature_data: STANDARD.encode(bytes),
    }))
}

pub async fn delete_signature(
    State(state): State<Arc<AppState>>,
    ApiPath((so, kind)): ApiPath<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .call(move |pool, _| {
            let kind: SignatureType = kind.parse()?;
            AttachmentLogic::delete_signature(pool, &so, kind)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
