//! Images and signatures attached to an inspection.
//!
//! Clients upload base64 payloads. Metadata goes into the item store, the
//! decoded bytes into the blob table under the same key.

use crate::config::Config;
use crate::core::inspection::InspectionLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{self, ItemKey};
use crate::errors::{AppError, AppResult};
use crate::models::attachment::{
    InspectionImage, InspectionSignature, SignatureType, UploadImageRequest,
    UploadSignatureRequest, image_sk, signature_sk,
};
use crate::models::inspection_pk;
use crate::utils::time::now_iso;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

/// A decoded upload and the MIME type named by its data-URI prefix, if any.
#[derive(Debug)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Decode a standard-alphabet base64 payload. A leading
/// `data:<mime>;base64,` prefix is stripped.
pub fn decode_payload(data: &str, max_bytes: usize) -> AppResult<Payload> {
    let data = data.trim();
    let (mime_type, encoded) = match data.strip_prefix("data:") {
        Some(rest) => match rest.split_once(";base64,") {
            Some((mime, body)) => (Some(mime.to_string()).filter(|m| !m.is_empty()), body),
            None => {
                return Err(AppError::validation(["data URI payload must be base64"]));
            }
        },
        None => (None, data),
    };

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(AppError::validation(["payload is empty"]));
    }

    let bytes = STANDARD.decode(compact.as_bytes())?;
    if bytes.is_empty() {
        return Err(AppError::validation(["payload is empty"]));
    }
    if bytes.len() > max_bytes {
        return Err(AppError::validation([format!(
            "payload is {} bytes, limit is {max_bytes}",
            bytes.len()
        )]));
    }

    Ok(Payload { bytes, mime_type })
}

fn short_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", hex[..8].to_uppercase())
}

fn image_key(so_number: &str, image_id: &str) -> ItemKey {
    ItemKey::new(inspection_pk(so_number), image_sk(image_id))
}

fn signature_key(so_number: &str, kind: SignatureType) -> ItemKey {
    ItemKey::new(inspection_pk(so_number), signature_sk(kind))
}

pub struct AttachmentLogic;

impl AttachmentLogic {
    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    pub fn upload_image(
        pool: &DbPool,
        cfg: &Config,
        so_number: &str,
        req: &UploadImageRequest,
    ) -> AppResult<InspectionImage> {
        InspectionLogic::ensure_editable(pool, so_number)?;
        let payload = decode_payload(&req.image_data, cfg.max_attachment_bytes)?;

        let mime_type = Some(req.mime_type.trim().to_string())
            .filter(|m| !m.is_empty())
            .or(payload.mime_type)
            .ok_or_else(|| AppError::validation(["mimeType is required"]))?;

        let image = InspectionImage {
            image_id: short_id("IMG"),
            so_number: so_number.to_string(),
            item_id: req.item_id.clone().filter(|s| !s.trim().is_empty()),
            caption: req.caption.clone().filter(|s| !s.trim().is_empty()),
            file_name: req.file_name.clone().filter(|s| !s.trim().is_empty()),
            mime_type,
            file_size: payload.bytes.len() as u64,
            uploaded_at: now_iso(),
        };

        store::put_with_blob(&pool.conn, &image, &payload.bytes)?;

        ttlog(
            &pool.conn,
            "image",
            &format!("{so_number}/{}", image.image_id),
            &format!("Image uploaded ({} bytes)", image.file_size),
        )?;
        tracing::info!(so_number, image_id = %image.image_id, size = image.file_size, "image uploaded");

        Ok(image)
    }

    /// Images of an inspection, newest first.
    pub fn list_images(pool: &DbPool, so_number: &str) -> AppResult<Vec<InspectionImage>> {
        InspectionLogic::get(pool, so_number)?;
        let mut images: Vec<InspectionImage> =
            store::query_as(&pool.conn, &inspection_pk(so_number), "IMAGE#")?;
        images.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.image_id.cmp(&a.image_id))
        });
        Ok(images)
    }

    pub fn get_image(pool: &DbPool, so_number: &str, image_id: &str) -> AppResult<InspectionImage> {
        store::get(&pool.conn, &image_key(so_number, image_id))?
            .ok_or_else(|| AppError::not_found("Image", format!("{so_number}/{image_id}")))
    }

    pub fn image_data(pool: &DbPool, so_number: &str, image_id: &str) -> AppResult<Vec<u8>> {
        store::get_blob(&pool.conn, &image_key(so_number, image_id))?
            .ok_or_else(|| AppError::not_found("Image", format!("{so_number}/{image_id}")))
    }

    pub fn delete_image(pool: &DbPool, so_number: &str, image_id: &str) -> AppResult<()> {
        InspectionLogic::ensure_editable(pool, so_number)?;
        if !store::delete_item(&pool.conn, &image_key(so_number, image_id))? {
            return Err(AppError::not_found(
                "Image",
                format!("{so_number}/{image_id}"),
            ));
        }
        ttlog(
            &pool.conn,
            "del",
            &format!("{so_number}/{image_id}"),
            "Image deleted",
        )?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Signatures
    // -----------------------------------------------------------------------

    /// Store a signature. A signature of the same type is replaced.
    pub fn upload_signature(
        pool: &DbPool,
        cfg: &Config,
        so_number: &str,
        req: &UploadSignatureRequest,
    ) -> AppResult<InspectionSignature> {
        InspectionLogic::ensure_editable(pool, so_number)?;

        let mut errors = Vec::new();
        let kind = match req.signature_type.parse::<SignatureType>() {
            Ok(k) => Some(k),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };
        if req.signed_by.trim().is_empty() {
            errors.push("signedBy is required".to_string());
        }
        let (Some(kind), true) = (kind, errors.is_empty()) else {
            return Err(AppError::validation(errors));
        };

        let payload = decode_payload(&req.signature_data, cfg.max_attachment_bytes)?;

        let signature = InspectionSignature {
            signature_id: short_id("SIG"),
            so_number: so_number.to_string(),
            signature_type: kind,
            signed_by: req.signed_by.trim().to_string(),
            file_size: payload.bytes.len() as u64,
            signed_at: now_iso(),
        };

        store::put_with_blob(&pool.conn, &signature, &payload.bytes)?;

        ttlog(
            &pool.conn,
            "signature",
            &format!("{so_number}/{kind}"),
            &format!("Signed by {}", signature.signed_by),
        )?;
        tracing::info!(so_number, signature_type = %kind, "signature stored");

        Ok(signature)
    }

    /// Signatures of an inspection, newest first.
    pub fn list_signatures(pool: &DbPool, so_number: &str) -> AppResult<Vec<InspectionSignature>> {
        InspectionLogic::get(pool, so_number)?;
        let mut sigs: Vec<InspectionSignature> =
            store::query_as(&pool.conn, &inspection_pk(so_number), "SIGNATURE#")?;
        sigs.sort_by(|a, b| b.signed_at.cmp(&a.signed_at));
        Ok(sigs)
    }

    pub fn get_signature(
        pool: &DbPool,
        so_number: &str,
        kind: SignatureType,
    ) -> AppResult<InspectionSignature> {
        store::get(&pool.conn, &signature_key(so_number, kind))?
            .ok_or_else(|| AppError::not_found("Signature", format!("{so_number}/{kind}")))
    }

    pub fn signature_data(
        pool: &DbPool,
        so_number: &str,
        kind: SignatureType,
    ) -> AppResult<Vec<u8>> {
        store::get_blob(&pool.conn, &signature_key(so_number, kind))?
            .ok_or_else(|| AppError::not_found("Signature", format!("{so_number}/{kind}")))
    }

    pub fn delete_signature(pool: &DbPool, so_number: &str, kind: SignatureType) -> AppResult<()> {
        InspectionLogic::ensure_editable(pool, so_number)?;
        if !store::delete_item(&pool.conn, &signature_key(so_number, kind))? {
            return Err(AppError::not_found(
                "Signature",
                format!("{so_number}/{kind}"),
            ));
        }
        ttlog(
            &pool.conn,
            "del",
            &format!("{so_number}/{kind}"),
            "Signature deleted",
        )?;
        Ok(())
    }
}
