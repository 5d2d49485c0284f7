use crate::cli::parser::ImageCmd;
use crate::config::Config;
use crate::core::attachment::AttachmentLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::models::attachment::UploadImageRequest;
use crate::ui::messages::{info, success};
use crate::utils::formatting::human_size;
use crate::utils::or_dash;
use crate::utils::path::expand_tilde;
use crate::utils::table::{Column, Table};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::Path;

/// Read a file and base64-encode it for an upload request.
pub(crate) fn read_encoded(path: &str) -> AppResult<(String, Option<String>)> {
    let path = expand_tilde(path);
    let bytes = fs::read(&path)
        .map_err(|e| AppError::Validation(format!("cannot read {}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string());
    Ok((STANDARD.encode(bytes), file_name))
}

/// MIME type from a file extension.
pub(crate) fn guess_mime(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Write a downloaded attachment to `out`.
pub(crate) fn write_bytes(out: &str, bytes: &[u8], force: bool) -> AppResult<()> {
    let path = expand_tilde(out);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    ensure_writable(&path, force)?;
    fs::write(&path, bytes)?;
    success(format!("{} written to {}", human_size(bytes.len() as u64), path.display()));
    Ok(())
}

pub fn handle(action: &ImageCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        ImageCmd::Upload {
            so,
            path,
            item,
            caption,
            mime_type,
        } => {
            let (image_data, file_name) = read_encoded(path)?;
            let req = UploadImageRequest {
                item_id: item.clone(),
                caption: caption.clone(),
                image_data,
                mime_type: mime_type
                    .clone()
                    .or_else(|| guess_mime(path).map(str::to_string))
                    .unwrap_or_default(),
                file_name,
            };
            let image = AttachmentLogic::upload_image(&pool, cfg, so, &req)?;
            success(format!(
                "Image {} attached to {} ({})",
                image.image_id,
                so,
                human_size(image.file_size)
            ));
        }

        ImageCmd::List { so } => {
            let images = AttachmentLogic::list_images(&pool, so)?;
            if images.is_empty() {
                info(format!("No images attached to {so}."));
                return Ok(());
            }
            let mut table = Table::new(vec![
                Column::new("ID", 12),
                Column::new("ITEM", 6),
                Column::new("TYPE", 10),
                Column::new("SIZE", 8),
                Column::new("CAPTION", 24),
            ]);
            for img in images {
                table.add_row(vec![
                    img.image_id,
                    or_dash(img.item_id.as_deref()),
                    img.mime_type,
                    human_size(img.file_size),
                    or_dash(img.caption.as_deref()),
                ]);
            }
            println!("{}", table.render());
        }

        ImageCmd::Get { so, id, out, force } => {
            let bytes = AttachmentLogic::image_data(&pool, so, id)?;
            write_bytes(out, &bytes, *force)?;
        }

        ImageCmd::Del { so, id } => {
            AttachmentLogic::delete_image(&pool, so, id)?;
            success(format!("Image {id} deleted from {so}"));
        }
    }

    Ok(())
}
