use super::image::{read_encoded, write_bytes};
use crate::cli::parser::SignatureCmd;
use crate::config::Config;
use crate::core::attachment::AttachmentLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::attachment::{SignatureType, UploadSignatureRequest};
use crate::ui::messages::{info, success};
use crate::utils::formatting::human_size;
use crate::utils::table::{Column, Table};

pub fn handle(action: &SignatureCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        SignatureCmd::Upload {
            so,
            kind,
            path,
            signed_by,
        } => {
            let (signature_data, file_name) = read_encoded(path)?;
            let req = UploadSignatureRequest {
                signature_type: kind.clone(),
                signed_by: signed_by.clone(),
                signature_data,
                file_name,
            };
            let sig = AttachmentLogic::upload_signature(&pool, cfg, so, &req)?;
            success(format!(
                "{} signature of {} stored for {}",
                sig.signature_type.as_str(),
                sig.signed_by,
                so
            ));
        }

        SignatureCmd::List { so } => {
            let sigs = AttachmentLogic::list_signatures(&pool, so)?;
            if sigs.is_empty() {
                info(format!("No signatures for {so}."));
                return Ok(());
            }
            let mut table = Table::new(vec![
                Column::new("TYPE", 9),
                Column::new("SIGNED BY", 20),
                Column::new("SIZE", 8),
                Column::new("SIGNED AT", 24),
            ]);
            for s in sigs {
                table.add_row(vec![
                    s.signature_type.as_str().to_string(),
                    s.signed_by,
                    human_size(s.file_size),
                    s.signed_at,
                ]);
            }
            println!("{}", table.render());
        }

        SignatureCmd::Get {
            so,
            kind,
            out,
            force,
        } => {
            let kind: SignatureType = kind.parse()?;
            let bytes = AttachmentLogic::signature_data(&pool, so, kind)?;
            write_bytes(out, &bytes, *force)?;
        }

        SignatureCmd::Del { so, kind } => {
            let kind: SignatureType = kind.parse()?;
            AttachmentLogic::delete_signature(&pool, so, kind)?;
            success(format!("{} signature deleted from {so}", kind.as_str()));
        }
    }

    Ok(())
}
