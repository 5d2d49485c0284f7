use crate::cli::parser::AuthCmd;
use crate::config::Config;
use crate::core::auth::AuthLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::or_dash;

pub fn handle(action: &AuthCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match action {
        AuthCmd::Login { token, inspector } => {
            let profile = AuthLogic::login(&pool, token, inspector.as_deref())?;
            success(format!(
                "Logged in as {} ({})",
                profile.name, profile.inspector_id
            ));
            if !AuthLogic::is_token_valid(&pool, chrono::Utc::now().timestamp())? {
                warning("The token is expired or has no expiry claim.");
            }
        }

        AuthCmd::Status => {
            let profile = AuthLogic::current_inspector(&pool)?;
            let authenticated = AuthLogic::is_authenticated(&pool)?;
            match profile {
                Some(profile) if authenticated => {
                    let valid =
                        AuthLogic::is_token_valid(&pool, chrono::Utc::now().timestamp())?;
                    println!("Inspector : {} ({})", profile.name, profile.inspector_id);
                    println!("Vehicle   : {}", or_dash(profile.vehicle_tag_id.as_deref()));
                    println!("Token     : {}", if valid { "valid" } else { "expired" });
                }
                _ => info("Not logged in."),
            }
        }

        AuthCmd::Logout => {
            AuthLogic::logout(&pool)?;
            success("Session cleared.");
        }
    }

    Ok(())
}
