//! Local session: the bearer token and the cached inspector profile.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::session;
use crate::db::store::{self, ItemKey, METADATA};
use crate::errors::{AppError, AppResult};
use crate::models::inspector::{Inspector, InspectorProfile};
use crate::utils::jwt::{decode_claims, is_unexpired};

pub const TOKEN_KEY: &str = "jwt_token";
pub const PROFILE_KEY: &str = "current_inspector";

pub struct AuthLogic;

impl AuthLogic {
    /// Store `token` and the profile of the inspector it belongs to. The
    /// inspector is `inspector_id` when given, otherwise the `sub` claim.
    pub fn login(
        pool: &DbPool,
        token: &str,
        inspector_id: Option<&str>,
    ) -> AppResult<InspectorProfile> {
        let token = token.trim();
        let claims = decode_claims(token)?;

        let id = inspector_id
            .map(str::to_string)
            .or_else(|| claims.sub.clone())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AppError::Token("token has no subject and no inspector was given".to_string())
            })?;

        let key = ItemKey::new(format!("INSPECTOR#{id}"), METADATA);
        let profile = match store::get::<Inspector>(&pool.conn, &key)? {
            Some(ins) => InspectorProfile::from(&ins),
            None => InspectorProfile {
                name: claims.name.clone().unwrap_or_else(|| id.clone()),
                inspector_id: id,
                vehicle_tag_id: claims.vehicle_tag_id.clone(),
                active: true,
            },
        };

        session::set(&pool.conn, TOKEN_KEY, token)?;
        session::set(&pool.conn, PROFILE_KEY, &serde_json::to_string(&profile)?)?;
        ttlog(
            &pool.conn,
            "login",
            &profile.inspector_id,
            &format!("Session opened for {}", profile.name),
        )?;

        Ok(profile)
    }

    pub fn logout(pool: &DbPool) -> AppResult<()> {
        let had_token = session::delete(&pool.conn, TOKEN_KEY)?;
        session::delete(&pool.conn, PROFILE_KEY)?;
        if had_token {
            ttlog(&pool.conn, "logout", "", "Session closed")?;
        }
        Ok(())
    }

    pub fn token(pool: &DbPool) -> AppResult<Option<String>> {
        session::get(&pool.conn, TOKEN_KEY)
    }

    pub fn current_inspector(pool: &DbPool) -> AppResult<Option<InspectorProfile>> {
        match session::get(&pool.conn, PROFILE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn is_authenticated(pool: &DbPool) -> AppResult<bool> {
        Ok(Self::token(pool)?.is_some_and(|t| !t.trim().is_empty()))
    }

    /// Stored token is decodable and its `exp` lies after `now` (unix seconds).
    pub fn is_token_valid(pool: &DbPool, now: i64) -> AppResult<bool> {
        Ok(Self::token(pool)?.is_some_and(|t| is_unexpired(&t, now)))
    }
}
