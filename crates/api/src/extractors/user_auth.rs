//! User JWT authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::Caller;
use shared::jwt::extract_user_id;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller from a Bearer access token.
///
/// The token's `sub` is the user ID; the `is_admin` claim grants inventory
/// admin privileges.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub is_admin: bool,
    /// JWT ID (jti), logged at debug level when the caller is authenticated.
    pub jti: String,
}

impl UserAuth {
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            is_admin: self.is_admin,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.jwt.validate_access_token(token)?;
        let user_id = extract_user_id(&claims)?;

        tracing::debug!(
            user_id = %user_id,
            jti = %claims.jti,
            is_admin = claims.is_admin,
            "Authenticated caller"
        );

        Ok(UserAuth {
            user_id,
            is_admin: claims.is_admin,
            jti: claims.jti,
        })
    }
}
