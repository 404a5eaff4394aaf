use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderName;

use crate::domain::identity::{Identity, Role};
use crate::http::AppError;
use crate::AppState;

/// Identity forwarded by the application layer, which owns
/// authentication. With neither header present the request runs as the
/// guest identity; a half-formed or unparsable pair is rejected so a
/// broken shell fails loudly instead of silently losing persistence.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
}

/// Shared-secret guard on push ingest. With no token configured the
/// ingest endpoint is open (development and in-cluster deployments).
#[derive(Debug, Clone)]
pub struct BridgeToken;

const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");
const USER_ROLE_HEADER: HeaderName = HeaderName::from_static("x-user-role");
const BRIDGE_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-bridge-token");

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| AppError::bad_request("invalid x-user-id header"))?;
        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| AppError::bad_request("invalid x-user-role header"))?;

        let identity = match (user_id, role) {
            (None, None) => Identity::guest(),
            (Some(user_id), Some(role)) => {
                if user_id.is_empty() {
                    return Err(AppError::bad_request("empty x-user-id header"));
                }
                let role = role
                    .parse::<Role>()
                    .map_err(|_| AppError::bad_request("unknown x-user-role"))?;
                Identity::new(user_id, role)
            }
            _ => {
                return Err(AppError::bad_request(
                    "x-user-id and x-user-role must be sent together",
                ))
            }
        };

        Ok(AuthUser { identity })
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for BridgeToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.bridge_token.as_ref() else {
            return Ok(BridgeToken);
        };

        let provided = parts
            .headers
            .get(BRIDGE_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::forbidden("missing bridge token"))?;

        if provided != expected {
            return Err(AppError::forbidden("invalid bridge token"));
        }

        Ok(BridgeToken)
    }
}
