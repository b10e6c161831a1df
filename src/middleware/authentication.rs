use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::{async_trait, Json, RequestPartsExt};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, DecodingKey, Validation};
use time::OffsetDateTime;

use crate::model::claim::Claim;
use crate::model::errors::{ApiError, ServerError};
use crate::shared::configuration::CONFIGURATION;

#[async_trait]
impl<S> FromRequestParts<S> for Claim
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_e| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ServerError::with_message("Authorization header not found")),
                )
            })?;

        let secret = &CONFIGURATION.jwt_secret;

        match decode::<Claim>(
            bearer.token(),
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(token) => match OffsetDateTime::from_unix_timestamp(token.claims.exp as i64) {
                Ok(expiry) if expiry > OffsetDateTime::now_utc() => Ok(token.claims),
                _ => Err((
                    StatusCode::UNAUTHORIZED,
                    Json(ServerError::with_message("Token expired")),
                )),
            },
            Err(_) => Err((
                StatusCode::UNAUTHORIZED,
                Json(ServerError::with_message("Invalid token")),
            )),
        }
    }
}
