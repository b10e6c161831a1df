use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{encode, EncodingKey, Header};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::login_info::{LoginCredential, LoginResponse};
use crate::shared::configuration::CONFIGURATION;

pub async fn login(Json(request): Json<LoginCredential>) -> Response {
    let user_name = &CONFIGURATION.bot_user_name;
    let password = &CONFIGURATION.bot_user_pass;
    if user_name != &request.user_name || password != &request.password {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ServerError::with_message("Invalid credentials.")),
        )
            .into_response();
    }

    let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
    match generate_jwt_token(user_name, expiry) {
        Ok(token) => {
            let login_response = LoginResponse {
                token,
                expiry: expiry.format(&Rfc3339).unwrap_or_default(),
            };
            (StatusCode::OK, Json(login_response)).into_response()
        }
        Err(e) => {
            let error_message = format!("Failed to encode JWT token: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

fn generate_jwt_token(user_name: &str, expiry: OffsetDateTime) -> anyhow::Result<String> {
    let secret = &CONFIGURATION.jwt_secret;
    let claim = Claim {
        sub: user_name.into(),
        exp: expiry.unix_timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
