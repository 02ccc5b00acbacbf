use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{JwtKeys, LoginRequest, LoginResponse, RegisterRequest},
    extractors::CurrentUser,
    repo::User,
    services::{hash_password, validate_registration, verify_password},
};
use crate::error::{ApiError, ApiMessage};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<ApiMessage>), ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation("No input data provided".into()));
    };

    let (username, email, password) = validate_registration(&payload)
        .map_err(|e| ApiError::Validation(format!("Invalid input data: {e}")))?;

    // A user is created only once both fields are confirmed unused
    if User::find_by_username(&state.db, username).await?.is_some() {
        warn!(%username, "registration with taken username");
        return Err(ApiError::Validation(
            "Invalid input data: username: Username already exists".into(),
        ));
    }
    if User::find_by_email(&state.db, email).await?.is_some() {
        warn!(%email, "registration with taken email");
        return Err(ApiError::Validation(
            "Invalid input data: email: Email already exists".into(),
        ));
    }

    let hash = hash_password(password)?;
    let user = User::create(&state.db, username, email, &hash).await?;

    info!(user_id = %user.id, %username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::new(
            "User created successfully",
            StatusCode::CREATED,
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = match payload {
        Some(Json(LoginRequest {
            email: Some(email),
            password: Some(password),
        })) => (email, password),
        _ => {
            return Err(ApiError::Validation(
                "No input data provided or missing required fields".into(),
            ))
        }
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "Logged in successfully".into(),
        status_code: StatusCode::OK.as_u16(),
        token,
    }))
}

#[instrument]
pub async fn logout(CurrentUser(user_id): CurrentUser) -> Json<ApiMessage> {
    // Sessions are stateless JWTs; the client discards the token.
    info!(%user_id, "user logged out");
    Json(ApiMessage::new("Logged out successfully", StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_shape() {
        let response = LoginResponse {
            message: "Logged in successfully".into(),
            status_code: 200,
            token: "abc".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Logged in successfully");
        assert_eq!(json["status_code"], 200);
        assert_eq!(json["token"], "abc");
    }

    #[test]
    fn api_message_shape() {
        let msg = ApiMessage::new("User created successfully", StatusCode::CREATED);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["message"], "User created successfully");
        assert_eq!(json["status_code"], 201);
    }
}
