use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::dto::{
    AuthResponse, DeletedUserResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest,
};
use crate::auth::extractors::AuthUser;
use crate::auth::service;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/users", get(list_users))
        .route("/auth/user/:id", get(get_user).delete(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if payload.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters long".into(),
        ));
    }

    service::register(&state, payload.name, payload.email, payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }

    let response = service::login(&state, payload.email, payload.password).await?;
    Ok(Json(response))
}

#[instrument(skip(state, claims))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<Vec<PublicUser>>> {
    info!(requester = %claims.sub, "listing users");
    let users = service::list_users(&state).await?;
    Ok(Json(users))
}

#[instrument(skip(state, claims))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PublicUser>> {
    info!(requester = %claims.sub, target = %id, "fetching user");
    let user = service::get_user(&state, id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, claims))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletedUserResponse>> {
    info!(requester = %claims.sub, target = %id, "deleting user");
    let user = service::delete_user(&state, id).await?;
    Ok(Json(DeletedUserResponse {
        message: "User deleted successfully".into(),
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plausible_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+tag@sub.domain.org"));
    }

    #[test]
    fn email_validation_rejects_junk() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@nodomain.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email(""));
    }
}
