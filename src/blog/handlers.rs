use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::blog::dto::{CreateBlogRequest, MessageResponse, UpdateBlogRequest};
use crate::blog::repo::Blog;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/blog", get(list_blogs))
        .route("/blog/:slug", get(get_blog))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blog", post(create_blog))
        .route("/blog/:id", patch(update_blog).delete(delete_blog))
}

#[instrument(skip(state))]
pub async fn list_blogs(State(state): State<AppState>) -> AppResult<Json<Vec<Blog>>> {
    let blogs = Blog::list(&state.db).await?;
    Ok(Json(blogs))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Blog>> {
    Blog::find_by_slug(&state.db, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))
}

#[instrument(skip(state, claims, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateBlogRequest>,
) -> AppResult<(StatusCode, Json<Blog>)> {
    if payload.title.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Title and slug are required".into()));
    }

    let created = Blog::create(
        &state.db,
        &payload.title,
        &payload.slug,
        &claims.name,
        &payload.content,
        &payload.category,
        &payload.tags,
        payload.thumbnail_url.as_deref(),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Blog with this slug already exists".into())
        } else {
            e.into()
        }
    })?;

    info!(blog_id = %created.id, author = %claims.sub, "blog created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, claims, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogRequest>,
) -> AppResult<Json<Blog>> {
    let updated = Blog::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.content.as_deref(),
        payload.category.as_deref(),
        payload.tags.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    info!(blog_id = %id, editor = %claims.sub, "blog updated");
    Ok(Json(updated))
}

#[instrument(skip(state, claims))]
pub async fn delete_blog(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    Blog::delete_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;

    info!(blog_id = %id, requester = %claims.sub, "blog deleted");
    Ok(Json(MessageResponse {
        message: "Blog deleted successfully".into(),
    }))
}
