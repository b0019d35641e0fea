use axum::Router;

use crate::state::AppState;

pub(crate) mod dto;
pub mod handlers;
pub(crate) mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
