use std::net::SocketAddr;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, blog};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(blog::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the userbase API",
        "version": "1.0.0",
        "endpoints": [
            { "method": "POST", "path": "/api/auth/register", "description": "Register a new user" },
            { "method": "POST", "path": "/api/auth/login", "description": "Authenticate a user and return a token" },
            { "method": "GET", "path": "/api/auth/users", "description": "Fetch all registered users (protected)" },
            { "method": "GET", "path": "/api/blog", "description": "Fetch all blog posts" },
        ]
    }))
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
