use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

use crate::handlers::{categorias::Categorias, crud, productos::Productos};

/// Shared state handed to every handler. The pool is the injected store
/// handle; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
}

/// Assemble the full route table over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ────────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))
        // ── CRUD surfaces ─────────────────────────────────────────────────────
        .merge(crud::routes::<Categorias>("/api/categorias"))
        .merge(crud::routes::<Productos>("/api/productos"))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
