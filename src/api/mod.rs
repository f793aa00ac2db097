//! HTTP surface: router, shared state, and the JSON envelope every
//! endpoint answers with.

pub mod error;
pub mod players;
pub mod query;
pub mod stats;
pub mod teams;

use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::RunMode;
use crate::query::{QueryExecutor, QueryPolicy, SchemaIntrospector};
use crate::storage::{Database, StorageEngine};

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub executor: Arc<QueryExecutor>,
    pub introspector: Arc<SchemaIntrospector>,
}

impl AppState {
    pub fn new(db: Database, policy: QueryPolicy) -> Self {
        let engine: Arc<dyn StorageEngine> = Arc::new(db.clone());
        Self::with_engine(db, engine, policy)
    }

    /// Uses `engine` for the query console and schema introspection while
    /// the CRUD handlers keep using `db`.
    pub fn with_engine(db: Database, engine: Arc<dyn StorageEngine>, policy: QueryPolicy) -> Self {
        Self {
            db,
            executor: Arc::new(QueryExecutor::new(Arc::clone(&engine), policy)),
            introspector: Arc::new(SchemaIntrospector::new(engine)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Envelope<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        message: "IPLDB API is running",
    })
}

pub fn router(state: AppState, mode: RunMode) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/players", players::routes())
        .nest("/teams", teams::routes())
        .nest("/stats", stats::routes())
        .nest("/query", query::routes())
        .route("/roles", get(stats::roles))
        .route("/schema", get(query::schema))
        .layer(middleware::from_fn_with_state(mode, error::expose_error_detail))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
