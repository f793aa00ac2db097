//! `/query`: the ad-hoc SQL console, its preset and help catalog, and live
//! schema introspection.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::{AppState, Envelope};
use crate::query::catalog::{self, Labeled, QueryHelp, HELP_MESSAGE, PRESETS_MESSAGE};
use crate::query::SchemaDescriptor;
use crate::storage::ResultSet;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(execute))
        .route("/presets", get(presets))
        .route("/help", get(help))
        .route("/schema", get(schema))
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    pub data: ResultSet,
    pub row_count: usize,
    pub query: String,
}

pub async fn execute(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload?;
    let output = state.executor.execute(request.query.as_deref()).await?;

    Ok(Json(QueryResponse {
        success: true,
        row_count: output.row_count(),
        data: output.rows,
        query: output.echo,
    }))
}

pub async fn presets() -> Json<Envelope<Labeled<&'static str>>> {
    Json(Envelope::data(catalog::PRESETS).with_message(PRESETS_MESSAGE))
}

pub async fn help() -> Json<Envelope<QueryHelp>> {
    Json(Envelope::data(catalog::help()).with_message(HELP_MESSAGE))
}

pub async fn schema(
    State(state): State<AppState>,
) -> Result<Json<Envelope<SchemaDescriptor>>, ApiError> {
    let schema = state.introspector.describe().await?;
    Ok(Json(Envelope::data(schema)))
}
