use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::error::ApiError;
use super::{AppState, Envelope};
use crate::models::{NewPlayer, Player, PlayerUpdate, PlayerView};

const NOT_FOUND: &str = "Player not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show).put(update).delete(destroy))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<PlayerView>>>, ApiError> {
    let players = state.db.call(|conn| Player::all(conn)).await?;
    Ok(Json(Envelope::data(players)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<PlayerView>>, ApiError> {
    let player = state
        .db
        .call(move |conn| Player::find(conn, id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(Envelope::data(player)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Player>>), ApiError> {
    let Json(payload) = payload?;
    let draft = payload.validate()?;
    let player = state.db.call(move |conn| Player::create(conn, &draft)).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(player).with_message("Player created successfully")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<PlayerUpdate>, JsonRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Json(changes) = payload?;
    changes.validate()?;

    let found = state
        .db
        .call(move |conn| Player::update(conn, id, &changes))
        .await?;
    if !found {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(Envelope::message("Player updated successfully")))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = state.db.call(move |conn| Player::delete(conn, id)).await?;
    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(Envelope::message("Player deleted successfully")))
}
