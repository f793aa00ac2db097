use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::error::ApiError;
use super::{AppState, Envelope};
use crate::models::{CreatedTeam, NewTeam, Team, TeamUpdate};

const NOT_FOUND: &str = "Team not found";

// Teams are never deleted through the API: players keep a plain team_id
// with no cascade rule.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show).put(update))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Team>>>, ApiError> {
    let teams = state.db.call(|conn| Team::all(conn)).await?;
    Ok(Json(Envelope::data(teams)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<Team>>, ApiError> {
    let team = state
        .db
        .call(move |conn| Team::find(conn, id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(Envelope::data(team)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewTeam>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<CreatedTeam>>), ApiError> {
    let Json(payload) = payload?;
    let name = payload.validate()?.to_string();
    let team = state.db.call(move |conn| Team::create(conn, &name)).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(team).with_message("Team created successfully")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<TeamUpdate>, JsonRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Json(changes) = payload?;
    changes.validate()?;

    let found = state
        .db
        .call(move |conn| Team::update(conn, id, &changes))
        .await?;
    if !found {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(Envelope::message("Team updated successfully")))
}
