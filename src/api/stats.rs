use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::error::ApiError;
use super::{AppState, Envelope};
use crate::models::{Player, RoleEntry, StatLine, Team, TeamRanking};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/batsmen", get(batsmen))
        .route("/bowlers", get(bowlers))
        .route("/teams", get(teams))
        .route("/dashboard", get(dashboard))
        .route("/roles", get(roles))
}

pub async fn batsmen(State(state): State<AppState>) -> Result<Json<Envelope<Vec<StatLine>>>, ApiError> {
    let lines = state.db.call(|conn| Player::top_batsmen(conn)).await?;
    Ok(Json(Envelope::data(lines)))
}

pub async fn bowlers(State(state): State<AppState>) -> Result<Json<Envelope<Vec<StatLine>>>, ApiError> {
    let lines = state.db.call(|conn| Player::top_bowlers(conn)).await?;
    Ok(Json(Envelope::data(lines)))
}

pub async fn teams(State(state): State<AppState>) -> Result<Json<Envelope<Vec<TeamRanking>>>, ApiError> {
    let rankings = state.db.call(|conn| Team::rankings(conn)).await?;
    Ok(Json(Envelope::data(rankings)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub top_batsman: Option<StatLine>,
    pub top_bowler: Option<StatLine>,
    pub top_team: Option<TeamRanking>,
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Envelope<Dashboard>>, ApiError> {
    let (batsmen, bowlers, rankings) = tokio::try_join!(
        state.db.call(|conn| Player::top_batsmen(conn)),
        state.db.call(|conn| Player::top_bowlers(conn)),
        state.db.call(|conn| Team::rankings(conn)),
    )?;

    Ok(Json(Envelope::data(Dashboard {
        top_batsman: batsmen.into_iter().next(),
        top_bowler: bowlers.into_iter().next(),
        top_team: rankings.into_iter().next(),
    })))
}

pub async fn roles(State(state): State<AppState>) -> Result<Json<Envelope<Vec<RoleEntry>>>, ApiError> {
    let roles = state.db.call(|conn| Player::roles(conn)).await?;
    Ok(Json(Envelope::data(roles)))
}
