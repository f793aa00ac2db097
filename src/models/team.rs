use std::cmp::Ordering;

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::validation::{self, deserialize_some, ValidationError};
use crate::storage::Result;

const SELECT_TEAM: &str = "SELECT id, name, wins, losses, trophies FROM teams";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub id: i64,
    #[serde(rename = "team")]
    pub name: String,
    pub wins: i64,
    pub losses: i64,
    /// Comma separated title years, e.g. `"2010, 2011"`.
    pub trophies: Option<String>,
}

impl Team {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            wins: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
            losses: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
            trophies: row.get(4)?,
        })
    }

    pub fn matches_played(&self) -> i64 {
        self.wins + self.losses
    }

    /// Two points per win.
    pub fn points(&self) -> i64 {
        self.wins * 2
    }

    /// Wins as a percentage of matches played, rounded to one decimal place;
    /// zero when no matches have been played.
    pub fn win_percentage(&self) -> f64 {
        let played = self.matches_played();
        if played <= 0 {
            return 0.0;
        }
        let pct = self.wins as f64 * 100.0 / played as f64;
        (pct * 10.0).round() / 10.0
    }

    pub fn all(conn: &Connection) -> Result<Vec<Team>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY wins DESC", SELECT_TEAM))?;
        let teams = stmt
            .query_map([], Team::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(teams)
    }

    pub fn find(conn: &Connection, id: i64) -> Result<Option<Team>> {
        let team = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_TEAM), [id], Team::from_row)
            .optional()?;
        Ok(team)
    }

    pub fn create(conn: &Connection, name: &str) -> Result<CreatedTeam> {
        conn.execute("INSERT INTO teams (name) VALUES (?1)", [name])?;
        Ok(CreatedTeam {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Applies `changes` over the stored row. Returns `false` when no team
    /// has this id.
    pub fn update(conn: &Connection, id: i64, changes: &TeamUpdate) -> Result<bool> {
        let Some(team) = Team::find(conn, id)? else {
            return Ok(false);
        };

        let name = changes
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&team.name);
        let trophies = match &changes.trophies {
            Some(trophies) => trophies.clone(),
            None => team.trophies.clone(),
        };

        conn.execute(
            "UPDATE teams SET name = ?1, wins = ?2, losses = ?3, trophies = ?4 WHERE id = ?5",
            params![
                name,
                changes.wins.unwrap_or(team.wins),
                changes.losses.unwrap_or(team.losses),
                trophies,
                id
            ],
        )?;
        Ok(true)
    }

    /// League table: points descending, then win percentage descending.
    pub fn rankings(conn: &Connection) -> Result<Vec<TeamRanking>> {
        let mut rankings: Vec<TeamRanking> = Team::all(conn)?
            .iter()
            .map(TeamRanking::from)
            .collect();
        rankings.sort_by(|a, b| {
            b.points.cmp(&a.points).then_with(|| {
                b.win_percentage
                    .partial_cmp(&a.win_percentage)
                    .unwrap_or(Ordering::Equal)
            })
        });
        Ok(rankings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedTeam {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRanking {
    pub id: i64,
    pub team: String,
    pub wins: i64,
    pub losses: i64,
    pub points: i64,
    pub win_percentage: f64,
    pub trophies: Option<String>,
}

impl From<&Team> for TeamRanking {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            team: team.name.clone(),
            wins: team.wins,
            losses: team.losses,
            points: team.points(),
            win_percentage: team.win_percentage(),
            trophies: team.trophies.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTeam {
    #[serde(default)]
    pub name: Option<String>,
}

impl NewTeam {
    pub fn validate(&self) -> validation::Result<&str> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| ValidationError::new("Team name is required"))?;
        validation::validate_team_name(name)?;
        Ok(name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub wins: Option<i64>,
    #[serde(default)]
    pub losses: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub trophies: Option<Option<String>>,
}

impl TeamUpdate {
    pub fn validate(&self) -> validation::Result<()> {
        validation::validate_non_negative("wins", self.wins)?;
        validation::validate_non_negative("losses", self.losses)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(wins: i64, losses: i64) -> Team {
        Team {
            id: 1,
            name: "Gujarat Titans".to_string(),
            wins,
            losses,
            trophies: Some("2022".to_string()),
        }
    }

    #[test]
    fn test_points_are_two_per_win() {
        assert_eq!(team(25, 13).points(), 50);
        assert_eq!(team(0, 4).points(), 0);
    }

    #[test]
    fn test_win_percentage_rounds_to_one_decimal() {
        assert_eq!(team(25, 13).win_percentage(), 65.8);
        assert_eq!(team(121, 85).win_percentage(), 58.7);
        assert_eq!(team(1, 1).win_percentage(), 50.0);
    }

    #[test]
    fn test_win_percentage_without_matches_is_zero() {
        assert_eq!(team(0, 0).win_percentage(), 0.0);
    }

    #[test]
    fn test_ranking_serializes_team_name_under_team() {
        let value = serde_json::to_value(TeamRanking::from(&team(25, 13))).unwrap();
        assert_eq!(value["team"], "Gujarat Titans");
        assert_eq!(value["points"], 50);
        assert_eq!(value["win_percentage"], 65.8);
    }

    #[test]
    fn test_update_payload_distinguishes_null_from_absent() {
        let absent: TeamUpdate = serde_json::from_str(r#"{"wins": 3}"#).unwrap();
        assert_eq!(absent.trophies, None);

        let cleared: TeamUpdate = serde_json::from_str(r#"{"trophies": null}"#).unwrap();
        assert_eq!(cleared.trophies, Some(None));
    }

    #[test]
    fn test_new_team_requires_a_name() {
        assert!(NewTeam::default().validate().is_err());
        assert!(NewTeam { name: Some("  ".to_string()) }.validate().is_err());
        assert_eq!(
            NewTeam { name: Some("Kochi Tuskers".to_string()) }.validate().unwrap(),
            "Kochi Tuskers"
        );
    }
}
