use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::validation::{self, deserialize_some, Role, ValidationError};
use crate::storage::Result;

const SELECT_PLAYER_VIEW: &str = "
    SELECT p.id, p.name, p.role, t.name AS team, p.runs, p.wickets, p.image_url
    FROM players p
    LEFT JOIN teams t ON p.team_id = t.id";

/// A player as listed to clients, with the team resolved to its name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub team: Option<String>,
    pub runs: i64,
    pub wickets: i64,
    pub image_url: Option<String>,
}

impl PlayerView {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
            team: row.get(3)?,
            runs: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
            wickets: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
            image_url: row.get(6)?,
        })
    }
}

/// A player row as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub team_id: Option<i64>,
    pub runs: i64,
    pub wickets: i64,
    pub image_url: Option<String>,
}

impl Player {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
            team_id: row.get(3)?,
            runs: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
            wickets: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
            image_url: row.get(6)?,
        })
    }

    pub fn all(conn: &Connection) -> Result<Vec<PlayerView>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY p.name", SELECT_PLAYER_VIEW))?;
        let players = stmt
            .query_map([], PlayerView::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(players)
    }

    pub fn find(conn: &Connection, id: i64) -> Result<Option<PlayerView>> {
        let player = conn
            .query_row(
                &format!("{} WHERE p.id = ?1", SELECT_PLAYER_VIEW),
                [id],
                PlayerView::from_row,
            )
            .optional()?;
        Ok(player)
    }

    pub fn find_record(conn: &Connection, id: i64) -> Result<Option<Player>> {
        let player = conn
            .query_row(
                "SELECT id, name, role, team_id, runs, wickets, image_url FROM players WHERE id = ?1",
                [id],
                Player::from_row,
            )
            .optional()?;
        Ok(player)
    }

    pub fn create(conn: &Connection, draft: &PlayerDraft) -> Result<Player> {
        conn.execute(
            "INSERT INTO players (name, role, team_id, runs, wickets, image_url) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.name,
                draft.role.as_str(),
                draft.team_id,
                draft.runs,
                draft.wickets,
                draft.image_url
            ],
        )?;

        Ok(Player {
            id: conn.last_insert_rowid(),
            name: draft.name.clone(),
            role: draft.role.to_string(),
            team_id: draft.team_id,
            runs: draft.runs,
            wickets: draft.wickets,
            image_url: draft.image_url.clone(),
        })
    }

    /// Applies `changes` over the stored row. Returns `false` when no player
    /// has this id.
    pub fn update(conn: &Connection, id: i64, changes: &PlayerUpdate) -> Result<bool> {
        let Some(player) = Player::find_record(conn, id)? else {
            return Ok(false);
        };

        conn.execute(
            "UPDATE players SET name = ?1, role = ?2, team_id = ?3, runs = ?4, wickets = ?5, image_url = ?6 WHERE id = ?7",
            params![
                changes.name.as_deref().unwrap_or(&player.name),
                changes.role.as_deref().unwrap_or(&player.role),
                changes.team_id.unwrap_or(player.team_id),
                changes.runs.unwrap_or(player.runs),
                changes.wickets.unwrap_or(player.wickets),
                changes.image_url.clone().unwrap_or(player.image_url),
                id
            ],
        )?;
        Ok(true)
    }

    /// Returns `false` when nothing was deleted.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn.execute("DELETE FROM players WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Players with at least one run, most runs first.
    pub fn top_batsmen(conn: &Connection) -> Result<Vec<StatLine>> {
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, t.name AS team, p.role, p.runs, p.image_url
             FROM players p
             LEFT JOIN teams t ON p.team_id = t.id
             WHERE p.runs > 0
             ORDER BY p.runs DESC",
        )?;
        let lines = stmt
            .query_map([], |row| {
                Ok(StatLine {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    team: row.get(2)?,
                    role: row.get(3)?,
                    runs: Some(row.get(4)?),
                    wickets: None,
                    image_url: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lines)
    }

    /// Players with at least one wicket, most wickets first.
    pub fn top_bowlers(conn: &Connection) -> Result<Vec<StatLine>> {
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, t.name AS team, p.role, p.wickets, p.image_url
             FROM players p
             LEFT JOIN teams t ON p.team_id = t.id
             WHERE p.wickets > 0
             ORDER BY p.wickets DESC",
        )?;
        let lines = stmt
            .query_map([], |row| {
                Ok(StatLine {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    team: row.get(2)?,
                    role: row.get(3)?,
                    runs: None,
                    wickets: Some(row.get(4)?),
                    image_url: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lines)
    }

    pub fn roles(conn: &Connection) -> Result<Vec<RoleEntry>> {
        let mut stmt = conn.prepare("SELECT DISTINCT role FROM players WHERE role IS NOT NULL")?;
        let roles = stmt
            .query_map([], |row| Ok(RoleEntry { role: row.get(0)? }))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(roles)
    }
}

/// One leaderboard entry; carries either `runs` or `wickets`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLine {
    pub id: i64,
    pub name: String,
    pub team: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wickets: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleEntry {
    pub role: String,
}

/// Create-player payload as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub runs: Option<i64>,
    #[serde(default)]
    pub wickets: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A create-player payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDraft {
    pub name: String,
    pub role: Role,
    pub team_id: Option<i64>,
    pub runs: i64,
    pub wickets: i64,
    pub image_url: Option<String>,
}

impl NewPlayer {
    pub fn validate(self) -> validation::Result<PlayerDraft> {
        let (Some(name), Some(role)) = (self.name, self.role) else {
            return Err(ValidationError::new("Name and role are required"));
        };
        if name.is_empty() || role.is_empty() {
            return Err(ValidationError::new("Name and role are required"));
        }
        validation::validate_player_name(&name)?;
        let role: Role = role.parse()?;
        validation::validate_non_negative("runs", self.runs)?;
        validation::validate_non_negative("wickets", self.wickets)?;

        Ok(PlayerDraft {
            name,
            role,
            team_id: self.team_id,
            runs: self.runs.unwrap_or(0),
            wickets: self.wickets.unwrap_or(0),
            image_url: self.image_url.filter(|url| !url.is_empty()),
        })
    }
}

/// Partial update payload. Absent fields keep their stored value; an
/// explicit `null` clears `team_id` or `image_url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub team_id: Option<Option<i64>>,
    #[serde(default)]
    pub runs: Option<i64>,
    #[serde(default)]
    pub wickets: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image_url: Option<Option<String>>,
}

impl PlayerUpdate {
    pub fn validate(&self) -> validation::Result<()> {
        if let Some(name) = &self.name {
            validation::validate_player_name(name)?;
        }
        if let Some(role) = &self.role {
            role.parse::<Role>()?;
        }
        validation::validate_non_negative("runs", self.runs)?;
        validation::validate_non_negative("wickets", self.wickets)?;
        Ok(())
    }
}
