use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Playing roles a player may be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Batsman,
    Bowler,
    #[serde(rename = "All-Rounder")]
    AllRounder,
    #[serde(rename = "Wicket-Keeper Batsman")]
    WicketKeeperBatsman,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Batsman,
        Role::Bowler,
        Role::AllRounder,
        Role::WicketKeeperBatsman,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Batsman => "Batsman",
            Role::Bowler => "Bowler",
            Role::AllRounder => "All-Rounder",
            Role::WicketKeeperBatsman => "Wicket-Keeper Batsman",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
                ValidationError::new(format!("Role must be one of: {}", names.join(", ")))
            })
    }
}

/// Minimum length of a trimmed player name.
pub const MIN_NAME_LEN: usize = 2;

pub fn validate_player_name(name: &str) -> Result<()> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::new(
            "Player name must be at least 2 characters long",
        ));
    }
    Ok(())
}

pub fn validate_team_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Team name is required"));
    }
    Ok(())
}

pub fn validate_non_negative(field: &str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(ValidationError::new(format!("{} must be non-negative", field))),
        _ => Ok(()),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial-update payloads.
pub fn deserialize_some<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
