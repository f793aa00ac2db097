//! Static payloads for the query helper UI: preset statements and the help
//! document. The help document quotes the allow-list from
//! [`Command::ALLOWED`] so the two never drift apart.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::classifier::Command;

/// Ordered label/value pairs that serialize as a JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Labeled<V: 'static>(pub &'static [(&'static str, V)]);

impl<V: Serialize> Serialize for Labeled<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

pub const PRESETS: Labeled<&str> = Labeled(&[
    (
        "Top 5 Run Scorers",
        "SELECT p.name, t.name as team, p.runs FROM players p LEFT JOIN teams t ON p.team_id = t.id ORDER BY p.runs DESC LIMIT 5",
    ),
    (
        "Top 5 Wicket Takers",
        "SELECT p.name, t.name as team, p.wickets FROM players p LEFT JOIN teams t ON p.team_id = t.id ORDER BY p.wickets DESC LIMIT 5",
    ),
    (
        "All-Rounders (Runs > 1000 & Wickets > 50)",
        "SELECT p.name, t.name as team, p.runs, p.wickets FROM players p LEFT JOIN teams t ON p.team_id = t.id WHERE p.runs > 1000 AND p.wickets > 50 ORDER BY (p.runs + p.wickets * 20) DESC",
    ),
    (
        "Team Win Percentages",
        "SELECT name as team, wins, losses, ROUND((wins * 100.0) / (wins + losses), 2) as win_percentage FROM teams WHERE (wins + losses) > 0 ORDER BY win_percentage DESC",
    ),
    (
        "Players by Team",
        "SELECT t.name as team, COUNT(p.id) as player_count FROM teams t LEFT JOIN players p ON t.id = p.team_id GROUP BY t.id, t.name ORDER BY player_count DESC",
    ),
    (
        "Championship Winners",
        "SELECT name as team, trophies FROM teams WHERE trophies IS NOT NULL ORDER BY wins DESC",
    ),
    (
        "Batsmen vs Bowlers Count",
        "SELECT CASE WHEN role LIKE '%Batsman%' THEN 'Batsman' WHEN role = 'Bowler' THEN 'Bowler' WHEN role = 'All-Rounder' THEN 'All-Rounder' ELSE 'Other' END as role_type, COUNT(*) as count FROM players GROUP BY role_type",
    ),
    (
        "High Impact Players (Runs + Wickets)",
        "SELECT p.name, t.name as team, p.runs, p.wickets, (p.runs + p.wickets * 25) as impact_score FROM players p LEFT JOIN teams t ON p.team_id = t.id ORDER BY impact_score DESC LIMIT 10",
    ),
]);

pub const PRESETS_MESSAGE: &str = "Use these preset queries or create your own SELECT statements";
pub const HELP_MESSAGE: &str = "Query help and examples for the IPL database";

#[derive(Debug, Clone, Serialize)]
pub struct TableHelp {
    pub description: &'static str,
    pub columns: &'static [&'static str],
}

const TABLES: Labeled<TableHelp> = Labeled(&[
    (
        "teams",
        TableHelp {
            description: "IPL teams with their performance data",
            columns: &["id", "name", "wins", "losses", "trophies"],
        },
    ),
    (
        "players",
        TableHelp {
            description: "IPL players with their statistics",
            columns: &["id", "name", "role", "team_id", "runs", "wickets", "image_url"],
        },
    ),
]);

const EXAMPLES: Labeled<&str> = Labeled(&[
    ("Basic Select", "SELECT * FROM players LIMIT 5"),
    (
        "Join Tables",
        "SELECT p.name, t.name as team FROM players p JOIN teams t ON p.team_id = t.id",
    ),
    (
        "Filtering",
        "SELECT * FROM players WHERE role = 'Batsman' AND runs > 3000",
    ),
    (
        "Aggregation",
        "SELECT team_id, AVG(runs) as avg_runs FROM players GROUP BY team_id",
    ),
    ("Ordering", "SELECT name, runs FROM players ORDER BY runs DESC LIMIT 10"),
]);

const RESTRICTIONS: &[&str] = &[
    "Only read operations are allowed",
    "No INSERT, UPDATE, DELETE, or DROP statements",
    "No CREATE TABLE or ALTER TABLE statements",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryHelp {
    pub tables: Labeled<TableHelp>,
    pub examples: Labeled<&'static str>,
    pub allowed_commands: Vec<String>,
    pub restrictions: &'static [&'static str],
}

pub fn help() -> QueryHelp {
    QueryHelp {
        tables: TABLES,
        examples: EXAMPLES,
        allowed_commands: Command::ALLOWED
            .iter()
            .map(|c| c.keyword().to_uppercase())
            .collect(),
        restrictions: RESTRICTIONS,
    }
}
