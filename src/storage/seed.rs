use std::collections::HashMap;

use rusqlite::{params, Connection};
use tracing::info;

use super::error::Result;

struct SampleTeam {
    name: &'static str,
    wins: i64,
    losses: i64,
    trophies: Option<&'static str>,
}

struct SamplePlayer {
    name: &'static str,
    role: &'static str,
    team: &'static str,
    runs: i64,
    wickets: i64,
}

const IMAGE_BASE: &str = "https://ipl-stats-sports-mechanic.s3.ap-south-1.amazonaws.com/ipl/playerimages";

const TEAMS: &[SampleTeam] = &[
    SampleTeam { name: "Chennai Super Kings", wins: 121, losses: 85, trophies: Some("2010, 2011, 2018, 2021, 2023") },
    SampleTeam { name: "Delhi Capitals", wins: 93, losses: 116, trophies: None },
    SampleTeam { name: "Gujarat Titans", wins: 25, losses: 13, trophies: Some("2022") },
    SampleTeam { name: "Kolkata Knight Riders", wins: 113, losses: 97, trophies: Some("2012, 2014") },
    SampleTeam { name: "Lucknow Super Giants", wins: 17, losses: 13, trophies: None },
    SampleTeam { name: "Mumbai Indians", wins: 129, losses: 105, trophies: Some("2013, 2015, 2017, 2019, 2020") },
    SampleTeam { name: "Punjab Kings", wins: 95, losses: 115, trophies: None },
    SampleTeam { name: "Rajasthan Royals", wins: 94, losses: 105, trophies: Some("2008") },
    SampleTeam { name: "Royal Challengers Bangalore", wins: 100, losses: 111, trophies: None },
    SampleTeam { name: "Sunrisers Hyderabad", wins: 69, losses: 67, trophies: Some("2016") },
];

const PLAYERS: &[SamplePlayer] = &[
    SamplePlayer { name: "Virat Kohli", role: "Batsman", team: "Royal Challengers Bangalore", runs: 7263, wickets: 4 },
    SamplePlayer { name: "MS Dhoni", role: "Wicket-Keeper Batsman", team: "Chennai Super Kings", runs: 5082, wickets: 0 },
    SamplePlayer { name: "Rohit Sharma", role: "Batsman", team: "Mumbai Indians", runs: 6211, wickets: 15 },
    SamplePlayer { name: "Jasprit Bumrah", role: "Bowler", team: "Mumbai Indians", runs: 56, wickets: 157 },
    SamplePlayer { name: "KL Rahul", role: "Batsman", team: "Lucknow Super Giants", runs: 4162, wickets: 0 },
    SamplePlayer { name: "Ravindra Jadeja", role: "All-Rounder", team: "Chennai Super Kings", runs: 2692, wickets: 152 },
    SamplePlayer { name: "Andre Russell", role: "All-Rounder", team: "Kolkata Knight Riders", runs: 2262, wickets: 96 },
    SamplePlayer { name: "Jos Buttler", role: "Wicket-Keeper Batsman", team: "Rajasthan Royals", runs: 3223, wickets: 0 },
    SamplePlayer { name: "Yuzvendra Chahal", role: "Bowler", team: "Rajasthan Royals", runs: 35, wickets: 187 },
    SamplePlayer { name: "Rishabh Pant", role: "Wicket-Keeper Batsman", team: "Delhi Capitals", runs: 3057, wickets: 0 },
];

/// Number of teams inserted into an empty database.
pub const SAMPLE_TEAM_COUNT: usize = TEAMS.len();
/// Number of players inserted into an empty database.
pub const SAMPLE_PLAYER_COUNT: usize = PLAYERS.len();

fn player_image_url(name: &str) -> String {
    format!("{}/{}.png", IMAGE_BASE, name.replace(' ', "%20"))
}

fn is_empty(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count == 0)
}

/// Inserts the sample teams and players into whichever of the two tables is
/// still empty. Running it again on a populated database changes nothing.
pub fn seed_if_empty(conn: &mut Connection) -> Result<()> {
    if is_empty(conn, "teams")? {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO teams (name, wins, losses, trophies) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for team in TEAMS {
                stmt.execute(params![team.name, team.wins, team.losses, team.trophies])?;
            }
        }
        tx.commit()?;
        info!(count = TEAMS.len(), "sample teams added");
    }

    if is_empty(conn, "players")? {
        let team_ids: HashMap<String, i64> = {
            let mut stmt = conn.prepare("SELECT id, name FROM teams")?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(0)?)))?;
            let ids = rows.collect::<std::result::Result<_, _>>()?;
            ids
        };

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO players (name, role, team_id, runs, wickets, image_url) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for player in PLAYERS {
                let team_id = team_ids.get(player.team).copied();
                stmt.execute(params![
                    player.name,
                    player.role,
                    team_id,
                    player.runs,
                    player.wickets,
                    player_image_url(player.name),
                ])?;
            }
        }
        tx.commit()?;
        info!(count = PLAYERS.len(), "sample players added");
    }

    Ok(())
}
