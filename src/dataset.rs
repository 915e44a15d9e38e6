use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior, params};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub nationality: String,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub goals: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub governing_country: String,
    pub manager: Option<String>,
    pub league_standing: i64,
    pub goals_for: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    pub first_place_team: Option<String>,
    pub last_place_team: Option<String>,
}

/// Reference data plus its two relationships: player → team, team → league.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub leagues: Vec<League>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub memberships: Vec<(String, String)>,
    pub registrations: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetCounts {
    pub players: usize,
    pub teams: usize,
    pub leagues: usize,
}

pub fn open_db(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Opens a transaction holding the write lock from the start. A deferred
/// transaction that reads before writing cannot wait out another writer on
/// upgrade; `BEGIN IMMEDIATE` waits under the busy timeout instead.
pub fn write_transaction(conn: &mut Connection) -> Result<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS players (
            playername TEXT PRIMARY KEY,
            nationality TEXT NOT NULL,
            age INTEGER NULL,
            position TEXT NULL,
            goals INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS teams (
            team_name TEXT PRIMARY KEY,
            governing_country TEXT NOT NULL,
            manager TEXT NULL,
            league_standing INTEGER NOT NULL,
            goals_for INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS leagues (
            league_name TEXT PRIMARY KEY,
            firstplaceteam TEXT NULL,
            lastplaceteam TEXT NULL
        );
        CREATE TABLE IF NOT EXISTS is_part_of (
            playername TEXT NOT NULL,
            team_name TEXT NOT NULL,
            PRIMARY KEY (playername, team_name)
        );
        CREATE TABLE IF NOT EXISTS registered_in (
            team_name TEXT NOT NULL,
            league_name TEXT NOT NULL,
            PRIMARY KEY (team_name, league_name)
        );
        CREATE INDEX IF NOT EXISTS idx_is_part_of_team ON is_part_of(team_name);
        CREATE INDEX IF NOT EXISTS idx_registered_in_league ON registered_in(league_name);

        CREATE TABLE IF NOT EXISTS filter (
            nationality VARCHAR(30) NULL,
            goals INTEGER NULL,
            ranking INTEGER NULL,
            country VARCHAR(30) NULL,
            player_filter INTEGER NULL,
            team_filter INTEGER NULL,
            league_filter INTEGER NULL,
            extended INTEGER NULL
        );
        CREATE TABLE IF NOT EXISTS filter_players (
            playername VARCHAR(30) PRIMARY KEY
        );
        CREATE TABLE IF NOT EXISTS filter_teams (
            team_name VARCHAR(30) PRIMARY KEY
        );
        CREATE TABLE IF NOT EXISTS filter_leagues (
            league_name VARCHAR(30) PRIMARY KEY
        );
        "#,
    )?;
    Ok(())
}

/// Upserts the whole dataset in one transaction.
pub fn load_dataset(conn: &mut Connection, data: &Dataset) -> Result<DatasetCounts> {
    let tx = conn.transaction()?;
    for league in &data.leagues {
        upsert_league(&tx, league)?;
    }
    for team in &data.teams {
        upsert_team(&tx, team)?;
    }
    for player in &data.players {
        upsert_player(&tx, player)?;
    }
    for (player, team) in &data.memberships {
        tx.execute(
            "INSERT OR IGNORE INTO is_part_of(playername, team_name) VALUES (?1, ?2)",
            params![player, team],
        )?;
    }
    for (team, league) in &data.registrations {
        tx.execute(
            "INSERT OR IGNORE INTO registered_in(team_name, league_name) VALUES (?1, ?2)",
            params![team, league],
        )?;
    }
    tx.commit()?;
    dataset_counts(conn)
}

pub fn dataset_counts(conn: &Connection) -> Result<DatasetCounts> {
    let count = |table: &str| -> Result<usize> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?;
        Ok(usize::try_from(n).unwrap_or_default())
    };
    Ok(DatasetCounts {
        players: count("players")?,
        teams: count("teams")?,
        leagues: count("leagues")?,
    })
}

fn upsert_player(tx: &Transaction<'_>, p: &Player) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO players (playername, nationality, age, position, goals)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(playername) DO UPDATE SET
            nationality = excluded.nationality,
            age = excluded.age,
            position = excluded.position,
            goals = excluded.goals
        "#,
        params![p.name, p.nationality, p.age, p.position, p.goals],
    )?;
    Ok(())
}

fn upsert_team(tx: &Transaction<'_>, t: &Team) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO teams (team_name, governing_country, manager, league_standing, goals_for)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(team_name) DO UPDATE SET
            governing_country = excluded.governing_country,
            manager = excluded.manager,
            league_standing = excluded.league_standing,
            goals_for = excluded.goals_for
        "#,
        params![
            t.name,
            t.governing_country,
            t.manager,
            t.league_standing,
            t.goals_for
        ],
    )?;
    Ok(())
}

fn upsert_league(tx: &Transaction<'_>, l: &League) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO leagues (league_name, firstplaceteam, lastplaceteam)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(league_name) DO UPDATE SET
            firstplaceteam = excluded.firstplaceteam,
            lastplaceteam = excluded.lastplaceteam
        "#,
        params![l.name, l.first_place_team, l.last_place_team],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{Dataset, League, Player, Team, dataset_counts, init_schema, load_dataset};

    #[test]
    fn schema_is_idempotent_and_load_upserts() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let mut data = Dataset {
            leagues: vec![League {
                name: "L1".to_string(),
                first_place_team: Some("A".to_string()),
                last_place_team: None,
            }],
            teams: vec![Team {
                name: "A".to_string(),
                governing_country: "England".to_string(),
                manager: None,
                league_standing: 1,
                goals_for: 30,
            }],
            players: vec![Player {
                name: "P".to_string(),
                nationality: "Spain".to_string(),
                age: Some(22),
                position: Some("FW".to_string()),
                goals: 4,
            }],
            memberships: vec![("P".to_string(), "A".to_string())],
            registrations: vec![("A".to_string(), "L1".to_string())],
        };
        load_dataset(&mut conn, &data).unwrap();
        data.players[0].goals = 9;
        let counts = load_dataset(&mut conn, &data).unwrap();
        assert_eq!(counts.players, 1);
        assert_eq!(counts, dataset_counts(&conn).unwrap());

        let goals: i64 = conn
            .query_row("SELECT goals FROM players WHERE playername = 'P'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(goals, 9);
    }
}
