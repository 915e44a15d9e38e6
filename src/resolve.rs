//! View resolvers.
//!
//! Each resolver reads the effective filter criteria, picks exactly one query
//! shape in a fixed precedence order, fetches the rows, and then rewrites its
//! own selection set while clearing the other two. The whole read-modify-write
//! runs in one transaction.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};

use crate::dataset;
use crate::error::Result;
use crate::filter::{self, FilterCriteria};
use crate::selection;
use crate::views::{
    LeagueDetail, LeagueRow, Page, PlayerDetail, PlayerRow, TeamDetail, TeamRow, ViewKind,
    ViewPage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerQuery {
    /// Players who are members of a team in the team selection.
    MembersOfSelectedTeams,
    /// Players of a team registered in a league in the league selection.
    InSelectedLeagues,
    MinGoals { min_goals: i64 },
    NationalityAndGoals {
        nationalities: BTreeSet<String>,
        min_goals: i64,
    },
}

impl PlayerQuery {
    pub fn plan(criteria: &FilterCriteria) -> Self {
        if criteria.team_filter_active {
            PlayerQuery::MembersOfSelectedTeams
        } else if criteria.league_filter_active {
            PlayerQuery::InSelectedLeagues
        } else if criteria.nationalities.is_empty() {
            PlayerQuery::MinGoals {
                min_goals: criteria.min_goals,
            }
        } else {
            PlayerQuery::NationalityAndGoals {
                nationalities: criteria.nationalities.clone(),
                min_goals: criteria.min_goals,
            }
        }
    }

    pub fn branch(&self) -> &'static str {
        match self {
            PlayerQuery::MembersOfSelectedTeams => "selected_teams",
            PlayerQuery::InSelectedLeagues => "selected_leagues",
            PlayerQuery::MinGoals { .. } => "min_goals",
            PlayerQuery::NationalityAndGoals { .. } => "nationality_and_goals",
        }
    }

    fn sql(&self) -> (String, Vec<Value>) {
        const SELECT: &str = "SELECT DISTINCT p.playername, p.nationality, p.age, p.position, p.goals
                              FROM players p";
        match self {
            PlayerQuery::MembersOfSelectedTeams => (
                format!(
                    "{SELECT}
                     JOIN is_part_of i ON p.playername = i.playername
                     JOIN filter_teams f ON i.team_name = f.team_name"
                ),
                Vec::new(),
            ),
            PlayerQuery::InSelectedLeagues => (
                format!(
                    "{SELECT}
                     JOIN is_part_of i ON p.playername = i.playername
                     JOIN registered_in r ON i.team_name = r.team_name
                     JOIN filter_leagues f ON r.league_name = f.league_name"
                ),
                Vec::new(),
            ),
            PlayerQuery::MinGoals { min_goals } => (
                format!("{SELECT} WHERE p.goals >= ?1"),
                vec![Value::Integer(*min_goals)],
            ),
            PlayerQuery::NationalityAndGoals {
                nationalities,
                min_goals,
            } => {
                let mut args = vec![Value::Integer(*min_goals)];
                args.extend(nationalities.iter().cloned().map(Value::Text));
                (
                    format!(
                        "{SELECT} WHERE p.goals >= ?1 AND p.nationality IN ({})",
                        placeholders(2, nationalities.len())
                    ),
                    args,
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamQuery {
    /// Teams registered in a league in the league selection.
    InSelectedLeagues,
    /// Teams that have a player in the player selection.
    ClubsOfSelectedPlayers,
    MaxRanking { max_ranking: i64 },
    CountryAndRanking {
        countries: BTreeSet<String>,
        max_ranking: i64,
    },
}

impl TeamQuery {
    pub fn plan(criteria: &FilterCriteria) -> Self {
        if criteria.league_filter_active {
            TeamQuery::InSelectedLeagues
        } else if criteria.player_filter_active {
            TeamQuery::ClubsOfSelectedPlayers
        } else if criteria.countries.is_empty() {
            TeamQuery::MaxRanking {
                max_ranking: criteria.max_ranking,
            }
        } else {
            TeamQuery::CountryAndRanking {
                countries: criteria.countries.clone(),
                max_ranking: criteria.max_ranking,
            }
        }
    }

    pub fn branch(&self) -> &'static str {
        match self {
            TeamQuery::InSelectedLeagues => "selected_leagues",
            TeamQuery::ClubsOfSelectedPlayers => "selected_players",
            TeamQuery::MaxRanking { .. } => "max_ranking",
            TeamQuery::CountryAndRanking { .. } => "country_and_ranking",
        }
    }

    fn sql(&self) -> (String, Vec<Value>) {
        const SELECT: &str = "SELECT DISTINCT t.team_name, t.governing_country, t.manager,
                                     t.league_standing, t.goals_for
                              FROM teams t";
        match self {
            TeamQuery::InSelectedLeagues => (
                format!(
                    "{SELECT}
                     JOIN registered_in r ON t.team_name = r.team_name
                     JOIN filter_leagues f ON r.league_name = f.league_name"
                ),
                Vec::new(),
            ),
            TeamQuery::ClubsOfSelectedPlayers => (
                format!(
                    "{SELECT}
                     JOIN is_part_of i ON t.team_name = i.team_name
                     JOIN filter_players f ON i.playername = f.playername"
                ),
                Vec::new(),
            ),
            TeamQuery::MaxRanking { max_ranking } => (
                format!("{SELECT} WHERE t.league_standing <= ?1"),
                vec![Value::Integer(*max_ranking)],
            ),
            TeamQuery::CountryAndRanking {
                countries,
                max_ranking,
            } => {
                let mut args = vec![Value::Integer(*max_ranking)];
                args.extend(countries.iter().cloned().map(Value::Text));
                (
                    format!(
                        "{SELECT} WHERE t.league_standing <= ?1 AND t.governing_country IN ({})",
                        placeholders(2, countries.len())
                    ),
                    args,
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueQuery {
    /// Leagues with a registered team that has a player in the player selection.
    HostingSelectedPlayers,
    /// Leagues that register a team in the team selection.
    RegisteringSelectedTeams,
    All,
}

impl LeagueQuery {
    pub fn plan(criteria: &FilterCriteria) -> Self {
        if criteria.player_filter_active {
            LeagueQuery::HostingSelectedPlayers
        } else if criteria.team_filter_active {
            LeagueQuery::RegisteringSelectedTeams
        } else {
            LeagueQuery::All
        }
    }

    pub fn branch(&self) -> &'static str {
        match self {
            LeagueQuery::HostingSelectedPlayers => "selected_players",
            LeagueQuery::RegisteringSelectedTeams => "selected_teams",
            LeagueQuery::All => "all",
        }
    }

    fn sql(&self) -> String {
        const SELECT: &str =
            "SELECT DISTINCT l.league_name, l.firstplaceteam, l.lastplaceteam FROM leagues l";
        match self {
            LeagueQuery::HostingSelectedPlayers => format!(
                "{SELECT}
                 JOIN registered_in r ON l.league_name = r.league_name
                 JOIN is_part_of i ON r.team_name = i.team_name
                 JOIN filter_players f ON i.playername = f.playername"
            ),
            LeagueQuery::RegisteringSelectedTeams => format!(
                "{SELECT}
                 JOIN registered_in r ON l.league_name = r.league_name
                 JOIN filter_teams f ON r.team_name = f.team_name"
            ),
            LeagueQuery::All => SELECT.to_string(),
        }
    }
}

/// `?start, ?start+1, ...` for `count` parameters.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|idx| format!("?{idx}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn resolve(conn: &mut Connection, view: ViewKind) -> Result<Page> {
    match view {
        ViewKind::Players => resolve_players(conn).map(Page::Players),
        ViewKind::Teams => resolve_teams(conn).map(Page::Teams),
        ViewKind::Leagues => resolve_leagues(conn).map(Page::Leagues),
    }
}

pub fn resolve_players(conn: &mut Connection) -> Result<ViewPage<PlayerRow>> {
    let tx = dataset::write_transaction(conn)?;
    let criteria = filter::read_aggregate(&tx)?;
    let query = PlayerQuery::plan(&criteria);
    tracing::debug!(branch = query.branch(), "resolving players");

    let (sql, args) = query.sql();
    let rows = fetch_keyed(&tx, &sql, args, |row| {
        Ok(PlayerFull {
            name: row.get(0)?,
            nationality: row.get(1)?,
            age: row.get(2)?,
            position: row.get(3)?,
            goals: row.get(4)?,
        })
    })?;

    selection::commit_view(&tx, ViewKind::Players, rows.keys().map(String::as_str))?;
    tx.commit()?;

    let extended = criteria.extended_view;
    let rows = rows
        .into_values()
        .map(|p| PlayerRow {
            name: p.name,
            nationality: p.nationality,
            detail: extended.then_some(PlayerDetail {
                age: p.age,
                position: p.position,
                goals: p.goals,
            }),
        })
        .collect();
    Ok(ViewPage {
        branch: query.branch(),
        extended,
        rows,
    })
}

pub fn resolve_teams(conn: &mut Connection) -> Result<ViewPage<TeamRow>> {
    let tx = dataset::write_transaction(conn)?;
    let criteria = filter::read_aggregate(&tx)?;
    let query = TeamQuery::plan(&criteria);
    tracing::debug!(branch = query.branch(), "resolving teams");

    let (sql, args) = query.sql();
    let rows = fetch_keyed(&tx, &sql, args, |row| {
        Ok(TeamFull {
            name: row.get(0)?,
            country: row.get(1)?,
            manager: row.get(2)?,
            league_standing: row.get(3)?,
            goals_for: row.get(4)?,
        })
    })?;

    selection::commit_view(&tx, ViewKind::Teams, rows.keys().map(String::as_str))?;
    tx.commit()?;

    let extended = criteria.extended_view;
    let rows = rows
        .into_values()
        .map(|t| TeamRow {
            name: t.name,
            country: t.country,
            detail: extended.then_some(TeamDetail {
                manager: t.manager,
                league_standing: t.league_standing,
                goals_for: t.goals_for,
            }),
        })
        .collect();
    Ok(ViewPage {
        branch: query.branch(),
        extended,
        rows,
    })
}

pub fn resolve_leagues(conn: &mut Connection) -> Result<ViewPage<LeagueRow>> {
    let tx = dataset::write_transaction(conn)?;
    let criteria = filter::read_aggregate(&tx)?;
    let query = LeagueQuery::plan(&criteria);
    tracing::debug!(branch = query.branch(), "resolving leagues");

    let rows = fetch_keyed(&tx, &query.sql(), Vec::new(), |row| {
        Ok(LeagueFull {
            name: row.get(0)?,
            first_place_team: row.get(1)?,
            last_place_team: row.get(2)?,
        })
    })?;

    selection::commit_view(&tx, ViewKind::Leagues, rows.keys().map(String::as_str))?;
    tx.commit()?;

    let extended = criteria.extended_view;
    let rows = rows
        .into_values()
        .map(|l| LeagueRow {
            name: l.name,
            detail: extended.then_some(LeagueDetail {
                first_place_team: l.first_place_team,
                last_place_team: l.last_place_team,
            }),
        })
        .collect();
    Ok(ViewPage {
        branch: query.branch(),
        extended,
        rows,
    })
}

trait Keyed {
    fn key(&self) -> &str;
}

struct PlayerFull {
    name: String,
    nationality: String,
    age: Option<i64>,
    position: Option<String>,
    goals: i64,
}

struct TeamFull {
    name: String,
    country: String,
    manager: Option<String>,
    league_standing: i64,
    goals_for: i64,
}

struct LeagueFull {
    name: String,
    first_place_team: Option<String>,
    last_place_team: Option<String>,
}

impl Keyed for PlayerFull {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for TeamFull {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for LeagueFull {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Runs `sql` and dedupes rows by entity key; the map keeps rows ordered by name.
fn fetch_keyed<T, F>(
    conn: &Connection,
    sql: &str,
    args: Vec<Value>,
    map: F,
) -> Result<BTreeMap<String, T>>
where
    T: Keyed,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(args), map)?;
    let mut out = BTreeMap::new();
    for row in rows {
        let row = row?;
        out.entry(row.key().to_string()).or_insert(row);
    }
    Ok(out)
}
