//! The filter store.
//!
//! Stored as append-only partial rows in the `filter` table: every criterion
//! adds a row with only its own column set. The effective criteria are the
//! aggregate over all rows: `MAX` for the numeric thresholds and the flags,
//! and the set of distinct values for nationality and country.

use std::collections::BTreeSet;

use rusqlite::{Connection, params};
use serde::Serialize;

use crate::error::{BrowseError, Result};

pub const DEFAULT_MIN_GOALS: i64 = 0;
pub const DEFAULT_MAX_RANKING: i64 = 20;

/// Column width of the free-text filter columns.
pub const MAX_TEXT_LEN: usize = 30;

/// Effective filter record as seen by the resolvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub nationalities: BTreeSet<String>,
    pub min_goals: i64,
    pub max_ranking: i64,
    pub countries: BTreeSet<String>,
    pub player_filter_active: bool,
    pub team_filter_active: bool,
    pub league_filter_active: bool,
    pub extended_view: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            nationalities: BTreeSet::new(),
            min_goals: DEFAULT_MIN_GOALS,
            max_ranking: DEFAULT_MAX_RANKING,
            countries: BTreeSet::new(),
            player_filter_active: false,
            team_filter_active: false,
            league_filter_active: false,
            extended_view: false,
        }
    }
}

/// The four user-editable filter fields, as posted from the filter forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Nationality,
    Goals,
    Country,
    Ranking,
}

impl FilterField {
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Nationality => "nationality",
            FilterField::Goals => "goals",
            FilterField::Country => "country",
            FilterField::Ranking => "ranking",
        }
    }
}

/// One partial update of the filter store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Nationality(String),
    MinGoals(i64),
    Country(String),
    MaxRanking(i64),
    PlayerFilter,
    TeamFilter,
    LeagueFilter,
    ExtendedView,
}

impl Criterion {
    /// Validates raw form input for `field`.
    pub fn parse(field: FilterField, raw: &str) -> Result<Self> {
        let value = raw.trim();
        match field {
            FilterField::Nationality => Ok(Criterion::Nationality(parse_text(field, value)?)),
            FilterField::Country => Ok(Criterion::Country(parse_text(field, value)?)),
            FilterField::Goals => {
                let n = parse_int(field, value)?;
                if n < 0 {
                    return Err(BrowseError::validation(field.label(), "must not be negative"));
                }
                Ok(Criterion::MinGoals(n))
            }
            FilterField::Ranking => {
                let n = parse_int(field, value)?;
                if n < 1 {
                    return Err(BrowseError::validation(field.label(), "must be at least 1"));
                }
                Ok(Criterion::MaxRanking(n))
            }
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Criterion::Nationality(_) => "nationality",
            Criterion::MinGoals(_) => "goals",
            Criterion::Country(_) => "country",
            Criterion::MaxRanking(_) => "ranking",
            Criterion::PlayerFilter => "player_filter",
            Criterion::TeamFilter => "team_filter",
            Criterion::LeagueFilter => "league_filter",
            Criterion::ExtendedView => "extended",
        }
    }

    fn value(&self) -> rusqlite::types::Value {
        use rusqlite::types::Value;
        match self {
            Criterion::Nationality(s) | Criterion::Country(s) => Value::Text(s.clone()),
            Criterion::MinGoals(n) | Criterion::MaxRanking(n) => Value::Integer(*n),
            Criterion::PlayerFilter
            | Criterion::TeamFilter
            | Criterion::LeagueFilter
            | Criterion::ExtendedView => Value::Integer(1),
        }
    }
}

fn parse_text(field: FilterField, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(BrowseError::validation(field.label(), "must not be empty"));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(BrowseError::validation(
            field.label(),
            format!("longer than {MAX_TEXT_LEN} characters"),
        ));
    }
    if value.chars().any(char::is_control) {
        return Err(BrowseError::validation(field.label(), "contains control characters"));
    }
    Ok(value.to_string())
}

fn parse_int(field: FilterField, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| BrowseError::validation(field.label(), format!("not an integer: {value:?}")))
}

/// Appends one partial row carrying only this criterion.
pub fn add_criterion(conn: &Connection, criterion: &Criterion) -> Result<()> {
    let sql = format!("INSERT INTO filter({}) VALUES (?1)", criterion.column());
    conn.execute(&sql, params![criterion.value()])?;
    tracing::debug!(column = criterion.column(), "filter criterion added");
    Ok(())
}

/// Drops every stored row and writes the defaults back.
pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM filter", [])?;
    conn.execute(
        "INSERT INTO filter(goals, ranking) VALUES (?1, ?2)",
        params![DEFAULT_MIN_GOALS, DEFAULT_MAX_RANKING],
    )?;
    tracing::debug!("filter reset to defaults");
    Ok(())
}

pub fn read_aggregate(conn: &Connection) -> Result<FilterCriteria> {
    let (goals, ranking, player, team, league, extended) = conn.query_row(
        "SELECT MAX(goals), MAX(ranking), MAX(player_filter), MAX(team_filter),
                MAX(league_filter), MAX(extended)
         FROM filter",
        [],
        |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, Option<i64>>(5)?,
            ))
        },
    )?;

    // Absent values (no row ever set the column) fall back to the defaults.
    Ok(FilterCriteria {
        nationalities: distinct_text(conn, "nationality")?,
        min_goals: goals.unwrap_or(DEFAULT_MIN_GOALS),
        max_ranking: ranking.unwrap_or(DEFAULT_MAX_RANKING),
        countries: distinct_text(conn, "country")?,
        player_filter_active: flag(player),
        team_filter_active: flag(team),
        league_filter_active: flag(league),
        extended_view: flag(extended),
    })
}

fn flag(value: Option<i64>) -> bool {
    value.is_some_and(|v| v != 0)
}

fn distinct_text(conn: &Connection, column: &str) -> Result<BTreeSet<String>> {
    let sql = format!("SELECT DISTINCT {column} FROM filter WHERE {column} IS NOT NULL");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut out = BTreeSet::new();
    for row in rows {
        out.insert(row?);
    }
    Ok(out)
}
