//! Cross-view selection sets: the entity keys each view displayed last.

use std::collections::BTreeSet;

use rusqlite::{Connection, params};

use crate::error::Result;
use crate::views::ViewKind;

fn table(view: ViewKind) -> (&'static str, &'static str) {
    match view {
        ViewKind::Players => ("filter_players", "playername"),
        ViewKind::Teams => ("filter_teams", "team_name"),
        ViewKind::Leagues => ("filter_leagues", "league_name"),
    }
}

pub fn load(conn: &Connection, view: ViewKind) -> Result<BTreeSet<String>> {
    let (table, column) = table(view);
    let mut stmt = conn.prepare(&format!("SELECT {column} FROM {table}"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut out = BTreeSet::new();
    for row in rows {
        out.insert(row?);
    }
    Ok(out)
}

pub fn clear(conn: &Connection, view: ViewKind) -> Result<()> {
    let (table, _) = table(view);
    conn.execute(&format!("DELETE FROM {table}"), [])?;
    Ok(())
}

pub fn replace<'a, I>(conn: &Connection, view: ViewKind, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    clear(conn, view)?;
    let (table, column) = table(view);
    let mut stmt = conn.prepare(&format!(
        "INSERT OR IGNORE INTO {table}({column}) VALUES (?1)"
    ))?;
    for name in names {
        stmt.execute(params![name])?;
    }
    Ok(())
}

/// Makes `names` the selection of `view` and empties the two peer selections.
pub fn commit_view<'a, I>(conn: &Connection, view: ViewKind, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    replace(conn, view, names)?;
    for peer in view.peers() {
        clear(conn, peer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::dataset::init_schema;

    #[test]
    fn commit_replaces_own_and_clears_peers() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        replace(&conn, ViewKind::Teams, ["Arsenal", "Chelsea"]).unwrap();
        replace(&conn, ViewKind::Leagues, ["Premier League"]).unwrap();
        replace(&conn, ViewKind::Players, ["Old"]).unwrap();

        commit_view(&conn, ViewKind::Players, ["Saka", "Rice", "Saka"]).unwrap();

        let players = load(&conn, ViewKind::Players).unwrap();
        assert_eq!(players.len(), 2);
        assert!(players.contains("Saka") && !players.contains("Old"));
        assert!(load(&conn, ViewKind::Teams).unwrap().is_empty());
        assert!(load(&conn, ViewKind::Leagues).unwrap().is_empty());
    }
}
