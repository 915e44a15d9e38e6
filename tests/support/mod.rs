#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;
use tempfile::TempDir;

use squad_compare::scope::{ConnectionSource, SqliteFile};
use squad_compare::views::{LeagueRow, Page, PlayerRow, TeamRow, ViewKind, ViewPage};
use squad_compare::{Browser, dataset, seed, selection};

pub struct Fixture {
    // Held so the database directory outlives the test.
    _dir: TempDir,
    pub path: PathBuf,
    pub browser: Browser<SqliteFile>,
}

impl Fixture {
    pub fn conn(&self) -> Connection {
        self.browser.source().connect().expect("open fixture db")
    }

    pub fn selection(&self, view: ViewKind) -> BTreeSet<String> {
        selection::load(&self.conn(), view).expect("load selection")
    }
}

pub fn demo() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("squad_compare.sqlite");
    let mut conn = dataset::open_db(&path, Duration::from_secs(2)).expect("open db");
    dataset::load_dataset(&mut conn, &seed::demo_dataset()).expect("seed demo data");
    drop(conn);

    let browser = Browser::new(SqliteFile::new(&path, Duration::from_secs(2)));
    browser.start().expect("start browser");
    Fixture {
        _dir: dir,
        path,
        browser,
    }
}

pub fn players(page: Page) -> ViewPage<PlayerRow> {
    match page {
        Page::Players(p) => p,
        other => panic!("expected players page, got {:?}", other.kind()),
    }
}

pub fn teams(page: Page) -> ViewPage<TeamRow> {
    match page {
        Page::Teams(p) => p,
        other => panic!("expected teams page, got {:?}", other.kind()),
    }
}

pub fn leagues(page: Page) -> ViewPage<LeagueRow> {
    match page {
        Page::Leagues(p) => p,
        other => panic!("expected leagues page, got {:?}", other.kind()),
    }
}

pub fn names(page: &Page) -> BTreeSet<String> {
    page.names().into_iter().map(str::to_string).collect()
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
