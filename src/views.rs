use serde::Serialize;

/// The three list views. Each one owns a selection set that the other two
/// consume as a filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Players,
    Teams,
    Leagues,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Players, ViewKind::Teams, ViewKind::Leagues];

    pub fn slug(self) -> &'static str {
        match self {
            ViewKind::Players => "players",
            ViewKind::Teams => "teams",
            ViewKind::Leagues => "leagues",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        match raw {
            "players" => Some(ViewKind::Players),
            "teams" => Some(ViewKind::Teams),
            "leagues" => Some(ViewKind::Leagues),
            _ => None,
        }
    }

    pub fn compare_path(self) -> String {
        format!("/compare_{}", self.slug())
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Players => "Players",
            ViewKind::Teams => "Teams",
            ViewKind::Leagues => "Leagues",
        }
    }

    /// The two views whose selections are cleared when this one resolves.
    pub fn peers(self) -> [ViewKind; 2] {
        match self {
            ViewKind::Players => [ViewKind::Teams, ViewKind::Leagues],
            ViewKind::Teams => [ViewKind::Players, ViewKind::Leagues],
            ViewKind::Leagues => [ViewKind::Players, ViewKind::Teams],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerDetail {
    pub age: Option<i64>,
    pub position: Option<String>,
    pub goals: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRow {
    pub name: String,
    pub nationality: String,
    #[serde(flatten)]
    pub detail: Option<PlayerDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamDetail {
    pub manager: Option<String>,
    pub league_standing: i64,
    pub goals_for: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRow {
    pub name: String,
    pub country: String,
    #[serde(flatten)]
    pub detail: Option<TeamDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueDetail {
    pub first_place_team: Option<String>,
    pub last_place_team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueRow {
    pub name: String,
    #[serde(flatten)]
    pub detail: Option<LeagueDetail>,
}

/// Rows of one resolved view plus the query branch that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPage<R> {
    pub branch: &'static str,
    pub extended: bool,
    pub rows: Vec<R>,
}

impl<R> ViewPage<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Page {
    Players(ViewPage<PlayerRow>),
    Teams(ViewPage<TeamRow>),
    Leagues(ViewPage<LeagueRow>),
}

impl Page {
    pub fn kind(&self) -> ViewKind {
        match self {
            Page::Players(_) => ViewKind::Players,
            Page::Teams(_) => ViewKind::Teams,
            Page::Leagues(_) => ViewKind::Leagues,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Page::Players(p) => p.len(),
            Page::Teams(p) => p.len(),
            Page::Leagues(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extended(&self) -> bool {
        match self {
            Page::Players(p) => p.extended,
            Page::Teams(p) => p.extended,
            Page::Leagues(p) => p.extended,
        }
    }

    pub fn branch(&self) -> &'static str {
        match self {
            Page::Players(p) => p.branch,
            Page::Teams(p) => p.branch,
            Page::Leagues(p) => p.branch,
        }
    }

    /// Entity keys in display order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Page::Players(p) => p.rows.iter().map(|r| r.name.as_str()).collect(),
            Page::Teams(p) => p.rows.iter().map(|r| r.name.as_str()).collect(),
            Page::Leagues(p) => p.rows.iter().map(|r| r.name.as_str()).collect(),
        }
    }
}
