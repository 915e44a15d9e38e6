//! Filter and navigation mutators. Each one writes the filter store and
//! returns the view the caller should be redirected to.

use rusqlite::Connection;

use crate::dataset;
use crate::error::Result;
use crate::filter::{self, Criterion, FilterField};
use crate::views::ViewKind;

/// "Go to `target` from `source`": carries the source view's selection into
/// the target view as its filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    target: ViewKind,
    source: ViewKind,
}

impl Navigation {
    pub fn new(target: ViewKind, source: ViewKind) -> Option<Self> {
        (target != source).then_some(Self { target, source })
    }

    pub fn target(self) -> ViewKind {
        self.target
    }

    pub fn source(self) -> ViewKind {
        self.source
    }

    /// The cross-view flag naming the view whose selection becomes the filter.
    pub fn flag(self) -> Criterion {
        match self.source {
            ViewKind::Players => Criterion::PlayerFilter,
            ViewKind::Teams => Criterion::TeamFilter,
            ViewKind::Leagues => Criterion::LeagueFilter,
        }
    }

    pub fn path(self) -> String {
        format!("/go_to_{}_from_{}", self.target.slug(), self.source.slug())
    }
}

/// Where a filter form redirects once its criterion is stored.
pub fn filter_target(field: FilterField) -> ViewKind {
    match field {
        FilterField::Nationality | FilterField::Goals => ViewKind::Players,
        FilterField::Country | FilterField::Ranking => ViewKind::Teams,
    }
}

pub fn add_filter(conn: &Connection, criterion: &Criterion) -> Result<()> {
    filter::add_criterion(conn, criterion)
}

pub fn reset_filter(conn: &mut Connection, view: ViewKind) -> Result<ViewKind> {
    let tx = dataset::write_transaction(conn)?;
    filter::reset(&tx)?;
    tx.commit()?;
    Ok(view)
}

pub fn navigate(conn: &mut Connection, nav: Navigation) -> Result<ViewKind> {
    let tx = dataset::write_transaction(conn)?;
    filter::reset(&tx)?;
    filter::add_criterion(&tx, &nav.flag())?;
    tx.commit()?;
    tracing::debug!(
        target_view = nav.target().slug(),
        source_view = nav.source().slug(),
        "navigation flag set"
    );
    Ok(nav.target())
}

/// Turns on the extended projection without touching the other criteria.
pub fn detailed_view(conn: &Connection, view: ViewKind) -> Result<ViewKind> {
    filter::add_criterion(conn, &Criterion::ExtendedView)?;
    Ok(view)
}
