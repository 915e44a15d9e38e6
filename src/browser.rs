use std::sync::Mutex;

use crate::dataset;
use crate::error::{BrowseError, Result};
use crate::filter;
use crate::routes::{self, Request, Response, Route};
use crate::scope::{ConnectionSource, RequestScope};
use crate::views::Page;

/// Owner of the shared filter state.
///
/// Requests are serialised so each read-modify-write sequence runs alone, but
/// the state itself stays global: every client sees the last committed filter
/// and selections, whoever wrote them.
pub struct Browser<S> {
    source: S,
    gate: Mutex<()>,
}

impl<S: ConnectionSource> Browser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            gate: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Ensures the schema and resets the filter to its defaults. Selections
    /// are left as they are.
    pub fn start(&self) -> Result<()> {
        let _guard = self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut scope = RequestScope::acquire(&self.source);
        let conn = scope.connection()?;
        dataset::init_schema(conn)?;
        let tx = dataset::write_transaction(conn)?;
        filter::reset(&tx)?;
        tx.commit()?;
        tracing::info!(source = %self.source.describe(), "filter state reset on start");
        Ok(())
    }

    pub fn handle(&self, request: &Request) -> Result<Response> {
        let route = Route::parse(request.method, &request.path)?;
        if route == Route::Login {
            tracing::warn!(path = %request.path, "login rejected");
            return Err(BrowseError::Unauthorized);
        }
        let _guard = self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut scope = RequestScope::acquire(&self.source);
        let result = routes::dispatch(&mut scope, route, &request.form);
        match &result {
            Ok(Response::Page(page)) => tracing::info!(
                path = %request.path,
                branch = page.branch(),
                rows = page.len(),
                "view resolved"
            ),
            Ok(Response::Redirect(view)) => {
                tracing::info!(path = %request.path, to = view.slug(), "redirect")
            }
            Err(err) => tracing::warn!(path = %request.path, error = %err, "request failed"),
        }
        result
    }

    /// Handles `request` and follows a redirect to the target view, the way
    /// a browser would after a form post or navigation link.
    pub fn follow(&self, request: &Request) -> Result<Page> {
        match self.handle(request)? {
            Response::Page(page) => Ok(page),
            Response::Redirect(view) => match self.handle(&Request::get(view.compare_path()))? {
                Response::Page(page) => Ok(page),
                Response::Redirect(_) => Err(BrowseError::NotFound(view.compare_path())),
            },
        }
    }
}
