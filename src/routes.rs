//! The request surface: method + path (+ form) mapped onto store operations.

use std::collections::HashMap;

use crate::error::{BrowseError, Result};
use crate::filter::{Criterion, FilterField};
use crate::navigation::{self, Navigation};
use crate::resolve;
use crate::scope::RequestScope;
use crate::views::{Page, ViewKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub form: HashMap<String, String>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            form: HashMap::new(),
        }
    }

    /// A filter form submission; the forms post a single `name` field.
    pub fn post(path: impl Into<String>, name: impl Into<String>) -> Self {
        let mut form = HashMap::new();
        form.insert("name".to_string(), name.into());
        Self {
            method: Method::Post,
            path: path.into(),
            form,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Compare(ViewKind),
    AddFilter(FilterField),
    Reset(ViewKind),
    Navigate(Navigation),
    Detailed(ViewKind),
    Login,
}

impl Route {
    pub fn parse(method: Method, path: &str) -> Result<Self> {
        let trimmed = path.trim_end_matches('/');
        let not_found = || BrowseError::NotFound(path.to_string());

        if method == Method::Post {
            let field = match trimmed {
                "/add_to_nationality" => FilterField::Nationality,
                "/add_to_goals" => FilterField::Goals,
                "/add_to_country" => FilterField::Country,
                "/add_to_ranking" => FilterField::Ranking,
                _ => return Err(not_found()),
            };
            return Ok(Route::AddFilter(field));
        }

        let name = trimmed.strip_prefix('/').ok_or_else(not_found)?;
        if name == "login" {
            return Ok(Route::Login);
        }
        if let Some(view) = name.strip_prefix("compare_").and_then(ViewKind::from_slug) {
            return Ok(Route::Compare(view));
        }
        if let Some(view) = name.strip_prefix("reset_filter_").and_then(ViewKind::from_slug) {
            return Ok(Route::Reset(view));
        }
        if let Some(view) = name.strip_prefix("detailed_view_").and_then(ViewKind::from_slug) {
            return Ok(Route::Detailed(view));
        }
        if let Some(rest) = name.strip_prefix("go_to_")
            && let Some((target, source)) = rest.split_once("_from_")
            && let (Some(target), Some(source)) =
                (ViewKind::from_slug(target), ViewKind::from_slug(source))
            && let Some(nav) = Navigation::new(target, source)
        {
            return Ok(Route::Navigate(nav));
        }
        Err(not_found())
    }

    pub fn method(self) -> Method {
        match self {
            Route::AddFilter(_) => Method::Post,
            _ => Method::Get,
        }
    }

    pub fn path(self) -> String {
        match self {
            Route::Compare(view) => view.compare_path(),
            Route::AddFilter(field) => format!("/add_to_{}", field.label()),
            Route::Reset(view) => format!("/reset_filter_{}", view.slug()),
            Route::Navigate(nav) => nav.path(),
            Route::Detailed(view) => format!("/detailed_view_{}", view.slug()),
            Route::Login => "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Page(Page),
    Redirect(ViewKind),
}

/// Runs one route against the request's connection scope.
pub fn dispatch(
    scope: &mut RequestScope,
    route: Route,
    form: &HashMap<String, String>,
) -> Result<Response> {
    match route {
        Route::Login => Err(BrowseError::Unauthorized),
        Route::Compare(view) => {
            let conn = scope.connection()?;
            resolve::resolve(conn, view).map(Response::Page)
        }
        Route::AddFilter(field) => {
            let raw = form
                .get("name")
                .ok_or_else(|| BrowseError::validation(field.label(), "missing form field `name`"))?;
            let criterion = Criterion::parse(field, raw)?;
            let conn = scope.connection()?;
            navigation::add_filter(conn, &criterion)?;
            Ok(Response::Redirect(navigation::filter_target(field)))
        }
        Route::Reset(view) => {
            let conn = scope.connection()?;
            navigation::reset_filter(conn, view).map(Response::Redirect)
        }
        Route::Navigate(nav) => {
            let conn = scope.connection()?;
            navigation::navigate(conn, nav).map(Response::Redirect)
        }
        Route::Detailed(view) => {
            let conn = scope.connection()?;
            navigation::detailed_view(conn, view).map(Response::Redirect)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_documented_path() {
        for view in ViewKind::ALL {
            for route in [Route::Compare(view), Route::Reset(view), Route::Detailed(view)] {
                assert_eq!(Route::parse(Method::Get, &route.path()).unwrap(), route);
            }
            for source in ViewKind::ALL {
                if let Some(nav) = Navigation::new(view, source) {
                    let route = Route::Navigate(nav);
                    assert_eq!(Route::parse(Method::Get, &route.path()).unwrap(), route);
                }
            }
        }
        for field in [
            FilterField::Nationality,
            FilterField::Goals,
            FilterField::Country,
            FilterField::Ranking,
        ] {
            let route = Route::AddFilter(field);
            assert_eq!(route.method(), Method::Post);
            assert_eq!(Route::parse(Method::Post, &route.path()).unwrap(), route);
        }
        assert_eq!(Route::parse(Method::Get, "/login").unwrap(), Route::Login);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        for (method, path) in [
            (Method::Get, "/go_to_players_from_players"),
            (Method::Get, "/compare_coaches"),
            (Method::Get, "/add_to_goals"),
            (Method::Post, "/compare_players"),
            (Method::Get, "compare_players"),
        ] {
            assert!(matches!(
                Route::parse(method, path),
                Err(BrowseError::NotFound(_))
            ));
        }
    }
}
