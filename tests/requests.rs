mod support;

use std::path::PathBuf;
use std::time::Duration;

use squad_compare::routes::{Request, Response};
use squad_compare::scope::SqliteFile;
use squad_compare::selection;
use squad_compare::views::ViewKind;
use squad_compare::{BrowseError, Browser};

use support::{demo, leagues, names, players, set, teams};

#[test]
fn players_from_teams_shows_exactly_the_selected_club() {
    let fx = demo();
    selection::replace(&fx.conn(), ViewKind::Teams, ["Arsenal"]).unwrap();

    let page = fx
        .browser
        .follow(&Request::get("/go_to_players_from_teams"))
        .unwrap();
    assert_eq!(
        names(&page),
        set(&[
            "Bukayo Saka",
            "Declan Rice",
            "Martin Odegaard",
            "William Saliba",
        ])
    );
    assert!(fx.selection(ViewKind::Teams).is_empty());
    assert_eq!(fx.selection(ViewKind::Players), names(&page));
}

#[test]
fn selections_cascade_across_views() {
    let fx = demo();
    let b = &fx.browser;

    let t = teams(b.follow(&Request::post("/add_to_country", "Germany")).unwrap());
    assert_eq!(t.len(), 3);

    let p = players(b.follow(&Request::get("/go_to_players_from_teams")).unwrap());
    assert_eq!(p.branch, "selected_teams");
    assert_eq!(p.len(), 6);
    assert!(p.rows.iter().any(|r| r.name == "Harry Kane"));

    let l = leagues(b.follow(&Request::get("/go_to_leagues_from_players")).unwrap());
    assert_eq!(l.branch, "selected_players");
    assert_eq!(
        l.rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["Bundesliga"]
    );

    let t = teams(b.follow(&Request::get("/go_to_teams_from_leagues")).unwrap());
    assert_eq!(t.branch, "selected_leagues");
    assert_eq!(
        t.rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["Bayer Leverkusen", "Bayern Munich", "Borussia Dortmund"]
    );

    let p = players(b.follow(&Request::get("/go_to_players_from_leagues")).unwrap());
    assert_eq!(p.branch, "selected_leagues");
    assert!(p.is_empty(), "league selection was cleared by the team view");
}

#[test]
fn players_from_leagues_uses_the_league_selection() {
    let fx = demo();
    let b = &fx.browser;
    b.follow(&Request::get("/compare_leagues")).unwrap();
    selection::replace(&fx.conn(), ViewKind::Leagues, ["La Liga"]).unwrap();

    let p = players(b.follow(&Request::get("/go_to_players_from_leagues")).unwrap());
    assert_eq!(p.branch, "selected_leagues");
    assert_eq!(p.len(), 9);
}

#[test]
fn redirects_point_at_the_owning_view() {
    let fx = demo();
    let b = &fx.browser;
    let cases = [
        (Request::post("/add_to_nationality", "Spain"), ViewKind::Players),
        (Request::post("/add_to_goals", "3"), ViewKind::Players),
        (Request::post("/add_to_country", "Spain"), ViewKind::Teams),
        (Request::post("/add_to_ranking", "10"), ViewKind::Teams),
        (Request::get("/reset_filter_leagues"), ViewKind::Leagues),
        (Request::get("/detailed_view_players"), ViewKind::Players),
        (Request::get("/go_to_teams_from_players"), ViewKind::Teams),
    ];
    for (request, expected) in cases {
        assert_eq!(
            b.handle(&request).unwrap(),
            Response::Redirect(expected),
            "{}",
            request.path
        );
    }
}

#[test]
fn login_is_always_unauthorized() {
    let fx = demo();
    for _ in 0..2 {
        let err = fx.browser.handle(&Request::get("/login")).unwrap_err();
        assert!(matches!(err, BrowseError::Unauthorized));
        assert_eq!(err.status_code(), 401);
    }
    // Nothing was touched by the failed requests.
    let p = players(fx.browser.follow(&Request::get("/compare_players")).unwrap());
    assert_eq!(p.len(), 32);
}

#[test]
fn malformed_filter_input_is_rejected_without_writing() {
    let fx = demo();
    for request in [
        Request::post("/add_to_goals", "lots"),
        Request::post("/add_to_ranking", "-3"),
        Request::post("/add_to_nationality", ""),
        Request::post("/add_to_country", "A country name that is far too long"),
    ] {
        let err = fx.browser.handle(&request).unwrap_err();
        assert!(matches!(err, BrowseError::Validation { .. }), "{}", request.path);
    }
    let p = players(fx.browser.follow(&Request::get("/compare_players")).unwrap());
    assert_eq!(p.branch, "min_goals");
    assert_eq!(p.len(), 32);
}

#[test]
fn unknown_routes_are_not_found() {
    let fx = demo();
    for request in [
        Request::get("/compare_managers"),
        Request::get("/go_to_teams_from_teams"),
        Request::get("/add_to_goals"),
    ] {
        let err = fx.browser.handle(&request).unwrap_err();
        assert!(matches!(err, BrowseError::NotFound(_)), "{}", request.path);
    }
}

#[test]
fn unreachable_store_fails_with_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = PathBuf::from(dir.path()).join("missing.sqlite");
    let browser = Browser::new(SqliteFile::new(missing, Duration::from_millis(100)));

    assert!(matches!(browser.start(), Err(BrowseError::DataUnavailable(_))));
    for request in [
        Request::get("/compare_players"),
        Request::get("/compare_teams"),
        Request::get("/compare_leagues"),
        Request::post("/add_to_goals", "5"),
        Request::get("/go_to_leagues_from_teams"),
    ] {
        let err = browser.handle(&request).unwrap_err();
        assert!(matches!(err, BrowseError::DataUnavailable(_)), "{}", request.path);
        assert_eq!(err.status_code(), 503);
    }
    assert!(matches!(
        browser.handle(&Request::get("/login")),
        Err(BrowseError::Unauthorized)
    ));
}

#[test]
fn state_is_shared_between_browsers_on_one_store() {
    let fx = demo();
    let other = Browser::new(SqliteFile::new(&fx.path, Duration::from_secs(2)));

    other
        .handle(&Request::post("/add_to_nationality", "Norway"))
        .unwrap();
    let p = players(fx.browser.follow(&Request::get("/compare_players")).unwrap());
    assert_eq!(p.branch, "nationality_and_goals");
    assert_eq!(p.len(), 2);
}

#[test]
fn teams_from_players_lists_the_selected_players_clubs() {
    let fx = demo();
    selection::replace(&fx.conn(), ViewKind::Players, ["Harry Kane", "Bukayo Saka"]).unwrap();

    let page = fx
        .browser
        .follow(&Request::get("/go_to_teams_from_players"))
        .unwrap();
    assert_eq!(page.branch(), "selected_players");
    assert_eq!(names(&page), set(&["Arsenal", "Bayern Munich"]));
    assert!(fx.selection(ViewKind::Players).is_empty());
}

#[test]
fn leagues_from_teams_lists_the_registering_leagues() {
    let fx = demo();
    selection::replace(&fx.conn(), ViewKind::Teams, ["Arsenal", "Barcelona"]).unwrap();

    let l = leagues(
        fx.browser
            .follow(&Request::get("/go_to_leagues_from_teams"))
            .unwrap(),
    );
    assert_eq!(l.branch, "selected_teams");
    assert_eq!(
        l.rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["La Liga", "Premier League"]
    );
}

#[test]
fn start_resets_the_filter_and_keeps_selections() {
    let fx = demo();
    let b = &fx.browser;
    b.handle(&Request::post("/add_to_goals", "100")).unwrap();
    b.handle(&Request::get("/detailed_view_players")).unwrap();
    selection::replace(&fx.conn(), ViewKind::Teams, ["Chelsea"]).unwrap();

    b.start().unwrap();

    assert_eq!(fx.selection(ViewKind::Teams), set(&["Chelsea"]));
    let p = players(b.follow(&Request::get("/compare_players")).unwrap());
    assert_eq!(p.branch, "min_goals");
    assert!(!p.extended);
    assert_eq!(p.len(), 32);
}

#[test]
fn concurrent_browsers_on_one_store_never_fail() {
    let fx = demo();
    std::thread::scope(|s| {
        for worker in 0..4usize {
            let path = fx.path.clone();
            s.spawn(move || {
                // One browser per thread, as separate processes would have.
                let browser = Browser::new(SqliteFile::new(path, Duration::from_secs(10)));
                for round in 0..15usize {
                    let request = match (worker + round) % 3 {
                        0 => Request::get("/compare_players"),
                        1 => Request::post("/add_to_goals", (round % 5).to_string()),
                        _ => Request::get("/go_to_teams_from_players"),
                    };
                    if let Err(err) = browser.follow(&request) {
                        panic!("worker {worker} {}: {err}", request.path);
                    }
                }
                if worker == 0 {
                    browser.start().unwrap();
                }
            });
        }
    });
}
