use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rusqlite::Connection;
use std::hint::black_box;

use squad_compare::dataset::{init_schema, load_dataset};
use squad_compare::filter::{self, Criterion as FilterCriterion};
use squad_compare::resolve::{resolve_leagues, resolve_players, resolve_teams};
use squad_compare::seed::synthetic_dataset;

fn seeded_conn() -> Connection {
    let mut conn = Connection::open_in_memory().expect("in-memory db");
    init_schema(&conn).expect("schema");
    let mut rng = StdRng::seed_from_u64(42);
    let data = synthetic_dataset(&mut rng, 4, 20, 25);
    load_dataset(&mut conn, &data).expect("synthetic data");
    filter::reset(&conn).expect("reset filter");
    conn
}

fn bench_players_by_goals(c: &mut Criterion) {
    let mut conn = seeded_conn();
    filter::add_criterion(&conn, &FilterCriterion::MinGoals(120)).expect("goals");
    c.bench_function("resolve_players_min_goals", |b| {
        b.iter(|| {
            let page = resolve_players(black_box(&mut conn)).unwrap();
            black_box(page.len());
        })
    });
}

fn bench_players_by_nationality(c: &mut Criterion) {
    let mut conn = seeded_conn();
    for nation in ["England", "Spain", "Norway"] {
        filter::add_criterion(&conn, &FilterCriterion::Nationality(nation.into()))
            .expect("nationality");
    }
    filter::add_criterion(&conn, &FilterCriterion::ExtendedView).expect("extended");
    c.bench_function("resolve_players_nationality_extended", |b| {
        b.iter(|| {
            let page = resolve_players(black_box(&mut conn)).unwrap();
            black_box(page.len());
        })
    });
}

fn bench_teams_and_leagues(c: &mut Criterion) {
    let mut conn = seeded_conn();
    filter::add_criterion(&conn, &FilterCriterion::Country("Germany".into())).expect("country");
    c.bench_function("resolve_teams_country", |b| {
        b.iter(|| {
            let page = resolve_teams(black_box(&mut conn)).unwrap();
            black_box(page.len());
        })
    });
    c.bench_function("resolve_leagues_all", |b| {
        b.iter(|| {
            let page = resolve_leagues(black_box(&mut conn)).unwrap();
            black_box(page.len());
        })
    });
}

criterion_group!(
    benches,
    bench_players_by_goals,
    bench_players_by_nationality,
    bench_teams_and_leagues
);
criterion_main!(benches);
