use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use squad_compare::config::AppConfig;
use squad_compare::scope::SqliteFile;
use squad_compare::{Browser, dataset, logging, seed};

const DEFAULT_SYNTHETIC_SEED: u64 = 2026;

fn main() -> Result<()> {
    let config = AppConfig::load().context("unable to resolve sqlite path")?;
    logging::init_stderr(&config.log_filter)?;

    let mut conn = dataset::open_db(&config.db_path, config.busy_timeout)
        .with_context(|| format!("open sqlite db {}", config.db_path.display()))?;

    let mut counts = dataset::load_dataset(&mut conn, &seed::demo_dataset())
        .context("load demo dataset")?;

    if let Some(players_per_team) = parse_usize_arg("--synthetic") {
        let seed_value = parse_usize_arg("--seed")
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_SYNTHETIC_SEED);
        let mut rng = StdRng::seed_from_u64(seed_value);
        let data = seed::synthetic_dataset(&mut rng, 4, 20, players_per_team.max(1));
        counts = dataset::load_dataset(&mut conn, &data).context("load synthetic dataset")?;
    }
    drop(conn);

    // Leave the filter at its defaults so the first view shows everything.
    Browser::new(SqliteFile::new(&config.db_path, config.busy_timeout)).start()?;

    println!("Seed complete");
    println!("DB: {}", config.db_path.display());
    println!(
        "Players: {} | Teams: {} | Leagues: {}",
        counts.players, counts.teams, counts.leagues
    );
    Ok(())
}

fn parse_usize_arg(flag: &str) -> Option<usize> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            return raw.trim().parse().ok();
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
        {
            return next.trim().parse().ok();
        }
    }
    None
}
