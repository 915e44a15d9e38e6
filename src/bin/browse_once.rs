//! Runs a scripted sequence of requests and prints the resulting page as JSON.
//!
//! Steps are request paths; `/path=value` posts `value` as the form `name`:
//!
//! ```text
//! browse_once --db demo.sqlite /reset_filter_players /add_to_goals=10
//! ```

use anyhow::{Context, Result, anyhow};

use squad_compare::config::AppConfig;
use squad_compare::routes::Request;
use squad_compare::scope::SqliteFile;
use squad_compare::views::Page;
use squad_compare::{Browser, logging};

fn main() -> Result<()> {
    let config = AppConfig::load().context("unable to resolve sqlite path")?;
    logging::init_stderr(&config.log_filter)?;

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let print_each = args.iter().any(|a| a == "--each");
    let steps = parse_steps(&args);
    if steps.is_empty() {
        return Err(anyhow!("no request paths given (e.g. /compare_players)"));
    }

    let browser = Browser::new(SqliteFile::new(&config.db_path, config.busy_timeout));
    let mut last: Option<Page> = None;
    for request in &steps {
        let page = browser
            .follow(request)
            .with_context(|| format!("request {} failed", request.path))?;
        if print_each {
            println!("{}", serde_json::to_string(&page)?);
        }
        last = Some(page);
    }

    if !print_each && let Some(page) = last {
        println!("{}", serde_json::to_string_pretty(&page)?);
    }
    Ok(())
}

fn parse_steps(args: &[String]) -> Vec<Request> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--db" {
            skip_next = true;
            continue;
        }
        if !arg.starts_with('/') {
            continue;
        }
        match arg.split_once('=') {
            Some((path, value)) => out.push(Request::post(path, value)),
            None => out.push(Request::get(arg.as_str())),
        }
    }
    out
}
