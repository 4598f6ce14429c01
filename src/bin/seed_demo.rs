use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use scout_ratings::config::{Config, arg_value};
use scout_ratings::logging::init_stderr_logging;
use scout_ratings::synthetic::{DemoFormat, write_demo_dataset};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    init_stderr_logging(&Config::from_env());

    let out = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    let players = parse_count(&args, "--players", 12)?;
    let per_player = parse_count(&args, "--matches", 20)?;
    let seed = arg_value(&args, "--seed")
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("--seed must be an unsigned integer")?
        .unwrap_or(7);
    let format = match arg_value(&args, "--format") {
        Some(raw) => DemoFormat::parse(&raw)
            .ok_or_else(|| anyhow!("--format must be xlsx or csv, got {raw:?}"))?,
        None => DemoFormat::default(),
    };

    let summary = write_demo_dataset(&out, players, per_player, seed, format)?;

    println!("Demo dataset written");
    println!("Season table: {}", summary.season_file.display());
    println!("Match logs: {}", summary.match_folder.display());
    println!("Players: {}", summary.players);
    println!("Matches: {}", summary.matches);
    Ok(())
}

fn parse_count(args: &[String], name: &str, default: usize) -> Result<usize> {
    match arg_value(args, name) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("{name} must be a positive integer, got {raw:?}")),
        None => Ok(default),
    }
}
