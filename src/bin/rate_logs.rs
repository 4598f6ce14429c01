use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use scout_ratings::config::{Config, arg_value, has_flag};
use scout_ratings::export::export_ratings;
use scout_ratings::logging::init_stderr_logging;
use scout_ratings::overview::{format_rating, game_log_row, player_profile};
use scout_ratings::repository::DataRepository;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = Config::from_env().with_args(&args);
    init_stderr_logging(&cfg);

    let repo = DataRepository::from_config(&cfg);
    let report = repo.report();

    if has_flag(&args, "--json") {
        print_json(&repo, arg_value(&args, "--player").as_deref())?;
    } else {
        println!("Season: {}", repo.season_file().display());
        match &report.season_error {
            Some(err) => println!("  no season data: {err}"),
            None => println!("  players: {}", report.season_rows),
        }
        println!("Match logs: {}", repo.match_folder().display());
        println!(
            "  files: {}/{}  rows: {}",
            report.match_files_loaded, report.match_files_total, report.match_rows
        );
        if !report.errors.is_empty() {
            println!("Errors: {}", report.errors.len());
            for err in report.errors.iter().take(8) {
                println!(" - {err}");
            }
        }

        let players = match arg_value(&args, "--player") {
            Some(player) => vec![player],
            None => match_players(&repo),
        };
        for player in &players {
            print_player(&repo, player)?;
        }
    }

    if let Some(path) = arg_value(&args, "--xlsx").map(PathBuf::from) {
        let summary = export_ratings(&path, &repo)
            .with_context(|| format!("export ratings to {}", path.display()))?;
        eprintln!(
            "Exported {} season rows and {} match rows ({} rated) to {}",
            summary.season_rows,
            summary.match_rows,
            summary.rated_rows,
            path.display()
        );
    }

    Ok(())
}

/// Distinct player names in match-log order (rows are sorted by player).
fn match_players(repo: &DataRepository) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in repo.matches() {
        if out.last().map(String::as_str) != Some(row.player.as_str()) {
            out.push(row.player.clone());
        }
    }
    out
}

fn print_player(repo: &DataRepository, player: &str) -> Result<()> {
    let profile = player_profile(repo, player);
    if profile.games.is_empty() {
        bail!("no match logs for player {player:?}");
    }
    println!();
    println!(
        "{} | avg {} ({}) over {} rated of {} games",
        profile.player,
        format_rating(profile.average_display()),
        profile.average_band().label(),
        profile.rated_count,
        profile.games.len()
    );
    println!("  {}", profile.layout.headers().join(" | "));
    for game in &profile.games {
        println!("  {}", game_log_row(profile.layout, game).join(" | "));
    }
    Ok(())
}

fn print_json(repo: &DataRepository, player: Option<&str>) -> Result<()> {
    let games = match player {
        Some(player) => repo.rated_matches(player),
        None => repo.rate_all(),
    };
    for game in &games {
        let line = serde_json::to_string(game).context("serialize rated match")?;
        println!("{line}");
    }
    Ok(())
}
