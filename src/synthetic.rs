//! Synthetic season and match-log exports for demos and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::export::{Cell, season_sheet_rows, write_workbook};
use crate::match_logs::{FILE_PREFIX, MatchRecord};
use crate::season_data::SeasonRecord;
use crate::sheet::CSV_EXTENSION;
use crate::stats::{MatchStats, or_zero, parse_number};

const FIRST_NAMES: [&str; 12] = [
    "Jack", "Oliver", "Mateo", "Luca", "Kofi", "Ryan", "Tomas", "Ethan", "Noah", "Sami", "Callum",
    "Jonas",
];
const LAST_NAMES: [&str; 12] = [
    "Smith", "Okafor", "Fernandes", "Bianchi", "Mensah", "Walsh", "Novak", "Hughes", "Berg",
    "Haddad", "Reid", "Lindqvist",
];
const TEAMS: [&str; 6] = [
    "Harbour Town",
    "Northgate",
    "Riverside",
    "Kingsbridge",
    "Eastfield",
    "Stonemoor",
];
const POSITIONS: [&str; 10] = [
    "GK", "LCB", "RCB", "LB", "RWB", "RCMF", "LDMF", "AMF", "LWF", "CF",
];

/// `(header cell, attempts column, paired column)`: a paired stat spans two physical columns
/// and only the first carries a label.
const LAYOUT: &[(&str, &str, Option<&str>)] = &[
    ("Minutes played", "Minutes played", None),
    ("Total actions / successful", "Total actions", Some("Total actions_successful")),
    ("Goals", "Goals", None),
    ("Assists", "Assists", None),
    ("Shots / on target", "Shots", Some("Shots_on target")),
    ("xG", "xG", None),
    ("Passes / accurate", "Passes", Some("Passes_accurate")),
    ("Crosses / accurate", "Crosses", Some("Crosses_accurate")),
    ("Dribbles / successful", "Dribbles", Some("Dribbles_successful")),
    ("Duels / won", "Duels", Some("Duels_won")),
    ("Aerial duels / won", "Aerial duels", Some("Aerial duels_won")),
    ("Losses", "Losses", None),
    ("Recoveries", "Recoveries", None),
    ("Interceptions", "Interceptions", None),
    ("Clearances", "Clearances", None),
    ("Defensive duels / won", "Defensive duels", Some("Defensive duels_won")),
    ("Shot assists", "Shot assists", None),
    ("xA", "xA", None),
    ("Progressive runs", "Progressive runs", None),
    ("Touches in penalty area", "Touches in penalty area", None),
    ("Fouls", "Fouls", None),
    ("Yellow cards", "Yellow cards", None),
    ("Red cards", "Red cards", None),
    ("Conceded goals", "Conceded goals", None),
    ("xCG", "xCG", None),
    ("Shots against", "Shots against", None),
    ("Saves", "Saves", None),
    ("Exits", "Exits", None),
];

#[derive(Debug, Clone)]
pub struct DemoPlayer {
    pub name: String,
    pub team: &'static str,
    pub position: &'static str,
    pub age: u32,
}

#[derive(Debug, Clone)]
pub struct DemoSummary {
    pub season_file: PathBuf,
    pub match_folder: PathBuf,
    pub players: usize,
    pub matches: usize,
}

pub fn demo_players(rng: &mut impl Rng, count: usize) -> Vec<DemoPlayer> {
    (0..count)
        .map(|idx| DemoPlayer {
            name: format!(
                "{} {}",
                FIRST_NAMES[idx % FIRST_NAMES.len()],
                LAST_NAMES[(idx * 7 + idx / LAST_NAMES.len()) % LAST_NAMES.len()]
            ),
            team: TEAMS[rng.gen_range(0..TEAMS.len())],
            position: POSITIONS[idx % POSITIONS.len()],
            age: rng.gen_range(18..=34),
        })
        .collect()
}

fn count(rng: &mut impl Rng, max: u32) -> Option<f64> {
    Some(rng.gen_range(0..=max) as f64)
}

fn made_of(rng: &mut impl Rng, attempts: Option<f64>) -> Option<f64> {
    let attempts = or_zero(attempts) as u32;
    Some(rng.gen_range(0..=attempts) as f64)
}

fn expected(rng: &mut impl Rng, max: f64) -> Option<f64> {
    Some((rng.gen_range(0.0..max) * 100.0).round() / 100.0)
}

pub fn synthetic_stats(rng: &mut impl Rng, position: &str) -> MatchStats {
    let keeper = position.contains("GK");
    let minutes = if rng.gen_bool(0.15) {
        rng.gen_range(1..45)
    } else {
        rng.gen_range(60..=90)
    };

    let mut s = MatchStats {
        minutes_played: Some(minutes as f64),
        total_actions: count(rng, 70),
        passes: count(rng, 60),
        duels: count(rng, 18),
        aerial_duels: count(rng, 8),
        defensive_duels: count(rng, 10),
        losses: count(rng, 14),
        recoveries: count(rng, 10),
        interceptions: count(rng, 6),
        clearances: count(rng, if keeper { 3 } else { 7 }),
        fouls: count(rng, 3),
        yellow_cards: Some(if rng.gen_bool(0.12) { 1.0 } else { 0.0 }),
        red_cards: Some(if rng.gen_bool(0.01) { 1.0 } else { 0.0 }),
        ..Default::default()
    };
    s.total_actions_successful = made_of(rng, s.total_actions);
    s.passes_accurate = made_of(rng, s.passes);
    s.duels_won = made_of(rng, s.duels);
    s.aerial_duels_won = made_of(rng, s.aerial_duels);
    s.defensive_duels_won = made_of(rng, s.defensive_duels);

    if keeper {
        s.shots_against = count(rng, 8);
        s.saves = made_of(rng, s.shots_against);
        let saves = or_zero(s.saves);
        s.conceded_goals = Some(or_zero(s.shots_against) - saves);
        s.xcg = expected(rng, 2.5);
        s.exits = count(rng, 3);
    } else {
        s.goals = Some(if rng.gen_bool(0.2) { 1.0 } else { 0.0 });
        s.assists = Some(if rng.gen_bool(0.15) { 1.0 } else { 0.0 });
        s.shots = count(rng, 5);
        s.shots_on_target = made_of(rng, s.shots);
        s.xg = expected(rng, 0.9);
        s.xa = expected(rng, 0.5);
        s.shot_assists = count(rng, 3);
        s.crosses = count(rng, 6);
        s.crosses_accurate = made_of(rng, s.crosses);
        s.dribbles = count(rng, 7);
        s.dribbles_successful = made_of(rng, s.dribbles);
        s.progressive_runs = count(rng, 5);
        s.touches_in_box = count(rng, 8);
    }
    s
}

/// Already-normalized match rows, as the loader would produce them.
pub fn synthetic_match_rows(seed: u64, players: usize, per_player: usize) -> Vec<MatchRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let roster = demo_players(&mut rng, players);
    let mut rows = Vec::with_capacity(players * per_player);
    for player in &roster {
        for idx in 0..per_player {
            rows.push(synthetic_match(&mut rng, player, idx));
        }
    }
    rows
}

fn synthetic_match(rng: &mut impl Rng, player: &DemoPlayer, idx: usize) -> MatchRecord {
    let opponent = TEAMS[(idx + 1) % TEAMS.len()];
    let (home, away) = if idx % 2 == 0 {
        (player.team, opponent)
    } else {
        (opponent, player.team)
    };
    MatchRecord {
        player: player.name.clone(),
        match_label: format!(
            "{home} - {away} {}:{}",
            rng.gen_range(0..4),
            rng.gen_range(0..4)
        ),
        competition: Some("Demo League".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 8, 10)
            .map(|start| start + ChronoDuration::days(7 * idx as i64)),
        position: Some(player.position.to_string()),
        stats: synthetic_stats(rng, player.position),
        ..Default::default()
    }
}

pub fn season_record_from_matches(player: &DemoPlayer, games: &[MatchRecord]) -> SeasonRecord {
    let total = |f: fn(&MatchStats) -> Option<f64>| games.iter().map(|g| or_zero(f(&g.stats))).sum::<f64>();
    let minutes = total(|s| s.minutes_played);
    let duels = total(|s| s.duels);
    let keeper = player.position.contains("GK");

    let mut record = SeasonRecord {
        player: player.name.clone(),
        team: Some(player.team.to_string()),
        position: Some(player.position.to_string()),
        age: Some(player.age as f64),
        matches_played: Some(games.len() as f64),
        minutes_played: Some(minutes),
        goals: Some(total(|s| s.goals)),
        assists: Some(total(|s| s.assists)),
        xg: Some(total(|s| s.xg)),
        xa: Some(total(|s| s.xa)),
        duels_per_90: (minutes > 0.0).then(|| duels * 90.0 / minutes),
        duels_won_pct: (duels > 0.0).then(|| total(|s| s.duels_won) / duels * 100.0),
        ..Default::default()
    };
    if keeper {
        let shots_against = total(|s| s.shots_against);
        let conceded = total(|s| s.conceded_goals);
        record.clean_sheets = Some(
            games
                .iter()
                .filter(|g| or_zero(g.stats.conceded_goals) == 0.0)
                .count() as f64,
        );
        record.save_rate_pct =
            (shots_against > 0.0).then(|| total(|s| s.saves) / shots_against * 100.0);
        record.conceded_goals = Some(conceded);
        record.prevented_goals = Some(total(|s| s.xcg) - conceded);
    }
    record
}

/// Header row in the provider's merged layout.
pub fn export_header_row() -> Vec<String> {
    let mut out = vec![
        "Match".to_string(),
        "Competition".to_string(),
        "Date".to_string(),
        "Position".to_string(),
    ];
    for (label, _, paired) in LAYOUT {
        out.push(label.to_string());
        if paired.is_some() {
            out.push(String::new());
        }
    }
    out
}

pub fn export_data_row(game: &MatchRecord) -> Vec<String> {
    let cell = |column: &str| {
        game.stats
            .get(column)
            .map(|v| v.to_string())
            .unwrap_or_default()
    };
    let mut out = vec![
        game.match_label.clone(),
        game.competition.clone().unwrap_or_default(),
        game.date.map(|d| d.to_string()).unwrap_or_default(),
        game.position.clone().unwrap_or_default(),
    ];
    for (_, attempts, paired) in LAYOUT {
        out.push(cell(*attempts));
        if let Some(paired) = paired {
            out.push(cell(*paired));
        }
    }
    out
}

/// File format for [`write_demo_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoFormat {
    #[default]
    Xlsx,
    Csv,
}

impl DemoFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DemoFormat::Xlsx => "xlsx",
            DemoFormat::Csv => CSV_EXTENSION,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Some(DemoFormat::Xlsx),
            "csv" => Some(DemoFormat::Csv),
            _ => None,
        }
    }
}

pub fn match_log_file_name(player: &str, format: DemoFormat) -> String {
    format!(
        "{FILE_PREFIX}{}.{}",
        player.replace(' ', "_"),
        format.extension()
    )
}

/// Numbers become numeric cells so the workbook reads back like a provider export.
fn workbook_row(row: Vec<String>) -> Vec<Cell> {
    row.into_iter()
        .map(|raw| match parse_number(&raw) {
            Some(value) => Cell::Number(value),
            None if raw.is_empty() => Cell::Empty,
            None => Cell::Text(raw),
        })
        .collect()
}

fn write_match_log(path: &Path, games: &[MatchRecord], format: DemoFormat) -> Result<()> {
    // newest first, as the provider exports them
    let rows = std::iter::once(export_header_row())
        .chain(games.iter().rev().map(export_data_row));
    match format {
        DemoFormat::Xlsx => {
            let cells: Vec<Vec<Cell>> = rows.map(workbook_row).collect();
            write_workbook(path, &[("Player stats", cells.as_slice())])
        }
        DemoFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)
                .with_context(|| format!("create {}", path.display()))?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

fn write_season_table(path: &Path, rows: &[SeasonRecord], format: DemoFormat) -> Result<()> {
    match format {
        DemoFormat::Xlsx => {
            let cells = season_sheet_rows(rows);
            write_workbook(path, &[("Season", cells.as_slice())])
        }
        DemoFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)
                .with_context(|| format!("create {}", path.display()))?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

/// Writes `season_overview.<ext>` and `match_logs/Player_stats_*.<ext>` under `dir`.
pub fn write_demo_dataset(
    dir: &Path,
    players: usize,
    per_player: usize,
    seed: u64,
    format: DemoFormat,
) -> Result<DemoSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let roster = demo_players(&mut rng, players);

    let match_folder = dir.join("match_logs");
    fs::create_dir_all(&match_folder)
        .with_context(|| format!("create {}", match_folder.display()))?;
    let season_file = dir.join(format!("season_overview.{}", format.extension()));

    let mut season_rows = Vec::with_capacity(roster.len());
    let mut matches = 0usize;
    for player in &roster {
        let games: Vec<MatchRecord> = (0..per_player)
            .map(|idx| synthetic_match(&mut rng, player, idx))
            .collect();
        matches += games.len();

        let path = match_folder.join(match_log_file_name(&player.name, format));
        write_match_log(&path, &games, format)?;
        season_rows.push(season_record_from_matches(player, &games));
    }

    write_season_table(&season_file, &season_rows, format)?;

    info!(
        "demo dataset written to {} ({}): {} players, {} matches",
        dir.display(),
        format.extension(),
        roster.len(),
        matches
    );

    Ok(DemoSummary {
        season_file,
        match_folder,
        players: roster.len(),
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_rows_keep_numbers_numeric() {
        let row = workbook_row(vec![
            "A - B 1:0".to_string(),
            "2024-08-10".to_string(),
            "90".to_string(),
            String::new(),
        ]);
        assert_eq!(
            row,
            vec![
                Cell::Text("A - B 1:0".into()),
                Cell::Text("2024-08-10".into()),
                Cell::Number(90.0),
                Cell::Empty,
            ]
        );
    }

    #[test]
    fn file_names_follow_format() {
        assert_eq!(
            match_log_file_name("Jack Smith", DemoFormat::Xlsx),
            "Player_stats_Jack_Smith.xlsx"
        );
        assert_eq!(DemoFormat::parse(" CSV "), Some(DemoFormat::Csv));
        assert_eq!(DemoFormat::parse("ods"), None);
    }
}
