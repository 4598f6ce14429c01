use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DataLoadError, Result};
use crate::headers::normalize_header_row;
use crate::position::PositionGroup;
use crate::rating;
use crate::sheet::{self, RawRow};
use crate::stats::{MatchStats, or_zero, parse_date, parse_number};

pub const FILE_PREFIX: &str = "Player_stats_";
/// Office writes `~$name.xlsx` lock files beside open workbooks.
const LOCK_FILE_PREFIX: &str = "~$";

/// Columns kept as text; everything else is coerced to a number.
const TEXT_COLUMNS: [&str; 5] = ["Player", "Match", "Competition", "Date", "Position"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchRecord {
    pub player: String,
    pub match_label: String,
    pub competition: Option<String>,
    pub date: Option<NaiveDate>,
    pub position: Option<String>,
    pub stats: MatchStats,
    /// Numeric columns outside the known schema, e.g. `Duels_part2`.
    pub extra: BTreeMap<String, Option<f64>>,
}

impl MatchRecord {
    pub fn minutes(&self) -> f64 {
        or_zero(self.stats.minutes_played)
    }

    pub fn position_group(&self) -> PositionGroup {
        PositionGroup::from_position(self.position.as_deref())
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position
            .as_deref()
            .is_some_and(|pos| pos.contains("GK"))
    }

    pub fn rating(&self) -> Option<f64> {
        rating::rate(&self.stats, self.position_group(), self.minutes())
    }

    /// Looks a numeric column up by its reconstructed header name.
    pub fn value(&self, column: &str) -> Option<f64> {
        self.stats
            .get(column)
            .or_else(|| self.extra.get(column).copied().flatten())
    }

    fn set_cell(&mut self, column: &str, raw: Option<&str>) {
        let text = raw.map(str::trim).filter(|t| !t.is_empty());
        if TEXT_COLUMNS.contains(&column) {
            match column {
                "Match" => self.match_label = text.unwrap_or_default().to_string(),
                "Competition" => self.competition = text.map(str::to_string),
                "Date" => self.date = text.and_then(parse_date),
                "Position" => self.position = text.map(str::to_string),
                // the file name is authoritative for the player
                _ => {}
            }
            return;
        }
        let value = text.and_then(parse_number);
        match self.stats.slot_mut(column) {
            Some(slot) => *slot = value,
            None => {
                self.extra.insert(column.to_string(), value);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchLogLoad {
    pub rows: Vec<MatchRecord>,
    pub files_total: usize,
    pub files_loaded: usize,
    pub errors: Vec<String>,
}

/// `Player_stats_Jane__Doe.csv` -> `Jane Doe`.
pub fn player_name_from_file(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let stripped = stem.strip_prefix(FILE_PREFIX).unwrap_or(stem);
    let name = stripped
        .replace("__", " ")
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() { None } else { Some(name) }
}

pub fn list_match_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| sheet::is_supported(path))
        .filter(|path| {
            !path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(LOCK_FILE_PREFIX))
        })
        .collect();
    files.sort();
    files
}

/// Loads every match-log file in `dir`. Files that fail are reported, not fatal.
pub fn load_match_logs(dir: &Path) -> MatchLogLoad {
    if !dir.is_dir() {
        warn!("match log folder {} not found", dir.display());
        return MatchLogLoad::default();
    }

    let files = list_match_files(dir);
    let results: Vec<(PathBuf, Result<Vec<MatchRecord>>)> = files
        .par_iter()
        .map(|path| (path.clone(), load_match_file(path)))
        .collect();

    let mut load = MatchLogLoad {
        files_total: files.len(),
        ..Default::default()
    };
    for (path, result) in results {
        match result {
            Ok(rows) => {
                debug!("{}: {} match rows", path.display(), rows.len());
                load.files_loaded += 1;
                load.rows.extend(rows);
            }
            Err(err) => {
                warn!(file = %err.path().display(), "skipping match log: {err}");
                load.errors.push(err.to_string());
            }
        }
    }

    sort_match_rows(&mut load.rows);
    info!(
        "loaded {} match rows from {}/{} files",
        load.rows.len(),
        load.files_loaded,
        load.files_total
    );
    load
}

pub fn load_match_file(path: &Path) -> Result<Vec<MatchRecord>> {
    let player = player_name_from_file(path).unwrap_or_default();
    let rows = sheet::read_rows(path)?;
    records_from_rows(rows, &player).ok_or_else(|| DataLoadError::EmptyHeader {
        path: path.to_path_buf(),
    })
}

/// Parses one merged-header CSV export. `Ok(None)` when there is no header row at all.
pub fn parse_match_log<R: Read>(
    rdr: R,
    player: &str,
) -> std::result::Result<Option<Vec<MatchRecord>>, csv::Error> {
    Ok(records_from_rows(sheet::read_csv_rows(rdr)?, player))
}

/// Repairs the header row and turns the remaining rows into records; blank rows are dropped.
pub fn records_from_rows(rows: Vec<RawRow>, player: &str) -> Option<Vec<MatchRecord>> {
    let mut rows = rows.into_iter();
    let header_row = rows.next()?;
    let cells: Vec<Option<&str>> = header_row.iter().map(|c| c.as_deref()).collect();
    let headers = normalize_header_row(&cells);

    let records = rows
        .filter(|row| !sheet::is_blank_row(row))
        .map(|row| {
            let mut record = MatchRecord {
                player: player.to_string(),
                ..Default::default()
            };
            for (column, cell) in headers.iter().zip(row.iter()) {
                record.set_cell(column, cell.as_deref());
            }
            record
        })
        .collect();
    Some(records)
}

/// Player ascending, then most recent match first; undated rows go last.
pub fn sort_match_rows(rows: &mut [MatchRecord]) {
    rows.sort_by(|a, b| {
        a.player
            .cmp(&b.player)
            .then_with(|| match (a.date, b.date) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Match,Competition,Date,Position,Minutes played,Goals,Duels / won,,Passes / accurate,,Duels,Odd
Alpha - Beta 2:1,League One,2024-03-02,LCMF,90,1,10,6,40,32,3,x
Gamma - Alpha 0:0,League One,not a date,RCMF,abc,0,0,0,20,15,,
,,,,,,,,,,,
";

    #[test]
    fn parses_merged_headers_and_coerces_cells() {
        let rows = parse_match_log(EXPORT.as_bytes(), "Jane Doe").unwrap().unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.player, "Jane Doe");
        assert_eq!(first.match_label, "Alpha - Beta 2:1");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(first.stats.duels, Some(10.0));
        assert_eq!(first.stats.duels_won, Some(6.0));
        assert_eq!(first.stats.passes_accurate, Some(32.0));
        // the second "Duels" header was de-duplicated
        assert_eq!(first.value("Duels_1"), Some(3.0));
        assert_eq!(first.extra.get("Odd"), Some(&None));

        let second = &rows[1];
        assert_eq!(second.date, None);
        assert_eq!(second.stats.minutes_played, None);
        assert_eq!(second.minutes(), 0.0);
        assert_eq!(second.rating(), None);
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let rows = parse_match_log("Match,Date\n".as_bytes(), "X").unwrap().unwrap();
        assert!(rows.is_empty());
        assert!(parse_match_log("".as_bytes(), "X").unwrap().is_none());
    }

    #[test]
    fn player_name_from_filename() {
        assert_eq!(
            player_name_from_file(Path::new("logs/Player_stats_Jane__Doe.csv")).as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(
            player_name_from_file(Path::new("Player_stats_Luis_de_la_Fuente.csv")).as_deref(),
            Some("Luis de la Fuente")
        );
        assert_eq!(player_name_from_file(Path::new("Player_stats_.csv")), None);
    }

    #[test]
    fn sort_orders_player_then_recent_first() {
        let row = |player: &str, date: Option<(i32, u32, u32)>| MatchRecord {
            player: player.to_string(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..Default::default()
        };
        let mut rows = vec![
            row("B", Some((2024, 1, 1))),
            row("A", None),
            row("A", Some((2024, 1, 1))),
            row("A", Some((2024, 2, 1))),
        ];
        sort_match_rows(&mut rows);
        let order: Vec<(String, Option<NaiveDate>)> =
            rows.iter().map(|r| (r.player.clone(), r.date)).collect();
        assert_eq!(order[0].0, "A");
        assert_eq!(order[0].1, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(order[1].1, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(order[2].1, None);
        assert_eq!(order[3].0, "B");
    }
}
