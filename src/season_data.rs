use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DataLoadError, Result};
use crate::sheet::{self, RawRow};

pub const PLAYER_COLUMN: &str = "Player";

/// One row of the season overview export. Keyed by player name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team", default)]
    pub team: Option<String>,
    #[serde(rename = "Position", default)]
    pub position: Option<String>,
    #[serde(rename = "Age", default, deserialize_with = "csv::invalid_option")]
    pub age: Option<f64>,
    #[serde(rename = "Matches played", default, deserialize_with = "csv::invalid_option")]
    pub matches_played: Option<f64>,
    #[serde(rename = "Minutes played", default, deserialize_with = "csv::invalid_option")]
    pub minutes_played: Option<f64>,
    #[serde(rename = "Goals", default, deserialize_with = "csv::invalid_option")]
    pub goals: Option<f64>,
    #[serde(rename = "Assists", default, deserialize_with = "csv::invalid_option")]
    pub assists: Option<f64>,
    #[serde(rename = "xG", default, deserialize_with = "csv::invalid_option")]
    pub xg: Option<f64>,
    #[serde(rename = "xA", default, deserialize_with = "csv::invalid_option")]
    pub xa: Option<f64>,
    #[serde(rename = "Duels per 90", default, deserialize_with = "csv::invalid_option")]
    pub duels_per_90: Option<f64>,
    #[serde(rename = "Duels won, %", default, deserialize_with = "csv::invalid_option")]
    pub duels_won_pct: Option<f64>,
    #[serde(rename = "Clean sheets", default, deserialize_with = "csv::invalid_option")]
    pub clean_sheets: Option<f64>,
    #[serde(rename = "Save rate, %", default, deserialize_with = "csv::invalid_option")]
    pub save_rate_pct: Option<f64>,
    #[serde(rename = "Conceded goals", default, deserialize_with = "csv::invalid_option")]
    pub conceded_goals: Option<f64>,
    #[serde(rename = "Prevented goals", default, deserialize_with = "csv::invalid_option")]
    pub prevented_goals: Option<f64>,
}

impl SeasonRecord {
    pub fn is_goalkeeper(&self) -> bool {
        self.position
            .as_deref()
            .is_some_and(|pos| pos.to_uppercase().contains("GK"))
    }
}

/// Loads the season overview from an `.xlsx` workbook (first worksheet) or a `.csv` file.
pub fn load_season_table(path: &Path) -> Result<Vec<SeasonRecord>> {
    if !path.is_file() {
        return Err(DataLoadError::Missing {
            path: path.to_path_buf(),
        });
    }

    let mut rows = sheet::read_rows(path)?.into_iter();
    let header_row = rows
        .next()
        .filter(|row| !sheet::is_blank_row(row))
        .ok_or_else(|| DataLoadError::EmptyHeader {
            path: path.to_path_buf(),
        })?;
    let headers = to_record(header_row);
    if !headers.iter().any(|h| h == PLAYER_COLUMN) {
        return Err(DataLoadError::MissingColumn {
            path: path.to_path_buf(),
            column: PLAYER_COLUMN.to_string(),
        });
    }

    let mut out = Vec::new();
    for (idx, row) in rows.enumerate() {
        if sheet::is_blank_row(&row) {
            continue;
        }
        let record = to_record(row);
        match record.deserialize::<SeasonRecord>(Some(&headers)) {
            Ok(row) if row.player.trim().is_empty() => {
                debug!("season row {} has no player name, skipping", idx + 2);
            }
            Ok(mut row) => {
                row.player = row.player.trim().to_string();
                out.push(row);
            }
            Err(err) => warn!("skipping malformed season row {}: {err}", idx + 2),
        }
    }
    Ok(out)
}

fn to_record(row: RawRow) -> StringRecord {
    row.into_iter().map(Option::unwrap_or_default).collect()
}
