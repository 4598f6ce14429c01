use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::match_logs::{self, MatchRecord};
use crate::position::PositionGroup;
use crate::rating::{RatingBand, classify};
use crate::season_data::{self, SeasonRecord};

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub season_rows: usize,
    /// Why the season table is empty, when it is.
    pub season_error: Option<String>,
    pub match_files_total: usize,
    pub match_files_loaded: usize,
    pub match_rows: usize,
    pub errors: Vec<String>,
    pub loaded_at: Option<DateTime<Local>>,
}

impl LoadReport {
    pub fn has_match_data(&self) -> bool {
        self.match_rows > 0
    }
}

/// A match row annotated with its derived position group and rating.
#[derive(Debug, Clone, Serialize)]
pub struct RatedMatch<'a> {
    #[serde(flatten)]
    pub record: &'a MatchRecord,
    pub group: PositionGroup,
    pub rating: Option<f64>,
    pub band: RatingBand,
}

impl<'a> RatedMatch<'a> {
    pub fn new(record: &'a MatchRecord) -> Self {
        let group = record.position_group();
        let rating = crate::rating::rate(&record.stats, group, record.minutes());
        Self {
            record,
            group,
            rating,
            band: classify(rating),
        }
    }
}

/// Holds both loaded tables. Built once at start-up; `reload` re-reads everything.
#[derive(Debug, Clone, Default)]
pub struct DataRepository {
    season_file: PathBuf,
    match_folder: PathBuf,
    season: Vec<SeasonRecord>,
    matches: Vec<MatchRecord>,
    report: LoadReport,
}

impl DataRepository {
    pub fn load(season_file: impl Into<PathBuf>, match_folder: impl Into<PathBuf>) -> Self {
        let mut repo = Self {
            season_file: season_file.into(),
            match_folder: match_folder.into(),
            ..Default::default()
        };
        repo.reload();
        repo
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::load(cfg.season_file.clone(), cfg.match_folder.clone())
    }

    /// In-memory tables with no backing files; `reload` leaves such a repository empty.
    pub fn from_tables(season: Vec<SeasonRecord>, mut matches: Vec<MatchRecord>) -> Self {
        match_logs::sort_match_rows(&mut matches);
        let report = LoadReport {
            season_rows: season.len(),
            match_rows: matches.len(),
            ..Default::default()
        };
        Self {
            season,
            matches,
            report,
            ..Default::default()
        }
    }

    pub fn reload(&mut self) -> &LoadReport {
        let mut report = LoadReport {
            loaded_at: Some(Local::now()),
            ..Default::default()
        };

        self.season = if self.season_file.as_os_str().is_empty() {
            Vec::new()
        } else {
            match season_data::load_season_table(&self.season_file) {
                Ok(rows) => rows,
                Err(err) => {
                    warn!("no season data: {err}");
                    report.season_error = Some(err.to_string());
                    Vec::new()
                }
            }
        };
        report.season_rows = self.season.len();

        if !self.match_folder.as_os_str().is_empty() {
            let load = match_logs::load_match_logs(&self.match_folder);
            report.match_files_total = load.files_total;
            report.match_files_loaded = load.files_loaded;
            report.errors = load.errors;
            self.matches = load.rows;
        } else {
            self.matches.clear();
        }
        report.match_rows = self.matches.len();

        info!(
            "data loaded: {} season rows, {} match rows ({} file errors)",
            report.season_rows,
            report.match_rows,
            report.errors.len()
        );
        self.report = report;
        &self.report
    }

    pub fn season_file(&self) -> &Path {
        &self.season_file
    }

    pub fn match_folder(&self) -> &Path {
        &self.match_folder
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn season(&self) -> &[SeasonRecord] {
        &self.season
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn players(&self) -> Vec<&str> {
        self.season.iter().map(|r| r.player.as_str()).collect()
    }

    pub fn season_record(&self, player: &str) -> Option<&SeasonRecord> {
        let key = player_key(player);
        self.season.iter().find(|r| player_key(&r.player) == key)
    }

    /// Rows whose player name equals `player` after case and whitespace folding.
    pub fn player_matches(&self, player: &str) -> Vec<&MatchRecord> {
        let key = player_key(player);
        self.matches
            .iter()
            .filter(|m| player_key(&m.player) == key)
            .collect()
    }

    pub fn rated_matches(&self, player: &str) -> Vec<RatedMatch<'_>> {
        self.player_matches(player)
            .into_iter()
            .map(RatedMatch::new)
            .collect()
    }

    pub fn rate_all(&self) -> Vec<RatedMatch<'_>> {
        self.matches.par_iter().map(RatedMatch::new).collect()
    }
}

pub fn player_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
