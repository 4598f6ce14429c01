use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use crate::overview::format_date;
use crate::repository::DataRepository;
use crate::season_data::SeasonRecord;
use crate::stats::MatchStats;

pub struct ExportReport {
    pub season_rows: usize,
    pub match_rows: usize,
    pub rated_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Writes the season table and the rated match log to an `.xlsx` workbook.
pub fn export_ratings(path: &Path, repo: &DataRepository) -> Result<ExportReport> {
    let season_rows = season_sheet_rows(repo.season());
    let (match_rows, rated_rows) = match_sheet_rows(repo);

    write_workbook(
        path,
        &[("Season", season_rows.as_slice()), ("MatchLog", match_rows.as_slice())],
    )?;

    let report = ExportReport {
        season_rows: season_rows.len().saturating_sub(1),
        match_rows: match_rows.len().saturating_sub(1),
        rated_rows,
    };
    info!(
        "exported {} season rows and {} match rows to {}",
        report.season_rows,
        report.match_rows,
        path.display()
    );
    Ok(report)
}

/// One worksheet per `(name, rows)` pair, in order.
pub(crate) fn write_workbook(path: &Path, sheets: &[(&str, &[Vec<Cell>])]) -> Result<()> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_rows(sheet, rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|n| Cell::Text(n.to_string())).collect()
}

pub(crate) fn season_sheet_rows(rows: &[SeasonRecord]) -> Vec<Vec<Cell>> {
    let mut out = vec![header(&[
        "Player",
        "Team",
        "Position",
        "Age",
        "Matches played",
        "Minutes played",
        "Goals",
        "Assists",
        "xG",
        "xA",
        "Duels per 90",
        "Duels won, %",
        "Clean sheets",
        "Save rate, %",
        "Conceded goals",
        "Prevented goals",
    ])];
    for r in rows {
        out.push(vec![
            r.player.clone().into(),
            r.team.clone().unwrap_or_default().into(),
            r.position.clone().unwrap_or_default().into(),
            r.age.into(),
            r.matches_played.into(),
            r.minutes_played.into(),
            r.goals.into(),
            r.assists.into(),
            r.xg.into(),
            r.xa.into(),
            r.duels_per_90.into(),
            r.duels_won_pct.into(),
            r.clean_sheets.into(),
            r.save_rate_pct.into(),
            r.conceded_goals.into(),
            r.prevented_goals.into(),
        ]);
    }
    out
}

fn match_sheet_rows(repo: &DataRepository) -> (Vec<Vec<Cell>>, usize) {
    let mut names = vec![
        "Player", "Match", "Competition", "Date", "Position", "Group", "Rating", "Band",
    ];
    names.extend(MatchStats::COLUMNS.iter().copied());
    let mut out = vec![header(&names)];

    let mut rated = 0usize;
    for game in repo.rate_all() {
        let r = game.record;
        if game.rating.is_some() {
            rated += 1;
        }
        let mut row: Vec<Cell> = vec![
            r.player.clone().into(),
            r.match_label.clone().into(),
            r.competition.clone().unwrap_or_default().into(),
            format_date(r.date).into(),
            r.position.clone().unwrap_or_default().into(),
            game.group.label().to_string().into(),
            game.rating.into(),
            game.band.label().to_string().into(),
        ];
        row.extend(MatchStats::COLUMNS.iter().map(|col| Cell::from(r.stats.get(col))));
        out.push(row);
    }
    (out, rated)
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match cell {
                Cell::Text(value) => worksheet.write_string(r, c, value.as_str()),
                Cell::Number(value) => worksheet.write_number(r, c, *value),
                Cell::Empty => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_logs::MatchRecord;

    #[test]
    fn match_sheet_has_rating_columns() {
        let mut game = MatchRecord {
            player: "A".into(),
            position: Some("CF".into()),
            ..Default::default()
        };
        game.stats.minutes_played = Some(90.0);
        let repo = DataRepository::from_tables(Vec::new(), vec![game]);
        let (rows, rated) = match_sheet_rows(&repo);
        assert_eq!(rows.len(), 2);
        assert_eq!(rated, 1);
        assert_eq!(rows[0][6], Cell::Text("Rating".into()));
        assert_eq!(rows[1][5], Cell::Text("Forward".into()));
        assert!(matches!(rows[1][6], Cell::Number(_)));
        assert_eq!(rows[0].len(), rows[1].len());
    }
}
