use chrono::NaiveDate;

use crate::match_logs::MatchRecord;
use crate::rating::{RatingBand, classify, round1};
use crate::repository::{DataRepository, RatedMatch};
use crate::season_data::SeasonRecord;
use crate::stats::{or_zero, percentage};

pub const MATCH_LABEL_MAX: usize = 45;
const DASH: &str = "—";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeasonTotals {
    pub clients: usize,
    pub goals: i64,
    pub assists: i64,
    pub appearances: i64,
    pub minutes: i64,
}

pub fn season_totals(rows: &[SeasonRecord]) -> SeasonTotals {
    let sum = |f: fn(&SeasonRecord) -> Option<f64>| rows.iter().map(|r| or_zero(f(r))).sum::<f64>() as i64;
    SeasonTotals {
        clients: rows.len(),
        goals: sum(|r| r.goals),
        assists: sum(|r| r.assists),
        appearances: sum(|r| r.matches_played),
        minutes: sum(|r| r.minutes_played),
    }
}

pub const OVERVIEW_COLUMNS: [&str; 12] = [
    "PLAYER", "CLUB", "POS", "AGE", "APPS", "MINS", "G", "A", "xG", "xA", "DUELS/90", "DUEL%",
];

pub fn overview_row(r: &SeasonRecord) -> Vec<String> {
    vec![
        r.player.clone(),
        r.team.clone().unwrap_or_default(),
        r.position.clone().unwrap_or_default(),
        opt_int(r.age),
        opt_int(r.matches_played),
        opt_int(r.minutes_played),
        opt_int(r.goals),
        opt_int(r.assists),
        opt_fixed(r.xg, 1),
        opt_fixed(r.xa, 1),
        opt_fixed(r.duels_per_90, 1),
        opt_fixed(r.duels_won_pct, 1),
    ]
}

/// Most recent dated match across every log.
pub fn latest_match_date(rows: &[MatchRecord]) -> Option<NaiveDate> {
    rows.iter().filter_map(|r| r.date).max()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineMetric {
    pub label: &'static str,
    pub value: String,
}

fn metric(label: &'static str, value: String) -> HeadlineMetric {
    HeadlineMetric { label, value }
}

pub fn headline_metrics(r: &SeasonRecord) -> Vec<HeadlineMetric> {
    let apps = metric("Appearances", int(or_zero(r.matches_played)).to_string());
    let mins = metric("Minutes", thousands(int(or_zero(r.minutes_played))));
    if r.is_goalkeeper() {
        vec![
            apps,
            mins,
            metric("Clean Sheets", int(or_zero(r.clean_sheets)).to_string()),
            metric(
                "Save Rate",
                r.save_rate_pct
                    .map(|v| format!("{v:.1}%"))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            metric("Conceded", int(or_zero(r.conceded_goals)).to_string()),
            metric(
                "Goals Prevented",
                r.prevented_goals
                    .map(|v| format!("{v:.1}"))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
        ]
    } else {
        vec![
            apps,
            mins,
            metric("Goals", int(or_zero(r.goals)).to_string()),
            metric("Assists", int(or_zero(r.assists)).to_string()),
            metric("xG", r.xg.map(|v| format!("{v:.2}")).unwrap_or_else(|| "0".to_string())),
            metric("xA", r.xa.map(|v| format!("{v:.2}")).unwrap_or_else(|| "0".to_string())),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameLogLayout {
    Goalkeeper,
    Outfield,
}

impl GameLogLayout {
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            GameLogLayout::Goalkeeper => &[
                "Date", "Match", "Mins", "Rating", "Conceded", "xCG", "Saves", "Save%", "Passes",
                "Pass%", "Exits",
            ],
            GameLogLayout::Outfield => &[
                "Date", "Match", "Pos", "Mins", "Rating", "G", "A", "xG", "Shots", "Passes", "Pass%",
                "Duels", "Duel%", "Int",
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerProfile<'a> {
    pub player: String,
    pub season: Option<&'a SeasonRecord>,
    pub games: Vec<RatedMatch<'a>>,
    /// Unrounded mean of the non-null ratings.
    pub average: Option<f64>,
    pub rated_count: usize,
    pub layout: GameLogLayout,
}

impl PlayerProfile<'_> {
    pub fn average_display(&self) -> Option<f64> {
        self.average.map(round1)
    }

    pub fn average_band(&self) -> RatingBand {
        classify(self.average)
    }
}

pub fn player_profile<'a>(repo: &'a DataRepository, player: &str) -> PlayerProfile<'a> {
    let games = repo.rated_matches(player);
    let ratings: Vec<f64> = games.iter().filter_map(|g| g.rating).collect();
    let average = mean(&ratings);
    let layout = if games.iter().any(|g| g.record.is_goalkeeper()) {
        GameLogLayout::Goalkeeper
    } else {
        GameLogLayout::Outfield
    };
    PlayerProfile {
        player: player.to_string(),
        season: repo.season_record(player),
        rated_count: ratings.len(),
        average,
        games,
        layout,
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn game_log_row(layout: GameLogLayout, game: &RatedMatch<'_>) -> Vec<String> {
    let r = game.record;
    let s = &r.stats;
    let count = |v: Option<f64>| int(or_zero(v)).to_string();
    let date = format_date(r.date);
    let label = truncate_label(&r.match_label, MATCH_LABEL_MAX);
    let mins = int(r.minutes()).to_string();
    let rating = format_rating(game.rating);

    match layout {
        GameLogLayout::Goalkeeper => vec![
            date,
            label,
            mins,
            rating,
            count(s.conceded_goals),
            format!("{:.2}", or_zero(s.xcg)),
            count(s.saves),
            // the save count is truncated before the ratio, as displayed
            display_pct(int(or_zero(s.saves)) as f64, or_zero(s.shots_against)),
            count(s.passes),
            display_pct(or_zero(s.passes_accurate), int(or_zero(s.passes)) as f64),
            count(s.exits),
        ],
        GameLogLayout::Outfield => vec![
            date,
            label,
            r.position.clone().unwrap_or_default(),
            mins,
            rating,
            count(s.goals),
            count(s.assists),
            format!("{:.2}", or_zero(s.xg)),
            count(s.shots),
            count(s.passes),
            display_pct(or_zero(s.passes_accurate), int(or_zero(s.passes)) as f64),
            count(s.duels),
            display_pct(or_zero(s.duels_won), int(or_zero(s.duels)) as f64),
            count(s.interceptions),
        ],
    }
}

/// Whole-percent string, or a dash when there were no attempts.
pub fn display_pct(made: f64, attempts: f64) -> String {
    if attempts > 0.0 {
        format!("{:.0}%", percentage(made, attempts))
    } else {
        DASH.to_string()
    }
}

pub fn format_rating(rating: Option<f64>) -> String {
    rating
        .map(|r| format!("{r:.1}"))
        .unwrap_or_else(|| DASH.to_string())
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    label.chars().take(max_chars).collect()
}

pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn int(value: f64) -> i64 {
    value.trunc() as i64
}

fn opt_int(value: Option<f64>) -> String {
    value.map(|v| int(v).to_string()).unwrap_or_default()
}

fn opt_fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1234), "1,234");
        assert_eq!(thousands(1234567), "1,234,567");
        assert_eq!(thousands(-4500), "-4,500");
    }

    #[test]
    fn display_pct_dashes_empty_denominators() {
        assert_eq!(display_pct(0.0, 0.0), "—");
        assert_eq!(display_pct(3.0, 4.0), "75%");
    }

    #[test]
    fn totals_ignore_missing_columns() {
        let rows = vec![
            SeasonRecord {
                player: "A".into(),
                goals: Some(3.0),
                minutes_played: Some(900.0),
                ..Default::default()
            },
            SeasonRecord {
                player: "B".into(),
                goals: Some(2.0),
                ..Default::default()
            },
        ];
        let totals = season_totals(&rows);
        assert_eq!(totals.clients, 2);
        assert_eq!(totals.goals, 5);
        assert_eq!(totals.assists, 0);
        assert_eq!(totals.minutes, 900);
    }

    #[test]
    fn keeper_headlines_report_missing_rates() {
        let gk = SeasonRecord {
            player: "K".into(),
            position: Some("GK".into()),
            minutes_played: Some(2700.0),
            ..Default::default()
        };
        let metrics = headline_metrics(&gk);
        assert_eq!(metrics[1].value, "2,700");
        assert_eq!(metrics[3].label, "Save Rate");
        assert_eq!(metrics[3].value, "N/A");
    }

    #[test]
    fn labels_truncate_on_chars() {
        assert_eq!(truncate_label("Atlético - Sevilla", 4), "Atlé");
    }
}
