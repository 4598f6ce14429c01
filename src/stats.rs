use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Neutral prior for a paired rate with no attempts.
pub const RATE_PRIOR: f64 = 50.0;
/// Untested keepers are assumed to save at a typical rate.
pub const SAVE_RATE_PRIOR: f64 = 70.0;

macro_rules! match_stats {
    ($($field:ident => $column:literal),+ $(,)?) => {
        /// Numeric columns of a match-log row that the rating engine and views know about.
        /// `None` means the column was absent or its cell did not parse.
        #[derive(Debug, Clone, Default, PartialEq, Serialize)]
        pub struct MatchStats {
            $(pub $field: Option<f64>,)+
        }

        impl MatchStats {
            pub const COLUMNS: &'static [&'static str] = &[$($column),+];

            pub fn slot_mut(&mut self, column: &str) -> Option<&mut Option<f64>> {
                match column {
                    $($column => Some(&mut self.$field),)+
                    _ => None,
                }
            }

            pub fn get(&self, column: &str) -> Option<f64> {
                match column {
                    $($column => self.$field,)+
                    _ => None,
                }
            }
        }
    };
}

match_stats! {
    minutes_played => "Minutes played",
    goals => "Goals",
    assists => "Assists",
    xg => "xG",
    xa => "xA",
    shot_assists => "Shot assists",
    total_actions => "Total actions",
    total_actions_successful => "Total actions_successful",
    shots => "Shots",
    shots_on_target => "Shots_on target",
    passes => "Passes",
    passes_accurate => "Passes_accurate",
    crosses => "Crosses",
    crosses_accurate => "Crosses_accurate",
    dribbles => "Dribbles",
    dribbles_successful => "Dribbles_successful",
    duels => "Duels",
    duels_won => "Duels_won",
    aerial_duels => "Aerial duels",
    aerial_duels_won => "Aerial duels_won",
    defensive_duels => "Defensive duels",
    defensive_duels_won => "Defensive duels_won",
    losses => "Losses",
    recoveries => "Recoveries",
    interceptions => "Interceptions",
    clearances => "Clearances",
    progressive_runs => "Progressive runs",
    touches_in_box => "Touches in penalty area",
    fouls => "Fouls",
    yellow_cards => "Yellow cards",
    red_cards => "Red cards",
    saves => "Saves",
    shots_against => "Shots against",
    conceded_goals => "Conceded goals",
    xcg => "xCG",
    exits => "Exits",
}

/// Missing or non-finite values count as zero.
pub fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// `successful / attempts * 100`, or `prior` when there were no attempts.
pub fn rate_or(successful: f64, attempts: f64, prior: f64) -> f64 {
    if attempts > 0.0 {
        successful / attempts * 100.0
    } else {
        prior
    }
}

pub fn percentage(successful: f64, attempts: f64) -> f64 {
    rate_or(successful, attempts, RATE_PRIOR)
}

pub fn save_percentage(saves: f64, shots_against: f64) -> f64 {
    rate_or(saves, shots_against, SAVE_RATE_PRIOR)
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%d %b %Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominators_use_priors() {
        assert_eq!(percentage(0.0, 0.0), 50.0);
        assert_eq!(save_percentage(0.0, 0.0), 70.0);
        assert_eq!(percentage(3.0, 4.0), 75.0);
    }

    #[test]
    fn rates_are_not_clamped_above_100() {
        assert_eq!(percentage(6.0, 4.0), 150.0);
    }

    #[test]
    fn parse_number_rejects_junk() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn parse_date_accepts_export_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 2);
        assert_eq!(parse_date("2024-03-02"), expected);
        assert_eq!(parse_date("02/03/2024"), expected);
        assert_eq!(parse_date("2024-03-02 00:00:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn column_slots_cover_paired_stats() {
        let mut stats = MatchStats::default();
        *stats.slot_mut("Duels_won").unwrap() = Some(4.0);
        assert_eq!(stats.duels_won, Some(4.0));
        assert_eq!(stats.get("Duels_won"), Some(4.0));
        assert!(stats.slot_mut("Duels_part2").is_none());
        assert_eq!(or_zero(stats.duels), 0.0);
    }
}
