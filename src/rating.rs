use serde::Serialize;

use crate::position::PositionGroup;
use crate::stats::{MatchStats, or_zero, percentage, save_percentage};

pub const MIN_RATED_MINUTES: f64 = 10.0;
pub const FULL_SAMPLE_MINUTES: f64 = 45.0;
pub const NEUTRAL_RATING: f64 = 5.0;
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 10.0;

const YELLOW_CARD_PENALTY: f64 = 0.5;
const RED_CARD_PENALTY: f64 = 2.0;
const UNTESTED_KEEPER_SAVE_SCORE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScore {
    pub name: &'static str,
    pub value: f64,
}

/// Every intermediate of a rating, mostly for the profile view and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBreakdown {
    pub group: PositionGroup,
    pub minutes: f64,
    pub base: f64,
    pub components: Vec<SubScore>,
    pub discipline: f64,
    pub raw: f64,
    pub clamped: f64,
    pub regressed: f64,
    pub rating: f64,
}

pub fn per90_factor(minutes: f64) -> f64 {
    90.0 / minutes.max(1.0)
}

pub fn per90(count: f64, minutes: f64) -> f64 {
    count * per90_factor(minutes)
}

/// 1.0–10.0 rating for one match row, `None` under ten minutes.
pub fn rate(stats: &MatchStats, group: PositionGroup, minutes: f64) -> Option<f64> {
    breakdown(stats, group, minutes).map(|b| b.rating)
}

pub fn breakdown(stats: &MatchStats, group: PositionGroup, minutes: f64) -> Option<RatingBreakdown> {
    // NaN minutes must not slip past the threshold.
    if !(minutes >= MIN_RATED_MINUTES) {
        return None;
    }

    let n = Normalized::from_stats(stats, minutes);
    let (base, components) = match group {
        PositionGroup::Goalkeeper => goalkeeper(&n),
        PositionGroup::CenterBack => center_back(&n),
        PositionGroup::Fullback => fullback(&n),
        PositionGroup::Midfielder => midfielder(&n),
        PositionGroup::Forward => forward(&n),
        PositionGroup::Outfield => outfield(&n),
    };

    let discipline = n.yellow_cards * YELLOW_CARD_PENALTY + n.red_cards * RED_CARD_PENALTY;
    let raw = base + components.iter().map(|c| c.value).sum::<f64>() - discipline;
    let clamped = raw.clamp(MIN_RATING, MAX_RATING);
    let regressed = regress_low_minutes(clamped, minutes);

    Some(RatingBreakdown {
        group,
        minutes,
        base,
        components,
        discipline,
        raw,
        clamped,
        regressed,
        rating: round1(regressed),
    })
}

/// Blends toward the neutral rating below 45 minutes, proportionally to time played.
pub fn regress_low_minutes(score: f64, minutes: f64) -> f64 {
    if minutes >= FULL_SAMPLE_MINUTES {
        return score;
    }
    let weight = minutes / FULL_SAMPLE_MINUTES;
    score * weight + NEUTRAL_RATING * (1.0 - weight)
}

/// One decimal, exact halves to even (`7.25` -> `7.2`).
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}")
        .parse::<f64>()
        .unwrap_or_else(|_| (value * 10.0).round() / 10.0)
}

struct Normalized {
    factor: f64,
    goals: f64,
    assists: f64,
    xg: f64,
    xa: f64,
    shot_assists: f64,
    interceptions: f64,
    recoveries: f64,
    clearances: f64,
    progressive_runs: f64,
    touches_in_box: f64,
    losses: f64,
    exits: f64,
    crosses: f64,
    shots: f64,
    dribbles_successful: f64,
    duel_pct: f64,
    pass_pct: f64,
    aerial_pct: f64,
    cross_pct: f64,
    dribble_pct: f64,
    shot_pct: f64,
    action_pct: f64,
    save_pct: f64,
    shots_against: f64,
    conceded: f64,
    xcg: f64,
    yellow_cards: f64,
    red_cards: f64,
}

impl Normalized {
    fn from_stats(s: &MatchStats, minutes: f64) -> Self {
        let factor = per90_factor(minutes);
        let p90 = |v: Option<f64>| per90(or_zero(v), minutes);
        let pct = |made: Option<f64>, att: Option<f64>| percentage(or_zero(made), or_zero(att));

        Self {
            factor,
            goals: p90(s.goals),
            assists: p90(s.assists),
            xg: p90(s.xg),
            xa: p90(s.xa),
            shot_assists: p90(s.shot_assists),
            interceptions: p90(s.interceptions),
            recoveries: p90(s.recoveries),
            clearances: p90(s.clearances),
            progressive_runs: p90(s.progressive_runs),
            touches_in_box: p90(s.touches_in_box),
            losses: p90(s.losses),
            exits: p90(s.exits),
            // Raw counts; composites scale them by `factor` themselves.
            crosses: or_zero(s.crosses),
            shots: or_zero(s.shots),
            dribbles_successful: or_zero(s.dribbles_successful),
            duel_pct: pct(s.duels_won, s.duels),
            pass_pct: pct(s.passes_accurate, s.passes),
            aerial_pct: pct(s.aerial_duels_won, s.aerial_duels),
            cross_pct: pct(s.crosses_accurate, s.crosses),
            dribble_pct: pct(s.dribbles_successful, s.dribbles),
            shot_pct: pct(s.shots_on_target, s.shots),
            action_pct: pct(s.total_actions_successful, s.total_actions),
            save_pct: save_percentage(or_zero(s.saves), or_zero(s.shots_against)),
            shots_against: or_zero(s.shots_against),
            conceded: or_zero(s.conceded_goals),
            xcg: or_zero(s.xcg),
            yellow_cards: or_zero(s.yellow_cards),
            red_cards: or_zero(s.red_cards),
        }
    }
}

fn capped(name: &'static str, raw: f64, cap: f64) -> SubScore {
    SubScore {
        name,
        value: raw.min(cap),
    }
}

fn uncapped(name: &'static str, value: f64) -> SubScore {
    SubScore { name, value }
}

fn penalty(name: &'static str, raw: f64, cap: f64) -> SubScore {
    SubScore {
        name,
        value: -raw.min(cap),
    }
}

fn goalkeeper(n: &Normalized) -> (f64, Vec<SubScore>) {
    let save = if n.shots_against > 0.0 {
        capped("saves", n.save_pct / 100.0 * 4.0, 4.0)
    } else {
        uncapped("saves", UNTESTED_KEEPER_SAVE_SCORE)
    };
    let prevented = (n.xcg - n.conceded) * 1.5;
    (
        4.0,
        vec![
            save,
            uncapped("goals prevented", prevented.clamp(-2.0, 2.0)),
            capped("distribution", n.pass_pct / 100.0 * 1.5, 1.5),
            capped("command", n.exits * 0.3, 0.5),
        ],
    )
}

fn center_back(n: &Normalized) -> (f64, Vec<SubScore>) {
    (
        3.5,
        vec![
            capped("duels", n.duel_pct / 100.0 * 2.5, 2.5),
            capped("aerials", n.aerial_pct / 100.0 * 1.5, 1.5),
            capped(
                "defensive actions",
                (n.interceptions + n.clearances + n.recoveries) * 0.2,
                1.5,
            ),
            capped("passing", n.pass_pct / 100.0 * 1.5, 1.5),
            penalty("losses", n.losses * 0.15, 1.0),
            uncapped("goals", n.goals * 3.0),
            uncapped("assists", n.assists * 2.0),
        ],
    )
}

fn fullback(n: &Normalized) -> (f64, Vec<SubScore>) {
    (
        3.5,
        vec![
            capped("duels", n.duel_pct / 100.0 * 1.5, 1.5),
            capped(
                "crossing",
                n.cross_pct / 100.0 + n.crosses * n.factor * 0.2,
                1.5,
            ),
            capped("progressive runs", n.progressive_runs * 0.4, 1.5),
            capped("passing", n.pass_pct / 100.0 * 1.5, 1.5),
            capped("defensive actions", (n.interceptions + n.recoveries) * 0.2, 1.0),
            penalty("losses", n.losses * 0.1, 0.8),
            uncapped("goals", n.goals * 3.0),
            uncapped("assists", n.assists * 2.5),
        ],
    )
}

fn midfielder(n: &Normalized) -> (f64, Vec<SubScore>) {
    (
        3.5,
        vec![
            capped("passing", n.pass_pct / 100.0 * 2.0, 2.0),
            capped("creation", (n.shot_assists + n.xa) * 1.5, 2.0),
            capped("duels", n.duel_pct / 100.0 * 1.5, 1.5),
            capped("progressive runs", n.progressive_runs * 0.3, 1.0),
            capped("recoveries", n.recoveries * 0.15, 0.8),
            penalty("losses", n.losses * 0.1, 0.8),
            uncapped("goals", n.goals * 2.5),
            uncapped("assists", n.assists * 2.5),
        ],
    )
}

fn forward(n: &Normalized) -> (f64, Vec<SubScore>) {
    (
        3.0,
        vec![
            capped("goals", n.goals * 3.0, 3.0),
            capped("expected goals", n.xg * 2.0, 2.0),
            capped("shooting", n.shot_pct / 100.0 + n.shots * n.factor * 0.15, 1.5),
            capped(
                "dribbling",
                n.dribble_pct / 100.0 * 0.8 + n.dribbles_successful * n.factor * 0.2,
                1.0,
            ),
            capped(
                "creation",
                n.assists * 2.5 + n.xa * 1.5 + n.shot_assists * 0.5,
                2.0,
            ),
            capped("box presence", n.touches_in_box * 0.2, 0.8),
            penalty("losses", n.losses * 0.05, 0.5),
        ],
    )
}

fn outfield(n: &Normalized) -> (f64, Vec<SubScore>) {
    (
        3.5,
        vec![
            capped("action success", n.action_pct / 100.0 * 3.0, 3.0),
            capped("duels", n.duel_pct / 100.0 * 2.0, 2.0),
            uncapped("goals", n.goals * 2.5),
            uncapped("assists", n.assists * 2.0),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RatingBand {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
    Unrated,
}

impl RatingBand {
    pub fn label(self) -> &'static str {
        match self {
            RatingBand::Excellent => "Excellent",
            RatingBand::Good => "Good",
            RatingBand::Average => "Average",
            RatingBand::BelowAverage => "Below Avg",
            RatingBand::Poor => "Poor",
            RatingBand::Unrated => "N/A",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            RatingBand::Excellent => "8-10",
            RatingBand::Good => "6.5-8",
            RatingBand::Average => "5-6.5",
            RatingBand::BelowAverage => "3.5-5",
            RatingBand::Poor => "1-3.5",
            RatingBand::Unrated => "<10 mins",
        }
    }
}

pub const RATING_GUIDE: [RatingBand; 6] = [
    RatingBand::Excellent,
    RatingBand::Good,
    RatingBand::Average,
    RatingBand::BelowAverage,
    RatingBand::Poor,
    RatingBand::Unrated,
];

pub fn classify(rating: Option<f64>) -> RatingBand {
    let Some(r) = rating else {
        return RatingBand::Unrated;
    };
    if r >= 8.0 {
        RatingBand::Excellent
    } else if r >= 6.5 {
        RatingBand::Good
    } else if r >= 5.0 {
        RatingBand::Average
    } else if r >= 3.5 {
        RatingBand::BelowAverage
    } else {
        RatingBand::Poor
    }
}
