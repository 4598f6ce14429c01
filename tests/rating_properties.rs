use scout_ratings::position::PositionGroup;
use scout_ratings::rating::{
    MAX_RATING, MIN_RATING, NEUTRAL_RATING, RatingBand, breakdown, classify, per90,
    rate, regress_low_minutes,
};
use scout_ratings::repository::DataRepository;
use scout_ratings::stats::MatchStats;
use scout_ratings::synthetic::synthetic_match_rows;

const GROUPS: [PositionGroup; 6] = [
    PositionGroup::Goalkeeper,
    PositionGroup::CenterBack,
    PositionGroup::Fullback,
    PositionGroup::Midfielder,
    PositionGroup::Forward,
    PositionGroup::Outfield,
];

#[test]
fn under_ten_minutes_is_unrated() {
    let stats = MatchStats {
        goals: Some(2.0),
        ..Default::default()
    };
    for group in GROUPS {
        assert_eq!(rate(&stats, group, 9.9), None, "{group:?}");
        assert_eq!(rate(&stats, group, 0.0), None, "{group:?}");
        assert!(rate(&stats, group, 10.0).is_some(), "{group:?}");
    }
}

#[test]
fn synthetic_ratings_stay_in_bounds() {
    let repo = DataRepository::from_tables(Vec::new(), synthetic_match_rows(3, 40, 25));
    let rated = repo.rate_all();
    assert_eq!(rated.len(), 1000);
    for game in &rated {
        match game.rating {
            Some(r) => {
                assert!((MIN_RATING..=MAX_RATING).contains(&r), "{r}");
                assert_eq!((r * 10.0).round() / 10.0, r);
                assert!(game.record.minutes() >= 10.0);
            }
            None => assert!(game.record.minutes() < 10.0),
        }
        assert_eq!(game.band, classify(game.rating));
    }
}

#[test]
fn counting_stats_scale_per_ninety() {
    // One interception in 45 minutes counts like two over a full match.
    let half = MatchStats {
        interceptions: Some(1.0),
        ..Default::default()
    };
    let full = MatchStats {
        interceptions: Some(2.0),
        ..Default::default()
    };
    let a = breakdown(&half, PositionGroup::CenterBack, 45.0).unwrap();
    let b = breakdown(&full, PositionGroup::CenterBack, 90.0).unwrap();
    assert!((a.raw - b.raw).abs() < 1e-9);
    assert_eq!(a.rating, b.rating);
}

#[test]
fn fixed_count_in_half_the_minutes_doubles() {
    assert_eq!(per90(2.0, 45.0), 2.0 * per90(2.0, 90.0));
    assert_eq!(per90(2.0, 90.0), 2.0);
    assert_eq!(per90(3.0, 0.0), 0.0);
}

#[test]
fn exact_half_ratings_round_to_even() {
    // 4.0 base + 2.0 untested saves + 0.75 distribution prior + 0.5 command = 7.25
    let stats = MatchStats {
        exits: Some(2.0),
        ..Default::default()
    };
    assert_eq!(rate(&stats, PositionGroup::Goalkeeper, 90.0), Some(7.2));
}

#[test]
fn short_appearances_regress_toward_neutral() {
    assert_eq!(regress_low_minutes(9.0, 45.0), 9.0);
    assert_eq!(regress_low_minutes(9.0, 90.0), 9.0);
    assert!((regress_low_minutes(9.0, 22.5) - 7.0).abs() < 1e-9);
    assert!((regress_low_minutes(1.0, 22.5) - 3.0).abs() < 1e-9);

    // A strong cameo lands between its raw score and the neutral rating.
    let stats = MatchStats {
        goals: Some(1.0),
        ..Default::default()
    };
    let b = breakdown(&stats, PositionGroup::Forward, 20.0).unwrap();
    assert!(b.clamped > NEUTRAL_RATING);
    assert!(b.regressed < b.clamped);
    assert!(b.regressed > NEUTRAL_RATING);
}

#[test]
fn busy_keeper_scores_exact_total() {
    // saves 80% -> 3.2, prevented (1.5 - 1) * 1.5 -> 0.75, passing 75% -> 1.125
    let stats = MatchStats {
        shots_against: Some(5.0),
        saves: Some(4.0),
        conceded_goals: Some(1.0),
        xcg: Some(1.5),
        passes: Some(20.0),
        passes_accurate: Some(15.0),
        yellow_cards: Some(1.0),
        ..Default::default()
    };
    let b = breakdown(&stats, PositionGroup::Goalkeeper, 90.0).unwrap();
    assert!((b.raw - 8.575).abs() < 1e-9);
    assert_eq!(b.rating, 8.6);
}

#[test]
fn ratings_clamp_at_both_ends() {
    let disaster = MatchStats {
        red_cards: Some(2.0),
        yellow_cards: Some(2.0),
        losses: Some(30.0),
        duels: Some(10.0),
        duels_won: Some(0.0),
        aerial_duels: Some(5.0),
        aerial_duels_won: Some(0.0),
        passes: Some(10.0),
        passes_accurate: Some(0.0),
        ..Default::default()
    };
    assert_eq!(rate(&disaster, PositionGroup::CenterBack, 90.0), Some(1.0));

    let hat_trick = MatchStats {
        goals: Some(3.0),
        assists: Some(2.0),
        ..Default::default()
    };
    assert_eq!(rate(&hat_trick, PositionGroup::Midfielder, 90.0), Some(10.0));
}

#[test]
fn band_boundaries_are_inclusive_below() {
    assert_eq!(classify(Some(8.0)), RatingBand::Excellent);
    assert_eq!(classify(Some(7.99)), RatingBand::Good);
    assert_eq!(classify(Some(6.5)), RatingBand::Good);
    assert_eq!(classify(Some(6.49)), RatingBand::Average);
    assert_eq!(classify(Some(5.0)), RatingBand::Average);
    assert_eq!(classify(Some(4.99)), RatingBand::BelowAverage);
    assert_eq!(classify(Some(3.5)), RatingBand::BelowAverage);
    assert_eq!(classify(Some(3.49)), RatingBand::Poor);
    assert_eq!(classify(Some(1.0)), RatingBand::Poor);
    assert_eq!(classify(None), RatingBand::Unrated);
}
