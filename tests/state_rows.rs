use scout_ratings::repository::{DataRepository, LoadReport};
use scout_ratings::season_data::SeasonRecord;
use scout_ratings::state::{AppState, Tab};

fn roster(names: &[&str]) -> DataRepository {
    let season = names
        .iter()
        .map(|name| SeasonRecord {
            player: name.to_string(),
            ..Default::default()
        })
        .collect();
    DataRepository::from_tables(season, Vec::new())
}

#[test]
fn selection_follows_season_rows() {
    let repo = roster(&["Jane Doe", "Sam Keeper", "Alex Brown"]);
    let mut state = AppState::new();
    assert_eq!(state.selected_player(&repo), Some("Jane Doe"));

    state.select_prev(repo.season().len());
    assert_eq!(state.selected_player(&repo), Some("Alex Brown"));

    state.open_profile();
    assert_eq!(state.tab, Tab::PlayerProfile);
    state.toggle_tab();
    assert_eq!(state.tab, Tab::SeasonOverview);
}

#[test]
fn selection_is_clamped_when_rows_shrink() {
    let mut state = AppState::new();
    state.selected = 5;
    state.game_scroll = 3;
    state.clamp_selection(2);
    assert_eq!(state.selected, 1);
    assert_eq!(state.game_scroll, 0);

    let empty = roster(&[]);
    state.clamp_selection(empty.season().len());
    assert_eq!(state.selected_player(&empty), None);
}

#[test]
fn game_scroll_stops_at_last_row() {
    let mut state = AppState::new();
    for _ in 0..10 {
        state.scroll_games_down(3);
    }
    assert_eq!(state.game_scroll, 2);
    state.scroll_games_up();
    state.scroll_games_up();
    state.scroll_games_up();
    assert_eq!(state.game_scroll, 0);
}

#[test]
fn load_report_is_summarised_in_log() {
    let report = LoadReport {
        season_error: Some("season file not found: data/season_overview.xlsx".to_string()),
        match_files_total: 2,
        match_files_loaded: 1,
        match_rows: 12,
        errors: vec!["empty header row in data/match_logs/x.csv".to_string()],
        ..Default::default()
    };
    let mut state = AppState::new();
    state.log_load_report(&report);

    let lines: Vec<&str> = state.logs.iter().map(String::as_str).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[WARN] No season data"));
    assert_eq!(lines[1], "[INFO] Match logs: 12 rows from 1/2 files");
    assert!(lines[2].contains("x.csv"));
}
