use std::collections::VecDeque;

use crate::repository::{DataRepository, LoadReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    SeasonOverview,
    PlayerProfile,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::SeasonOverview => "SEASON OVERVIEW",
            Tab::PlayerProfile => "PLAYER PROFILE",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::SeasonOverview => 0,
            Tab::PlayerProfile => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    /// Index into the season table's player list; shared by both tabs.
    pub selected: usize,
    pub game_scroll: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::SeasonOverview,
            selected: 0,
            game_scroll: 0,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            Tab::SeasonOverview => Tab::PlayerProfile,
            Tab::PlayerProfile => Tab::SeasonOverview,
        };
        self.game_scroll = 0;
    }

    pub fn open_profile(&mut self) {
        self.tab = Tab::PlayerProfile;
        self.game_scroll = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
        self.game_scroll = 0;
    }

    pub fn select_prev(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
        self.game_scroll = 0;
    }

    pub fn scroll_games_down(&mut self, total: usize) {
        if self.game_scroll + 1 < total {
            self.game_scroll += 1;
        }
    }

    pub fn scroll_games_up(&mut self) {
        self.game_scroll = self.game_scroll.saturating_sub(1);
    }

    /// Keeps the selection in range after the player list changed size.
    pub fn clamp_selection(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
        self.game_scroll = 0;
    }

    pub fn selected_player<'a>(&self, repo: &'a DataRepository) -> Option<&'a str> {
        repo.season().get(self.selected).map(|r| r.player.as_str())
    }

    pub fn log_load_report(&mut self, report: &LoadReport) {
        match &report.season_error {
            Some(err) => self.push_log(format!("[WARN] No season data: {err}")),
            None => self.push_log(format!("[INFO] Season table: {} clients", report.season_rows)),
        }
        if report.match_files_total == 0 {
            self.push_log("[WARN] No match logs found");
        } else {
            self.push_log(format!(
                "[INFO] Match logs: {} rows from {}/{} files",
                report.match_rows, report.match_files_loaded, report.match_files_total
            ));
        }
        for err in report.errors.iter().take(8) {
            self.push_log(format!("[WARN] {err}"));
        }
    }
}
