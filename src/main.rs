use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs};
use tracing::{error, info};

use scout_ratings::config::Config;
use scout_ratings::export::export_ratings;
use scout_ratings::logging::init_file_logging;
use scout_ratings::overview::{
    OVERVIEW_COLUMNS, PlayerProfile, format_date, format_rating, game_log_row, headline_metrics,
    latest_match_date, overview_row, player_profile, season_totals, thousands,
};
use scout_ratings::rating::{RATING_GUIDE, RatingBand};
use scout_ratings::repository::DataRepository;
use scout_ratings::state::{AppState, Tab};

struct App {
    cfg: Config,
    repo: DataRepository,
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(cfg: Config) -> Self {
        let repo = DataRepository::from_config(&cfg);
        let mut state = AppState::new();
        state.log_load_report(repo.report());
        Self {
            cfg,
            repo,
            state,
            should_quit: false,
        }
    }

    fn player_count(&self) -> usize {
        self.repo.season().len()
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                _ => self.state.help_overlay = false,
            }
            return;
        }
        let total = self.player_count();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.state.toggle_tab(),
            KeyCode::Char('1') => self.state.tab = Tab::SeasonOverview,
            KeyCode::Char('2') => self.state.open_profile(),
            KeyCode::Enter => self.state.open_profile(),
            KeyCode::Esc | KeyCode::Char('b') => self.state.tab = Tab::SeasonOverview,
            KeyCode::Char('j') | KeyCode::Down => match self.state.tab {
                Tab::SeasonOverview => self.state.select_next(total),
                Tab::PlayerProfile => {
                    let games = self.selected_games();
                    self.state.scroll_games_down(games);
                }
            },
            KeyCode::Char('k') | KeyCode::Up => match self.state.tab {
                Tab::SeasonOverview => self.state.select_prev(total),
                Tab::PlayerProfile => self.state.scroll_games_up(),
            },
            KeyCode::Char('n') | KeyCode::Right => self.state.select_next(total),
            KeyCode::Char('p') | KeyCode::Left => self.state.select_prev(total),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn selected_games(&self) -> usize {
        self.state
            .selected_player(&self.repo)
            .map(|player| self.repo.player_matches(player).len())
            .unwrap_or(0)
    }

    fn reload(&mut self) {
        self.state.push_log("[INFO] Reloading data");
        let report = self.repo.reload().clone();
        self.state.log_load_report(&report);
        let total = self.player_count();
        self.state.clamp_selection(total);
    }

    fn export(&mut self) {
        let path = self.cfg.export_path.clone();
        match export_ratings(&path, &self.repo) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} season rows, {} match rows ({} rated) to {}",
                report.season_rows,
                report.match_rows,
                report.rated_rows,
                path.display()
            )),
            Err(err) => {
                error!("export failed: {err:#}");
                self.state.push_log(format!("[WARN] Export failed: {err:#}"));
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = Config::from_env().with_args(&args);
    if let Err(err) = init_file_logging(&cfg) {
        eprintln!("warning: file logging disabled: {err:#}");
    }
    info!(
        "starting dashboard: season={} matches={}",
        cfg.season_file.display(),
        cfg.match_folder.display()
    );

    let mut app = App::new(cfg);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let titles = [Tab::SeasonOverview.title(), Tab::PlayerProfile.title()];
    let tabs = Tabs::new(titles)
        .select(app.state.tab.index())
        .block(
            Block::default()
                .title(" SCOUT RATINGS ")
                .borders(Borders::BOTTOM),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    match app.state.tab {
        Tab::SeasonOverview => render_overview(frame, chunks[1], app),
        Tab::PlayerProfile => render_profile(frame, chunks[1], app),
    }

    render_console(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text(app.state.tab))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn footer_text(tab: Tab) -> &'static str {
    match tab {
        Tab::SeasonOverview => {
            "Tab/1/2 Switch | j/k Move | Enter Profile | r Reload | e Export | ? Help | q Quit"
        }
        Tab::PlayerProfile => {
            "Tab/1/2 Switch | n/p Player | j/k Scroll games | r Reload | e Export | ? Help | q Quit"
        }
    }
}

fn empty_message(frame: &mut Frame, area: Rect, text: String) {
    let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(empty, area);
}

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let season = app.repo.season();
    if season.is_empty() {
        let reason = app
            .repo
            .report()
            .season_error
            .clone()
            .unwrap_or_else(|| "season table has no rows".to_string());
        empty_message(
            frame,
            area,
            format!(
                "No season data found at {}\n{reason}",
                app.repo.season_file().display()
            ),
        );
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let totals = season_totals(season);
    let updated = latest_match_date(app.repo.matches())
        .map(|d| format_date(Some(d)))
        .unwrap_or_else(|| "no match logs".to_string());
    let summary = format!(
        "Clients {} | Goals {} | Assists {} | Appearances {} | Minutes {}\nLast updated: {updated}",
        totals.clients,
        totals.goals,
        totals.assists,
        totals.appearances,
        thousands(totals.minutes)
    );
    frame.render_widget(Paragraph::new(summary), sections[0]);

    let header = Row::new(OVERVIEW_COLUMNS.iter().copied())
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = season.iter().map(|r| Row::new(overview_row(r)));
    let widths = [
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::TOP))
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = TableState::default();
    table_state.select(Some(app.state.selected));
    frame.render_stateful_widget(table, sections[1], &mut table_state);
}

fn render_profile(frame: &mut Frame, area: Rect, app: &App) {
    let Some(player) = app.state.selected_player(&app.repo) else {
        empty_message(frame, area, "No player selected (season table is empty)".to_string());
        return;
    };
    let profile = player_profile(&app.repo, player);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(26)])
        .split(sections[0]);

    frame.render_widget(Paragraph::new(profile_summary(&profile)), top[0]);
    frame.render_widget(Paragraph::new(rating_guide_text()), top[1]);

    if profile.games.is_empty() {
        empty_message(
            frame,
            sections[1],
            format!(
                "No match logs for {} in {}",
                profile.player,
                app.repo.match_folder().display()
            ),
        );
        return;
    }

    let layout = profile.layout;
    let header = Row::new(layout.headers().iter().copied())
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = profile.games.iter().skip(app.state.game_scroll).map(|game| {
        let cells = game_log_row(layout, game);
        let rating_col = layout.headers().iter().position(|h| *h == "Rating");
        Row::new(cells.into_iter().enumerate().map(|(idx, text)| {
            if Some(idx) == rating_col {
                Cell::from(text).style(Style::default().fg(band_color(game.band)))
            } else {
                Cell::from(text)
            }
        }))
    });
    let widths: Vec<Constraint> = layout
        .headers()
        .iter()
        .map(|h| match *h {
            "Date" => Constraint::Length(11),
            "Match" => Constraint::Min(24),
            _ => Constraint::Length(8),
        })
        .collect();
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title("Game Log").borders(Borders::TOP));
    frame.render_widget(table, sections[1]);
}

fn profile_summary(profile: &PlayerProfile<'_>) -> Text<'static> {
    let mut lines = Vec::new();
    let mut title = vec![Span::styled(
        profile.player.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(season) = profile.season {
        let team = season.team.clone().unwrap_or_default();
        let position = season.position.clone().unwrap_or_default();
        title.push(Span::raw(format!("  {team}  {position}")));
    }
    lines.push(Line::from(title));

    match profile.season {
        Some(season) => {
            let metrics = headline_metrics(season)
                .into_iter()
                .map(|m| format!("{}: {}", m.label, m.value))
                .collect::<Vec<_>>()
                .join(" | ");
            lines.push(Line::from(metrics));
        }
        None => lines.push(Line::from("No season row for this player")),
    }

    let band = profile.average_band();
    let avg = match profile.average_display() {
        Some(_) => format!(
            "Avg rating: {} ({}) over {} rated games",
            format_rating(profile.average_display()),
            band.label(),
            profile.rated_count
        ),
        None => "Avg rating: — (no games with 10+ minutes)".to_string(),
    };
    lines.push(Line::from(Span::styled(
        avg,
        Style::default().fg(band_color(band)),
    )));
    Text::from(lines)
}

fn rating_guide_text() -> Text<'static> {
    let lines: Vec<Line> = RATING_GUIDE
        .iter()
        .take(5)
        .map(|band| {
            Line::from(Span::styled(
                format!("{:>6}  {}", band.range_label(), band.label()),
                Style::default().fg(band_color(*band)),
            ))
        })
        .collect();
    Text::from(lines)
}

fn band_color(band: RatingBand) -> Color {
    match band {
        RatingBand::Excellent => Color::Green,
        RatingBand::Good => Color::LightGreen,
        RatingBand::Average => Color::Yellow,
        RatingBand::BelowAverage => Color::LightRed,
        RatingBand::Poor => Color::Red,
        RatingBand::Unrated => Color::DarkGray,
    }
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(1) as usize;
    let start = state.logs.len().saturating_sub(visible);
    let text = state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let console = Paragraph::new(text).block(Block::default().title("Log").borders(Borders::TOP));
    frame.render_widget(console, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        "Scout Ratings - Help".to_string(),
        String::new(),
        "Global:".to_string(),
        "  Tab / 1 / 2  Switch tab".to_string(),
        "  r            Reload data files".to_string(),
        "  e            Export workbook".to_string(),
        "  ?            Toggle help".to_string(),
        "  q            Quit".to_string(),
        String::new(),
        "Season Overview:".to_string(),
        "  j/k or ↑/↓   Move".to_string(),
        "  Enter        Open profile".to_string(),
        String::new(),
        "Player Profile:".to_string(),
        "  n/p or ←/→   Next/previous player".to_string(),
        "  j/k or ↑/↓   Scroll game log".to_string(),
        String::new(),
        "Rating guide:".to_string(),
    ];
    lines.extend(
        RATING_GUIDE
            .iter()
            .map(|band| format!("  {:<9} {}", band.range_label(), band.label())),
    );

    let help = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
