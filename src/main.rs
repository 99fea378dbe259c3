use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use steam_affinity::color::Color as AffinityColor;
use steam_affinity::config::{Config, RosterSource};
use steam_affinity::provider;
use steam_affinity::roster::RosterEntry;
use steam_affinity::selection::{CardState, GameList};
use steam_affinity::state::{self, apply_delta, AppState, RosterStatus};
use steam_affinity::steam_id::extract_steam_id;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.prompt.is_some() {
            self.on_prompt_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => self.state.activate_selected(),
            KeyCode::Char('m') => self.state.select_tab(GameList::Matching),
            KeyCode::Char('n') => self.state.select_tab(GameList::Missing),
            KeyCode::Tab => self.state.cycle_tab(),
            KeyCode::Char('/') | KeyCode::Char('s') => self.state.open_prompt(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.state.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.close_prompt(),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Enter => match extract_steam_id(buffer) {
                Some(steam_id) => {
                    self.state.close_prompt();
                    self.request_roster(&steam_id);
                }
                None => self.state.prompt_error = true,
            },
            _ => {}
        }
    }

    fn reload(&mut self) {
        match self.state.steam_id.clone() {
            Some(steam_id) => self.request_roster(&steam_id),
            None => self.state.open_prompt(),
        }
    }

    fn request_roster(&mut self, steam_id: &str) {
        let generation = self.state.begin_load(steam_id);
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Roster fetch unavailable");
            return;
        };
        let cmd = state::ProviderCommand::LoadRoster {
            steam_id: steam_id.to_string(),
            generation,
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Roster request failed");
            self.state.status = RosterStatus::Failed("provider stopped".to_string());
        } else {
            self.state
                .push_log(format!("[INFO] Roster request sent for {steam_id}"));
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let (config, warnings) = Config::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let startup_id = config.steam_id.clone();
    let source = config.source;
    provider::spawn_provider(config, tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    for msg in warnings {
        app.state.push_log(msg);
    }
    if source == RosterSource::Demo {
        app.state.push_log("[INFO] Demo roster source");
    }
    match startup_id {
        Some(steam_id) => app.request_roster(&steam_id),
        None => app.state.open_prompt(),
    }
    let res = run_app(&mut terminal, &mut app, rx);

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

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

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
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_roster(frame, chunks[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.prompt.is_some() {
        render_prompt(frame, frame.size(), &app.state);
    } else if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let who = match (&state.steam_id, &state.profile, &state.status) {
        (None, _, _) => "no Steam ID".to_string(),
        (Some(id), Some(profile), _) => format!("{} ({id})", profile.display_name),
        (Some(id), None, RosterStatus::Loading) => format!("loading {id}"),
        (Some(id), None, _) => format!("Invalid id {id}"),
    };
    let line1 = format!("  STEAM AFFINITY | {who}");
    let line2 = match state.status {
        RosterStatus::Loaded | RosterStatus::Failed(_) => {
            format!("  Friends: {}", state.roster.len())
        }
        _ => String::new(),
    };
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.prompt.is_some() {
        return "Enter Load | Esc Cancel".to_string();
    }
    "j/k/↑/↓ Move | Enter Expand | m Matching | n Missing | Tab Switch | / Steam ID | r Reload | ? Help | q Quit"
        .to_string()
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Friends").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if let Some(message) = state.empty_roster_message() {
        let style = match state.status {
            RosterStatus::Failed(_) => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::DarkGray),
        };
        frame.render_widget(Paragraph::new(message).style(style), inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_start = 0usize;
    for (idx, entry) in state.roster.iter().enumerate() {
        let selected = idx == state.selected;
        if selected {
            selected_start = lines.len();
        }
        let card = state.card_state(idx);
        lines.push(card_header_line(idx, entry, card, selected));
        if card.is_expanded() {
            lines.push(tab_line(card));
            let games = state.displayed_games(idx);
            if games.is_empty() {
                lines.push(Line::styled(
                    "      (no games)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            for game in games {
                lines.push(Line::from(vec![
                    Span::raw(format!("      {:<40} ", game.name)),
                    Span::styled(game.store_url(), Style::default().fg(Color::DarkGray)),
                ]));
            }
        }
    }

    let height = inner.height as usize;
    let scroll = scroll_offset(selected_start, lines.len(), height);
    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(paragraph, inner);
}

fn card_header_line(
    idx: usize,
    entry: &RosterEntry,
    card: CardState,
    selected: bool,
) -> Line<'static> {
    let marker = match (selected, card.is_expanded()) {
        (true, true) => "v ",
        (true, false) => "> ",
        (false, true) => "v ",
        (false, false) => "  ",
    };
    let mut name_style = if entry.placeholder {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    if selected {
        name_style = name_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }

    let mut spans = vec![
        Span::raw(format!("{marker}{:>3}. ", idx + 1)),
        Span::styled(format!("{:<24}", entry.identity.display_name), name_style),
    ];
    // Friends without library data get no affinity info.
    if entry.record.has_library() {
        spans.push(Span::raw(format!(
            "  You own {:.2}% of their games  ",
            entry.record.target_owned_percent()
        )));
        spans.push(Span::styled(
            format!("{:>8.2}", entry.record.affinity),
            Style::default()
                .fg(tui_color(entry.color))
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn tab_line(card: CardState) -> Line<'static> {
    let active = card.active_list();
    let tab = |list: GameList| {
        let style = if active == Some(list) {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!(" {} ", list.label()), style)
    };
    Line::from(vec![
        Span::raw("      "),
        tab(GameList::Matching),
        Span::raw(" "),
        tab(GameList::Missing),
    ])
}

fn tui_color(color: AffinityColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn scroll_offset(selected_start: usize, total: usize, visible: usize) -> usize {
    if total <= visible {
        return 0;
    }
    let start = selected_start.saturating_sub(visible / 3);
    start.min(total - visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_prompt(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let input = state.prompt.clone().unwrap_or_default();
    let mut lines = vec![
        Line::raw("Steam ID or profile URL:"),
        Line::raw(""),
        Line::styled(format!("> {input}_"), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if state.prompt_error {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "No numeric Steam ID found",
            Style::default().fg(Color::Red),
        ));
    }

    let prompt = Paragraph::new(lines)
        .block(Block::default().title("Load Friends").borders(Borders::ALL));
    frame.render_widget(prompt, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Steam Affinity - Help",
        "",
        "Roster:",
        "  j/k or ↑/↓   Move",
        "  Enter/Space  Expand or collapse friend",
        "  m / n        Matching / missing games",
        "  Tab          Switch game list",
        "",
        "Global:",
        "  / or s       Enter Steam ID",
        "  r            Reload",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Affinity = similarity x weight, colored against the whole roster.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
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
