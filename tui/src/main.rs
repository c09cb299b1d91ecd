//! MedRush patient dashboard, interactive Ratatui TUI
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  MedRush   [1] English  [2] Telugu  [3] Hindi         Ravi Kumar    │
//!   ├─── left panel ──────────────────┬─── right panel ───────────────────┤
//!   │  Today's schedule               │  Reminder call                    │
//!   ├─────────────────────────────────┴───────────────────────────────────┤
//!   │  Event log                                                          │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! The call machine runs on the wall clock: every loop iteration advances it
//! by the time since the previous one.
//!
//! Usage: `medrush-tui [config.toml]`

use std::{
    io,
    path::Path,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use medrush_config::{AppConfig, LocaleCatalog};
use medrush_contracts::{
    call::{CallState, CallTransition},
    error::MedRushResult,
    medicine::Language,
    role::Role,
};
use medrush_core::{badge::BadgeStyle, render::RenderedSection, LoginDetails, Session};
use medrush_ref::{
    adapters::{ConsoleVoice, DummyOtpIdentity, FixtureExtractionProvider},
    mock_data::{PATIENT_NAME, PATIENT_PHONE, SAMPLE_IMAGE},
};
use medrush_store::InMemoryStore;
use medrush_verify::ExtractionSchemaVerifier;

/// Most event-log lines kept.
const LOG_LIMIT: usize = 200;

// ── App state ─────────────────────────────────────────────────────────────────

struct App {
    session: Session,
    catalog: LocaleCatalog,
    store: InMemoryStore,
    voice: ConsoleVoice,
    provider: FixtureExtractionProvider,
    verifier: ExtractionSchemaVerifier,
    log: Vec<String>,
    last_tick: Instant,
}

impl App {
    /// Log the sample patient in and return an empty dashboard.
    fn new(config: &AppConfig) -> MedRushResult<Self> {
        let store = InMemoryStore::new();
        let identity = DummyOtpIdentity::new(config.auth.dummy_otp.clone());
        let mut session = Session::new(config.call.timings());
        session.set_language(config.language);

        let challenge = session.request_otp(&identity, PATIENT_PHONE)?;
        session.login(
            &identity,
            &store,
            &challenge,
            &config.auth.dummy_otp,
            LoginDetails::new(PATIENT_NAME, Role::Patient),
        )?;

        let mut app = Self {
            session,
            catalog: LocaleCatalog::load(config)?,
            store,
            voice: ConsoleVoice::silent(config.voice.rate),
            provider: FixtureExtractionProvider::sample()?,
            verifier: ExtractionSchemaVerifier::new(),
            log: Vec::new(),
            last_tick: Instant::now(),
        };
        app.push_log(format!("Logged in as {PATIENT_NAME} ({PATIENT_PHONE})"));
        Ok(app)
    }

    fn push_log(&mut self, line: impl Into<String>) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.log.push(format!("{stamp}  {}", line.into()));
        if self.log.len() > LOG_LIMIT {
            let excess = self.log.len() - LOG_LIMIT;
            self.log.drain(..excess);
        }
    }

    fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.catalog.text(self.session.language(), key)
    }

    fn sections(&self) -> Vec<RenderedSection> {
        self.session
            .render(self.catalog.table(self.session.language()))
    }

    fn log_transition(&mut self, action: &str, transition: CallTransition) {
        let line = match transition {
            CallTransition::Moved { from, to, .. } => {
                format!("{action}: {} -> {}", from.name(), to.name())
            }
            CallTransition::Armed { .. } => format!("{action}: speech finished, hanging up soon"),
            CallTransition::Ignored { state, .. } => {
                format!("{action}: ignored while {}", state.name())
            }
        };
        self.push_log(line);
    }

    // ── Key actions ───────────────────────────────────────────────────────────

    fn select_language(&mut self, language: Language) {
        self.session.set_language(language);
        self.push_log(format!("Language: {}", language.display_name()));
    }

    fn scan(&mut self) {
        self.push_log(self.text("scanning").to_string());
        match self
            .session
            .scan(&self.provider, &self.verifier, SAMPLE_IMAGE.to_vec())
        {
            Ok(outcome) => {
                self.push_log(format!("Scan finished: {outcome:?}"));
                if let Err(e) = self.session.save_to(&self.store, Some(SAMPLE_IMAGE)) {
                    self.push_log(format!("Save failed: {e}"));
                }
            }
            Err(e) => self.push_log(e.to_string()),
        }
    }

    fn read_aloud(&mut self) {
        match self.session.read_aloud(&self.voice) {
            Some(_) => self.push_log(format!("Speaking: {}", self.session.summary())),
            None => self.push_log("Nothing to read yet"),
        }
    }

    fn test_call(&mut self) {
        let transition = self.session.test_call();
        self.log_transition("Test call", transition);
    }

    fn accept(&mut self) {
        let transition = self.session.accept_call(&self.voice);
        self.log_transition("Accept", transition);
    }

    fn decline(&mut self) {
        let transition = self.session.decline_call();
        self.log_transition("Decline", transition);
    }

    fn hang_up(&mut self) {
        let transition = self.session.hang_up();
        self.log_transition("Hang up", transition);
    }

    /// Advance the call timers by `dt`.
    fn tick(&mut self, dt: Duration) {
        for transition in self.session.advance(dt) {
            self.log_transition("Timer", transition);
        }
    }

    /// Advance the call timers by the wall time since the last tick.
    fn tick_clock(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.tick(dt);
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let full = f.area();

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(12),   // schedule + call
            Constraint::Length(8), // event log
            Constraint::Length(3), // footer
        ])
        .split(full);

    render_header(f, outer_chunks[0], app);

    let mid_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(outer_chunks[1]);

    render_schedule(f, mid_chunks[0], app);
    render_call(f, mid_chunks[1], app);
    render_log(f, outer_chunks[2], app);
    render_footer(f, outer_chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans: Vec<Span> = vec![Span::styled(
        format!("{}    ", app.text("appName")),
        title_style,
    )];

    for (i, language) in Language::ALL.iter().enumerate() {
        let style = if app.session.language() == *language {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}] {}  ", i + 1, language.display_name()),
            style,
        ));
    }

    if let Some(user) = app.session.user() {
        spans.push(Span::styled(
            format!("   {} ({})", user.name, app.text(user.role.as_str())),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn badge_color(style: BadgeStyle) -> Color {
    match style {
        BadgeStyle::Pending => Color::Yellow,
        BadgeStyle::Taken => Color::Green,
        BadgeStyle::Missed => Color::Red,
    }
}

fn render_schedule(f: &mut Frame, area: Rect, app: &App) {
    let mut items: Vec<ListItem> = Vec::new();

    if app.session.medicines().is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("Press [s] to {}", app.text("uploadPrescription")),
            Style::default().fg(Color::DarkGray),
        ))));
    } else {
        for section in app.sections() {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    section.heading.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", section.count_line()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));
            if let Some(empty) = &section.empty_line {
                items.push(ListItem::new(Line::from(Span::styled(
                    format!("    {empty}"),
                    Style::default().fg(Color::DarkGray),
                ))));
            }
            for item in &section.items {
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", item.initial),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(format!("{} ", truncate(&item.name, 18))),
                    Span::styled(
                        format!("{}  {}  ", item.detail, truncate(&item.timing, 20)),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(
                        item.badge.label.clone(),
                        Style::default()
                            .fg(badge_color(item.badge.style))
                            .add_modifier(Modifier::BOLD),
                    ),
                ])));
            }
            items.push(ListItem::new(""));
        }
    }

    let block = Block::default()
        .title(format!(" {} ", app.text("dashboard")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(List::new(items).block(block), area);
}

fn call_color(state: CallState) -> Color {
    match state {
        CallState::Idle => Color::DarkGray,
        CallState::Incoming => Color::Yellow,
        CallState::Active { .. } => Color::Green,
    }
}

fn render_call(f: &mut Frame, area: Rect, app: &App) {
    let state = app.session.call_state();
    let mut lines = vec![
        Line::from(vec![
            Span::raw("State: "),
            Span::styled(
                state.name().to_uppercase(),
                Style::default()
                    .fg(call_color(state))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("Elapsed: {}", format_elapsed(state.elapsed_secs()))),
        Line::from(format!(
            "Ring pending: {}",
            if app.session.ring_pending() { "yes" } else { "no" }
        )),
        Line::from(""),
    ];

    match state {
        CallState::Incoming => lines.push(Line::from(Span::styled(
            "Incoming call from MedRush. [a] accept  [d] decline",
            Style::default().fg(Color::Yellow),
        ))),
        CallState::Active { .. } => {
            lines.push(Line::from(Span::styled(
                app.text("summaryTitle").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(app.session.call_script().to_string()));
        }
        CallState::Idle => {
            if !app.session.summary().is_empty() {
                lines.push(Line::from(Span::styled(
                    app.text("summaryTitle").to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(app.session.summary().to_string()));
            }
        }
    }

    let block = Block::default()
        .title(format!(" {} ", app.text("callReminder")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .log
        .iter()
        .skip(app.log.len().saturating_sub(visible))
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let block = Block::default()
        .title(" Event log ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(List::new(items).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let spans = vec![
        Span::styled(" [1-3] ", key),
        Span::raw("Language  "),
        Span::styled("[s] ", key),
        Span::raw("Scan  "),
        Span::styled("[r] ", key),
        Span::raw("Read aloud  "),
        Span::styled("[t] ", key),
        Span::raw("Test call  "),
        Span::styled("[a] ", key),
        Span::raw("Accept  "),
        Span::styled("[d] ", key),
        Span::raw("Decline  "),
        Span::styled("[h] ", key),
        Span::raw("Hang up  "),
        Span::styled("[q] ", key),
        Span::raw("Quit"),
    ];

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Truncate a string to at most `max` chars, appending "…" if truncated.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// `mm:ss`.
fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_file(Path::new(&path)),
        None => Ok(AppConfig::default()),
    };
    let mut app = config
        .and_then(|config| App::new(&config))
        .map_err(io::Error::other)?;

    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    // Redraw often enough for the elapsed counter.
    const TICK_MS: u64 = 100;

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(TICK_MS))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,

                    KeyCode::Char('1') => app.select_language(Language::English),
                    KeyCode::Char('2') => app.select_language(Language::Telugu),
                    KeyCode::Char('3') => app.select_language(Language::Hindi),

                    KeyCode::Char('s') | KeyCode::Char('S') => app.scan(),
                    KeyCode::Char('r') | KeyCode::Char('R') => app.read_aloud(),
                    KeyCode::Char('t') | KeyCode::Char('T') => app.test_call(),
                    KeyCode::Char('a') | KeyCode::Char('A') => app.accept(),
                    KeyCode::Char('d') | KeyCode::Char('D') => app.decline(),
                    KeyCode::Char('h') | KeyCode::Char('H') => app.hang_up(),

                    _ => {}
                }
            }
        }

        app.tick_clock();
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
