use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
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
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use squad_compare::config::AppConfig;
use squad_compare::filter::FilterField;
use squad_compare::routes::Request;
use squad_compare::scope::SqliteFile;
use squad_compare::state::{Action, AppState};
use squad_compare::views::{Page, ViewKind};
use squad_compare::{Browser, dataset, logging, seed};

struct App {
    state: AppState,
    browser: Browser<SqliteFile>,
    should_quit: bool,
}

impl App {
    fn new(browser: Browser<SqliteFile>) -> Self {
        Self {
            state: AppState::new(),
            browser,
            should_quit: false,
        }
    }

    fn send(&mut self, request: Request) {
        match self.browser.follow(&request) {
            Ok(page) => self.state.apply_page(page),
            Err(err) => self.state.apply_error(&err),
        }
    }

    fn act(&mut self, action: Action) {
        match self.state.request_for(action) {
            Some(request) => self.send(request),
            None => self
                .state
                .push_log(format!("[INFO] Already on {}", self.state.view.label())),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.input.is_some() {
            self.on_input_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.act(Action::Show(ViewKind::Players)),
            KeyCode::Char('2') => self.act(Action::Show(ViewKind::Teams)),
            KeyCode::Char('3') => self.act(Action::Show(ViewKind::Leagues)),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('n') => self.state.begin_input(FilterField::Nationality),
            KeyCode::Char('g') => self.state.begin_input(FilterField::Goals),
            KeyCode::Char('c') => self.state.begin_input(FilterField::Country),
            KeyCode::Char('r') => self.state.begin_input(FilterField::Ranking),
            KeyCode::Char('x') => self.act(Action::Reset),
            KeyCode::Char('d') => self.act(Action::Detailed),
            KeyCode::Char('p') => self.act(Action::GoTo(ViewKind::Players)),
            KeyCode::Char('t') => self.act(Action::GoTo(ViewKind::Teams)),
            KeyCode::Char('l') => self.act(Action::GoTo(ViewKind::Leagues)),
            KeyCode::Char('L') => self.act(Action::Login),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.cancel_input(),
            KeyCode::Enter => {
                if let Some(request) = self.state.submit_input() {
                    self.send(request);
                }
            }
            KeyCode::Backspace => self.state.input_backspace(),
            KeyCode::Char(ch) => self.state.input_char(ch),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load().context("unable to resolve sqlite path")?;
    if let Some(path) = config.log_file.as_deref() {
        logging::init_file(path, &config.log_filter)?;
    }

    // Creates the file and schema on first run.
    let mut conn = dataset::open_db(&config.db_path, config.busy_timeout)?;
    if dataset::dataset_counts(&conn)?.players == 0 {
        let counts = dataset::load_dataset(&mut conn, &seed::demo_dataset())?;
        tracing::info!(players = counts.players, "empty database seeded with demo data");
    }
    drop(conn);

    let browser = Browser::new(SqliteFile::new(&config.db_path, config.busy_timeout));
    browser.start()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(browser);
    app.state
        .push_log(format!("[INFO] DB {}", config.db_path.display()));
    app.act(Action::Show(ViewKind::Players));
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
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
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
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_page(frame, chunks[1], &app.state);
    render_console(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[3]);

    if app.state.input.is_some() {
        render_input(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let tabs = ViewKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, view)| {
            if *view == state.view {
                format!("[{} {}]", idx + 1, view.label())
            } else {
                format!(" {} {} ", idx + 1, view.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let detail = match state.page.as_ref() {
        Some(page) => format!("{} rows | branch {}", page.len(), page.branch()),
        None => "no data".to_string(),
    };
    format!("SQUAD COMPARE | {tabs} | {detail}")
}

fn footer_text(state: &AppState) -> String {
    if let Some(status) = state.status.as_deref() {
        return format!("! {status}");
    }
    "1/2/3 View | j/k Move | n/g/c/r Filter | x Reset | d Detailed | p/t/l Go to | ? Help | q Quit"
        .to_string()
}

fn columns(page: &Page) -> (Vec<&'static str>, Vec<Constraint>) {
    let extended = page.extended();
    let (titles, widths): (Vec<&'static str>, Vec<u16>) = match (page.kind(), extended) {
        (ViewKind::Players, false) => (vec!["Player", "Nationality"], vec![32, 20]),
        (ViewKind::Players, true) => (
            vec!["Player", "Nationality", "Age", "Pos", "Goals"],
            vec![32, 20, 5, 5, 7],
        ),
        (ViewKind::Teams, false) => (vec!["Team", "Country"], vec![32, 20]),
        (ViewKind::Teams, true) => (
            vec!["Team", "Country", "Manager", "Rank", "GF"],
            vec![32, 14, 24, 6, 6],
        ),
        (ViewKind::Leagues, false) => (vec!["League"], vec![32]),
        (ViewKind::Leagues, true) => (vec!["League", "First", "Last"], vec![32, 24, 24]),
    };
    (
        titles,
        widths.into_iter().map(Constraint::Length).collect(),
    )
}

fn row_cells(page: &Page, idx: usize) -> Vec<String> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    match page {
        Page::Players(p) => {
            let r = &p.rows[idx];
            let mut cells = vec![r.name.clone(), r.nationality.clone()];
            if let Some(d) = &r.detail {
                cells.push(d.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()));
                cells.push(opt(&d.position));
                cells.push(d.goals.to_string());
            }
            cells
        }
        Page::Teams(p) => {
            let r = &p.rows[idx];
            let mut cells = vec![r.name.clone(), r.country.clone()];
            if let Some(d) = &r.detail {
                cells.push(opt(&d.manager));
                cells.push(d.league_standing.to_string());
                cells.push(d.goals_for.to_string());
            }
            cells
        }
        Page::Leagues(p) => {
            let r = &p.rows[idx];
            let mut cells = vec![r.name.clone()];
            if let Some(d) = &r.detail {
                cells.push(opt(&d.first_place_team));
                cells.push(opt(&d.last_place_team));
            }
            cells
        }
    }
}

fn render_page(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(page) = state.page.as_ref() else {
        let empty = Paragraph::new("Nothing loaded yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let (titles, widths) = columns(page);
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.clone())
        .split(sections[0]);
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    for (col, title) in header_cols.iter().zip(titles) {
        frame.render_widget(Paragraph::new(title).style(header_style), *col);
    }

    let list_area = sections[1];
    if page.is_empty() {
        let empty = Paragraph::new(format!("No {} match the current filter", state.view.slug()))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, page.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths.clone())
            .split(row_area);
        for (col, text) in cols.iter().zip(row_cells(page, idx)) {
            frame.render_widget(Paragraph::new(text).style(row_style), *col);
        }
    }
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines = state
        .logs
        .iter()
        .rev()
        .take(inner_height)
        .rev()
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let console = Paragraph::new(lines)
        .block(Block::default().title("Console").borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(console, area);
}

fn render_input(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(input) = state.input.as_ref() else {
        return;
    };
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);
    let prompt = Paragraph::new(format!("{}_\n\nEnter apply | Esc cancel", input.buffer)).block(
        Block::default()
            .title(format!("Add {} filter", input.field.label()))
            .borders(Borders::ALL),
    );
    frame.render_widget(prompt, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Squad Compare - Help",
        "",
        "Views:",
        "  1 / 2 / 3    Players / Teams / Leagues",
        "  j/k or ↑/↓   Move",
        "",
        "Filters:",
        "  n            Add nationality (players)",
        "  g            Add minimum goals (players)",
        "  c            Add country (teams)",
        "  r            Add ranking (teams)",
        "  x            Reset filter for this view",
        "  d            Detailed view",
        "",
        "Cross navigation (uses this view's rows as the filter):",
        "  p / t / l    Go to players / teams / leagues",
        "",
        "  L            Login",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
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

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
