mod app;
mod config;
mod engine;
mod event;
mod generator;
mod session;
mod settings;
mod store;
mod subject;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use app::{App, SettingsOverride};
use config::Config;
use engine::stats::SkillKey;
use event::{AppEvent, EventHandler};
use generator::arithmetic::MathSkill;
use session::machine::Screen;
use session::mode::Mode;
use subject::Subject;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_area::QuestionArea;
use ui::components::stats_table::{SkillRow, StatsTable};
use ui::components::summary::Summary;
use ui::layout::{AppLayout, pack_hint_lines};

#[derive(Parser)]
#[command(name = "mathdr", version, about = "Terminal arithmetic drill with adaptive leveling")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Questions per session (5-50)")]
    questions: Option<u32>,

    #[arg(long, help = "Seconds per question (5-60)")]
    time_limit: Option<u32>,

    #[arg(short, long, value_parser = parse_mode, help = "Start straight into a drill: add, sub, mul, div or mixed")]
    mode: Option<Mode<MathSkill>>,

    #[arg(long, help = "Directory for saved progress and the log file")]
    data_dir: Option<PathBuf>,
}

fn parse_mode(value: &str) -> Result<Mode<MathSkill>, String> {
    Mode::from_key(value).ok_or_else(|| {
        let keys: Vec<&str> = MathSkill::all().iter().map(|s| s.key()).collect();
        format!("expected one of {}, mixed", keys.join(", "))
    })
}

fn init_logging(config: &Config) -> Result<()> {
    let dir = config.data_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("mathdr.log"))
        .context("opening log file")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| "mathdr=info".into());

    // The terminal belongs to the UI, so logs only ever go to the file.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config ({e}); using defaults");
        Config::default()
    });
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }

    if let Err(e) = init_logging(&config) {
        eprintln!("Logging disabled: {e:#}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let overrides = SettingsOverride {
        question_count: cli.questions,
        time_limit_seconds: cli.time_limit,
    };
    let mut app = App::new(config, &overrides);
    if let Some(mode) = cli.mode {
        app.start_session(mode, Instant::now());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "exiting on error");
        eprintln!("Error: {err:?}");
    }
    tracing::info!("bye");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                handle_key(app, key, Instant::now());
                // Steady typing starves ticks; keep timers honest.
                app.tick(Instant::now());
            }
            AppEvent::Tick(now) => app.tick(now),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen() {
        Screen::Menu => handle_menu_key(app, key, now),
        Screen::Drill => handle_drill_key(app, key, now),
        Screen::Summary => handle_summary_key(app, key, now),
        Screen::Stats => handle_stats_key(app, key),
        Screen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                app.activate(action, now);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.activate(action, now);
            }
        }
        _ => {}
    }
}

fn handle_drill_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Enter => app.confirm(now),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.clear_answer(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_answer(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.practice_again(now),
        KeyCode::Char('s') => app.go_to_stats(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    if app.stats_confirm_reset {
        match key.code {
            KeyCode::Char('y') => app.reset_stats(),
            KeyCode::Char('n') | KeyCode::Esc => app.stats_confirm_reset = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('x') => app.stats_confirm_reset = true,
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_select_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_adjust(1),
        KeyCode::Left | KeyCode::Char('h') => app.settings_adjust(-1),
        KeyCode::Char('d') => app.settings_reset(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match app.screen() {
        Screen::Menu => render_menu(frame, app, layout.main),
        Screen::Drill => render_drill(frame, app, layout.main),
        Screen::Summary => render_summary(frame, app, layout.main),
        Screen::Stats => render_stats(frame, app, layout.main),
        Screen::Settings => render_settings(frame, app, layout.main),
    }

    let hints: &[&str] = match app.screen() {
        Screen::Menu => &["[1-5] Start", "[s] Stats", "[c] Settings", "[q] Quit"],
        Screen::Drill => &["[Enter] Submit / next", "[Backspace] Delete", "[Esc] Menu"],
        Screen::Summary => &["[r] Again", "[s] Stats", "[q] Menu"],
        Screen::Stats if app.stats_confirm_reset => &["Reset all progress? [y] Yes", "[n] No"],
        Screen::Stats => &["[x] Reset progress", "[Esc] Menu"],
        Screen::Settings => &["[Up/Down] Select", "[Left/Right] Change", "[d] Defaults", "[Esc] Back"],
    };
    let footer_text = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let settings = app.machine.settings();
    let info = format!(
        " {} | {} questions | {}s each",
        app.machine.mode().label(),
        settings.question_count,
        settings.time_limit_seconds
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " mathdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.text_dim()).bg(colors.header_bg())),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let menu_area = ui::layout::centered_rect(50, 90, area);
    frame.render_widget(&app.menu, menu_area);
}

fn render_drill(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(drill) = app.machine.drill() else {
        return;
    };
    let subject = app.machine.subject();
    let centered = ui::layout::centered_rect(60, 70, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(3)])
        .split(centered);

    let skill = drill.question.skill;
    let question = QuestionArea::new(
        drill,
        subject.format_question(&drill.question),
        subject.skill_label(skill),
        subject.target_ms(drill.question.level),
        app.theme,
    );
    frame.render_widget(question, layout[0]);

    let countdown = ProgressBar::countdown(drill.time_left_seconds, drill.time_limit_seconds, app.theme);
    frame.render_widget(countdown, layout[1]);
}

fn render_summary(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    if let Some(summary) = app.machine.last_summary() {
        let centered = ui::layout::centered_rect(60, 70, area);
        frame.render_widget(Summary::new(summary, app.theme), centered);
    }
}

fn render_stats(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let subject = app.machine.subject();
    let stats = app.machine.stats();
    let weakest = app.machine.weakest_skill();
    let practiced = stats.iter().any(|(_, s)| !s.history.is_empty());

    let rows = stats
        .iter()
        .map(|(skill, skill_stats)| SkillRow {
            label: subject.skill_label(skill),
            level: skill_stats.level,
            max_level: subject.max_level(),
            accuracy: subject.accuracy(skill_stats),
            average_ms: subject.average_ms(skill_stats),
            target_ms: subject.target_ms(skill_stats.level),
            answered: skill_stats.history.len(),
            weakest: practiced && skill == weakest,
        })
        .collect();
    let recent = app.machine.recent_summaries().take(10).collect();

    let table = StatsTable::new(rows, recent, app.theme);
    frame.render_widget(table, ui::layout::centered_rect(80, 90, area));
}

fn render_settings(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let controls = app.machine.controls();
    let settings = app.machine.settings();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(controls.len() as u16 * 3),
            Constraint::Min(0),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Changes are saved immediately and apply to the next session",
        Style::default().fg(colors.text_dim()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(controls.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, control) in controls.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{}:", control.label);
        let value_text = format!("  < {} >", control.display(settings));

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });

        let value_style = Style::default().fg(if is_selected {
            colors.highlight()
        } else {
            colors.text_dim()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }
}
