pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout, Write},
};
use typeflow::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    evaluator::InputOutcome,
    logging,
    progress::{lesson_session, FileProgressStore, LessonBook, LessonStatus, TOTAL_LESSONS},
    results_log::ResultLog,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    session::{ModeKind, SessionController, SessionPhase},
    theme::{Theme, ThemeStore},
    timer::{SystemClock, TickOutcome},
    vocabulary::Difficulty,
    word_source::default_rng,
};

/// minimal typing trainer with timed tests, word tests, endless practice and lessons
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal typing trainer for the terminal: timed and word-count tests, endless practice, and a short lesson track unlocked by accuracy."
)]
pub struct Cli {
    /// test mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ModeKind>,

    /// number of seconds to run a timed test (implies --mode time)
    #[clap(short = 's', long, conflicts_with = "words", value_parser = clap::value_parser!(u32).range(1..))]
    seconds: Option<u32>,

    /// number of words to use in a word test (implies --mode words)
    #[clap(short = 'w', long, value_parser = clap::value_parser!(u64).range(1..))]
    words: Option<u64>,

    /// vocabulary to draw words from
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// color theme (remembered for next time)
    #[clap(long, value_enum)]
    theme: Option<Theme>,

    /// run a lesson instead of a test
    #[clap(
        long,
        conflicts_with_all = ["mode", "seconds", "words", "difficulty"],
        value_parser = clap::value_parser!(u32).range(1..=TOTAL_LESSONS as i64)
    )]
    lesson: Option<u32>,

    /// list lessons and their progress, then exit
    #[clap(long)]
    lessons: bool,

    /// forget all lesson progress
    #[clap(long)]
    reset_progress: bool,
}

impl Cli {
    /// Layer command line flags over the saved defaults
    fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.seconds {
            config.number_of_secs = secs;
            config.mode = ModeKind::Time;
        }
        if let Some(words) = self.words {
            config.number_of_words = words as usize;
            config.mode = ModeKind::Words;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything persisted across runs
#[derive(Debug)]
pub struct Stores {
    pub config: FileConfigStore,
    pub theme: ThemeStore,
    pub lessons: LessonBook,
    pub results: ResultLog,
}

impl Stores {
    fn open() -> Self {
        Self {
            config: FileConfigStore::new(),
            theme: ThemeStore::new(),
            lessons: LessonBook::open(FileProgressStore::new()),
            results: ResultLog::new(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: SessionController,
    pub state: AppState,
    pub theme: Theme,
    pub lesson: Option<u32>,
    /// Whether the lesson just finished reached mastery
    pub lesson_passed: Option<bool>,
    pub stores: Stores,
}

impl App {
    pub fn new(session: SessionController, theme: Theme, lesson: Option<u32>, stores: Stores) -> Self {
        Self {
            session,
            state: AppState::Typing,
            theme,
            lesson,
            lesson_passed: None,
            stores,
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.state = AppState::Typing;
        self.lesson_passed = None;
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.stores.theme.cycle(self.theme);
    }

    pub fn cycle_mode(&mut self) {
        self.reconfigure(|config| config.mode = config.mode.next());
    }

    pub fn cycle_difficulty(&mut self) {
        self.reconfigure(|config| config.difficulty = config.difficulty.next());
    }

    /// Change the saved settings, then restart the session with them.
    /// Lessons keep their fixed settings.
    fn reconfigure(&mut self, change: impl FnOnce(&mut Config)) {
        if self.lesson.is_some() {
            return;
        }
        let mut config = self.stores.config.load();
        config.absorb(self.session.config());
        change(&mut config);

        if let Err(e) = self.session.reconfigure(config.session_config()) {
            tracing::warn!("failed to switch settings: {e}");
            return;
        }
        if let Err(e) = self.stores.config.save(&config) {
            tracing::warn!("failed to save config: {e}");
        }
        tracing::info!(mode = %config.mode, difficulty = %config.difficulty, "settings changed");
        self.state = AppState::Typing;
        self.lesson_passed = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Char('r') if ctrl => {
                self.reset();
                return Flow::Continue;
            }
            KeyCode::Char('t') if ctrl => {
                self.cycle_theme();
                return Flow::Continue;
            }
            KeyCode::Char('d') if ctrl => {
                self.cycle_difficulty();
                return Flow::Continue;
            }
            KeyCode::Tab => {
                self.cycle_mode();
                return Flow::Continue;
            }
            _ => {}
        }

        match self.state {
            AppState::Typing => {
                match key.code {
                    KeyCode::Backspace => {
                        self.session.backspace();
                    }
                    KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                        self.session.type_char(c);
                    }
                    _ => {}
                }
                self.check_finished();
            }
            AppState::Results => match key.code {
                KeyCode::Char('r') => self.reset(),
                KeyCode::Char('t') => self.cycle_theme(),
                KeyCode::Char('q') => return Flow::Quit,
                _ => {}
            },
        }
        Flow::Continue
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.state != AppState::Typing {
            return;
        }
        if let InputOutcome::Rejected { .. } = self.session.paste(text) {
            tracing::info!("paste rejected, type one character at a time");
        }
        self.check_finished();
    }

    pub fn on_tick(&mut self) {
        if self.session.on_tick() == TickOutcome::Expired {
            self.check_finished();
        }
    }

    fn check_finished(&mut self) {
        if self.state != AppState::Typing || !self.session.is_finished() {
            return;
        }
        self.state = AppState::Results;

        let Some(result) = self.session.result() else {
            return;
        };
        self.stores.results.record(result);
        if let Some(lesson) = self.lesson {
            self.lesson_passed = Some(self.stores.lessons.complete_lesson(lesson, result.accuracy));
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(&AppDirs::log_path());

    let mut stores = Stores::open();

    if cli.reset_progress {
        stores.lessons.reset_progress();
        println!("lesson progress cleared");
    }
    if cli.lessons {
        print_lessons(&stores.lessons, &mut io::stdout())?;
    }
    if cli.lessons || cli.reset_progress {
        return Ok(());
    }

    if let Some(lesson) = cli.lesson {
        if !stores.lessons.is_unlocked(lesson) {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::ValueValidation,
                format!("lesson {lesson} is locked, complete lesson {} first", lesson - 1),
            )
            .exit();
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let session_config = match cli.lesson {
        Some(lesson) => lesson_session(lesson),
        None => {
            let mut config = stores.config.load();
            cli.apply(&mut config);
            if let Err(e) = stores.config.save(&config) {
                tracing::warn!("failed to save config: {e}");
            }
            config.session_config()
        }
    };

    let theme = match cli.theme {
        Some(theme) => {
            if let Err(e) = stores.theme.save(theme) {
                tracing::warn!("failed to save theme: {e}");
            }
            theme
        }
        None => stores.theme.load(),
    };

    let session = SessionController::new(session_config, default_rng(), SystemClock)?;
    let mut app = App::new(session, theme, cli.lesson, stores);
    tracing::info!(mode = %session_config.mode.kind(), lesson = ?cli.lesson, "starting");

    let mut terminal = setup_terminal()?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::every_second());
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

/// Enter raw mode and the alternate screen. On failure the terminal is
/// put back the way it was before the error is returned.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, Box<dyn Error>> {
    enable_raw_mode()?;
    with_raw_mode_rollback(disable_raw_mode, || {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(terminal),
            Err(e) => {
                let mut stdout = io::stdout();
                let _ = execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen);
                Err(e.into())
            }
        }
    })
}

/// Run the rest of the terminal setup, undoing raw mode if it fails
fn with_raw_mode_rollback<T>(
    disable: impl FnOnce() -> io::Result<()>,
    setup: impl FnOnce() -> Result<T, Box<dyn Error>>,
) -> Result<T, Box<dyn Error>> {
    setup().map_err(|e| {
        if let Err(restore) = disable() {
            tracing::warn!("failed to leave raw mode: {restore}");
        }
        e
    })
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Paste(text) => {
                let was_idle = app.session.phase() == SessionPhase::Idle;
                app.handle_paste(&text);
                if was_idle && app.session.phase() == SessionPhase::Running {
                    runner.resync();
                }
            }
            AppEvent::Key(key) => {
                let was_idle = app.session.phase() == SessionPhase::Idle;
                if app.handle_key(key) == Flow::Quit {
                    break;
                }
                // the countdown's first second starts at the first keystroke
                if was_idle && app.session.phase() == SessionPhase::Running {
                    runner.resync();
                }
            }
        }
    }

    Ok(())
}

fn print_lessons<S, W: Write>(book: &LessonBook<S>, out: &mut W) -> io::Result<()>
where
    S: typeflow::progress::ProgressStore,
{
    let total = book.total_progress();
    writeln!(
        out,
        "lessons: {}/{} completed ({}%)",
        total.completed, total.total, total.percentage
    )?;
    for lesson in 1..=TOTAL_LESSONS {
        let difficulty = lesson_session(lesson).difficulty.to_string();
        let status = match book.status(lesson) {
            LessonStatus::Locked => "locked".to_string(),
            LessonStatus::Unlocked => match book.score(lesson) {
                0 => "open".to_string(),
                score => format!("open (best {score}%)"),
            },
            LessonStatus::Completed { score } => format!("completed ({score}%)"),
        };
        writeln!(out, "  {lesson}  {difficulty:<6}  {status}")?;
    }
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ratatui::backend::TestBackend;
    use std::{path::Path, sync::mpsc, time::Duration};
    use tempfile::tempdir;
    use typeflow::{
        runtime::TestEventSource,
        session::{SessionConfig, SessionMode},
        vocabulary::Vocabulary,
    };

    fn stores_in(dir: &Path) -> Stores {
        Stores {
            config: FileConfigStore::with_path(dir.join("config.json")),
            theme: ThemeStore::with_path(dir.join("theme")),
            lessons: LessonBook::open(FileProgressStore::with_path(dir.join("progress.json"))),
            results: ResultLog::with_path(dir.join("results.csv")),
        }
    }

    fn words_app(dir: &Path, text: &str, lesson: Option<u32>) -> App {
        let config = SessionConfig {
            mode: SessionMode::Words {
                count: text.split(' ').count(),
            },
            difficulty: Difficulty::Easy,
        };
        let session =
            SessionController::with_text(config, text, default_rng(), SystemClock).unwrap();
        App::new(session, Theme::Dark, lesson, stores_in(dir))
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            assert_eq!(app.handle_key(key(c)), Flow::Continue);
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["typeflow"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.seconds, None);
        assert_eq!(cli.words, None);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.lesson, None);
        assert!(!cli.lessons);
        assert!(!cli.reset_progress);
    }

    #[test]
    fn test_cli_seconds_and_words() {
        let cli = Cli::parse_from(["typeflow", "-s", "60"]);
        assert_eq!(cli.seconds, Some(60));

        let cli = Cli::parse_from(["typeflow", "--words", "50"]);
        assert_eq!(cli.words, Some(50));

        assert!(Cli::try_parse_from(["typeflow", "-s", "10", "-w", "10"]).is_err());
        assert!(Cli::try_parse_from(["typeflow", "-s", "0"]).is_err());
    }

    #[test]
    fn test_cli_value_enums() {
        let cli = Cli::parse_from([
            "typeflow", "--mode", "practice", "-d", "hard", "--theme", "retro",
        ]);
        assert_eq!(cli.mode, Some(ModeKind::Practice));
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));
        assert_eq!(cli.theme, Some(Theme::Retro));

        assert!(Cli::try_parse_from(["typeflow", "--theme", "solarized"]).is_err());
    }

    #[test]
    fn test_cli_lesson_range() {
        assert_eq!(Cli::parse_from(["typeflow", "--lesson", "3"]).lesson, Some(3));
        assert!(Cli::try_parse_from(["typeflow", "--lesson", "0"]).is_err());
        assert!(Cli::try_parse_from(["typeflow", "--lesson", "9"]).is_err());
        assert!(Cli::try_parse_from(["typeflow", "--lesson", "2", "-w", "10"]).is_err());
    }

    #[test]
    fn test_cli_apply_overrides_config() {
        let mut config = Config::default();
        Cli::parse_from(["typeflow"]).apply(&mut config);
        assert_eq!(config, Config::default());

        Cli::parse_from(["typeflow", "-w", "40", "-d", "easy"]).apply(&mut config);
        assert_eq!(config.mode, ModeKind::Words);
        assert_eq!(config.number_of_words, 40);
        assert_eq!(config.difficulty, Difficulty::Easy);

        // explicit mode wins over the implied one
        Cli::parse_from(["typeflow", "-s", "15", "--mode", "practice"]).apply(&mut config);
        assert_eq!(config.mode, ModeKind::Practice);
        assert_eq!(config.number_of_secs, 15);
    }

    #[test]
    fn test_app_finishes_word_test_and_logs_result() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "the and", None);

        type_str(&mut app, "the xn");
        assert_eq!(app.state, AppState::Typing);
        type_str(&mut app, "d");
        assert_eq!(app.state, AppState::Results);

        let result = app.session.result().unwrap();
        assert_eq!(result.accuracy, 86);
        assert_eq!(result.correct_words, 1);
        assert_eq!(result.total_words, 2);

        let log = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[test]
    fn test_app_results_keys() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "go", None);
        type_str(&mut app, "go");
        assert_eq!(app.state, AppState::Results);

        // typing is ignored on the results screen
        assert_eq!(app.handle_key(key('x')), Flow::Continue);
        assert_eq!(app.session.evaluator().cursor(), 2);

        app.handle_key(key('t'));
        assert_eq!(app.theme, Theme::Light);

        app.handle_key(key('r'));
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.phase(), SessionPhase::Idle);

        assert_eq!(app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)), Flow::Quit);
    }

    #[test]
    fn test_app_q_quits_only_from_results() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "quiz", None);
        assert_eq!(app.handle_key(key('q')), Flow::Continue);
        assert_eq!(app.session.evaluator().cursor(), 1);
        type_str(&mut app, "uiz");
        assert_eq!(app.handle_key(key('q')), Flow::Quit);
    }

    #[test]
    fn test_app_control_keys() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "the and", None);
        type_str(&mut app, "th");
        app.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(app.session.evaluator().cursor(), 1);

        app.handle_key(ctrl('t'));
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.stores.theme.load(), Theme::Light);

        app.handle_key(ctrl('r'));
        assert_eq!(app.session.evaluator().cursor(), 0);
        assert_eq!(app.session.phase(), SessionPhase::Idle);

        assert_eq!(app.handle_key(ctrl('c')), Flow::Quit);
    }

    #[test]
    fn test_app_paste_is_dropped() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "the and", None);
        type_str(&mut app, "t");
        app.handle_paste("he and");
        assert_eq!(app.session.evaluator().cursor(), 1);
        assert_eq!(app.session.field(), "t");

        // a single-character paste is ordinary typing
        app.handle_paste("h");
        assert_eq!(app.session.evaluator().cursor(), 2);
    }

    #[test]
    fn test_app_lesson_completion() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "sad lad", Some(1));
        type_str(&mut app, "sad lad");
        assert_eq!(app.lesson_passed, Some(true));
        assert!(app.stores.lessons.is_unlocked(2));

        app.reset();
        assert_eq!(app.lesson_passed, None);

        let mut app = words_app(dir.path(), "ab", Some(2));
        type_str(&mut app, "xy");
        assert_eq!(app.lesson_passed, Some(false));
        assert_eq!(app.stores.lessons.score(2), 0);
        assert!(!app.stores.lessons.is_completed(2));
    }

    #[test]
    fn test_timed_app_finishes_on_ticks() {
        let dir = tempdir().unwrap();
        let config = SessionConfig {
            mode: SessionMode::Time { secs: 2 },
            difficulty: Difficulty::Easy,
        };
        let session = SessionController::new(config, default_rng(), SystemClock).unwrap();
        let mut app = App::new(session, Theme::Dark, None, stores_in(dir.path()));

        // no ticks count before the first keystroke
        app.on_tick();
        app.on_tick();
        assert_eq!(app.state, AppState::Typing);

        let first = app.session.evaluator().target().char_at(0).unwrap();
        app.handle_key(key(first));
        app.on_tick();
        assert_eq!(app.state, AppState::Typing);
        app.on_tick();
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.session.result().unwrap().accuracy, 100);
    }

    #[test]
    fn test_ctrl_d_switches_vocabulary() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "the and", None);
        type_str(&mut app, "th");

        app.handle_key(ctrl('d'));
        assert_eq!(app.session.config().difficulty, Difficulty::Medium);
        assert_eq!(app.session.phase(), SessionPhase::Idle);
        assert_eq!(app.session.evaluator().cursor(), 0);

        // a fresh two-word text drawn from the medium words
        let medium = Vocabulary::load(Difficulty::Medium).unwrap();
        let text = app.session.evaluator().target().as_string();
        assert_eq!(app.session.evaluator().target().word_count(), 2);
        assert!(text.split_whitespace().all(|w| medium.contains(w)));

        let saved = app.stores.config.load();
        assert_eq!(saved.difficulty, Difficulty::Medium);
        assert_eq!(saved.mode, ModeKind::Words);
        assert_eq!(saved.number_of_words, 2);
    }

    #[test]
    fn test_tab_cycles_mode_and_saves_it() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "go", None);
        type_str(&mut app, "go");
        assert_eq!(app.state, AppState::Results);

        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.config().mode, SessionMode::Practice);
        assert_eq!(app.stores.config.load().mode, ModeKind::Practice);

        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(
            app.session.config().mode,
            SessionMode::Time {
                secs: Config::default().number_of_secs
            }
        );
        assert_eq!(app.session.time_left(), Some(30));

        // Tab is never typed into the field
        assert_eq!(app.session.field(), "");
    }

    #[test]
    fn test_lessons_keep_their_settings() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "sad lad", Some(1));
        type_str(&mut app, "s");

        app.handle_key(ctrl('d'));
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.session.config().difficulty, Difficulty::Easy);
        assert_eq!(app.session.evaluator().cursor(), 1);
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn test_failed_setup_leaves_raw_mode() {
        let disabled = std::cell::Cell::new(false);
        let res: Result<(), _> = with_raw_mode_rollback(
            || {
                disabled.set(true);
                Ok(())
            },
            || Err(io::Error::other("no terminal").into()),
        );
        assert_eq!(res.unwrap_err().to_string(), "no terminal");
        assert!(disabled.get());

        let disabled = std::cell::Cell::new(false);
        let res = with_raw_mode_rollback(
            || {
                disabled.set(true);
                Ok(())
            },
            || Ok(7),
        );
        assert_eq!(res.unwrap(), 7);
        assert!(!disabled.get());
    }

    #[test]
    fn test_print_lessons() {
        let dir = tempdir().unwrap();
        let mut book = LessonBook::open(FileProgressStore::with_path(dir.path().join("p.json")));
        book.complete_lesson(1, 95);
        book.complete_lesson(2, 70);

        let mut out = Vec::new();
        print_lessons(&book, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "lessons: 1/8 completed (13%)");
        assert_eq!(lines.len(), 9);
        assert!(lines[1].contains("completed (95%)"));
        assert!(lines[2].contains("open (best 70%)"));
        assert!(lines[3].contains("locked"));
        assert!(lines[8].contains("hard"));
    }

    #[test]
    fn test_start_tui_runs_headless() {
        let dir = tempdir().unwrap();
        let mut app = words_app(dir.path(), "hi", None);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        let (tx, rx) = mpsc::channel();
        for c in "hi".chars() {
            tx.send(AppEvent::Key(key(c))).unwrap();
        }
        tx.send(AppEvent::Resize).unwrap();
        tx.send(AppEvent::Key(key('q'))).unwrap();

        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_secs(60)),
        );
        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert_eq!(app.state, AppState::Results);
        let rendered = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(rendered.contains("wpm"));
    }
}
