use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser, ValueEnum};
use crossterm::{
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
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{debug, info};
use typespeed::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, CrosstermEventSource, Runner},
    App,
};

/// minimal typing speed trainer with live feedback, wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a randomly drawn sentence as quickly and accurately as you can. The clock starts on your first keystroke and stops when the sentence is complete."
)]
pub struct Cli {
    /// custom sentence to type instead of drawing from a pool
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// built-in sentence pool to draw from
    #[clap(short = 'l', long, value_enum)]
    pool: Option<SupportedPool>,

    /// file with one sentence per line (or a .json pool) to draw from
    #[clap(long = "sentences")]
    sentences_file: Option<PathBuf>,

    /// refresh interval of the live clock in milliseconds
    #[clap(long = "tick-ms")]
    tick_rate_ms: Option<u64>,

    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// persist the effective pool/tick settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum, strum_macros::Display)]
pub enum SupportedPool {
    Classic,
    Pangrams,
}

impl SupportedPool {
    fn as_name(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl Cli {
    /// Layer command line flags over the stored config
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(pool) = self.pool {
            cfg.pool = pool.as_name();
            // an explicit pool beats a configured file
            cfg.sentences_file = None;
        }
        if let Some(path) = &self.sentences_file {
            cfg.sentences_file = Some(path.clone());
        }
        if let Some(ms) = self.tick_rate_ms {
            cfg.tick_rate_ms = ms.max(1);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.prompt.as_deref().is_some_and(|p| p.trim().is_empty()) {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "prompt must not be empty")
            .exit();
    }

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    cli.apply_to(&mut cfg);

    if let Some(log_path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        let level = logging::level_for_verbosity(cli.verbose, &cfg.log_level);
        logging::init_logging(&log_path, &level)?;
    }

    if cli.save_config {
        store.save(&cfg)?;
        info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // resolve the pool before touching the terminal so errors print normally
    let mut app = App::from_config(&cfg, cli.prompt.clone())?;
    debug!(?cfg, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(
        &mut terminal,
        &mut app,
        Duration::from_millis(cfg.tick_rate_ms),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), tick_rate);

    terminal.draw(|f| ui(app, f))?;

    while !app.should_quit {
        let event = runner.step();
        let now = Instant::now();

        let redraw = match event {
            AppEvent::Tick => app.on_tick(now) == typespeed::Transition::Sampled,
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                app.handle_key(key, now);
                !app.should_quit
            }
        };

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
