use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use term_type::{
    app::{App, Settings},
    config::{Config, ConfigStore, FileConfigStore},
    generator::Difficulty,
    runtime::{AppEvent, CrosstermEventSource, InputEvent, Runner},
};

/// interactive terminal typing-speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "An interactive typing-speed test for the terminal: type the generated text word by word, watch live wpm and accuracy, and get a percentile estimate at the end."
)]
struct Cli {
    /// number of seconds to run the test
    #[clap(short, long)]
    secs: Option<u64>,

    /// difficulty of the generated text
    #[clap(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// log internal events (word judged, tick) to the debug log file
    #[clap(long)]
    debug: bool,
}

impl Cli {
    /// Merges CLI flags over the persisted settings. `--debug` is not
    /// persisted, so it is taken from the CLI alone.
    fn merge(&self, cfg: &Config) -> Settings {
        Settings {
            secs: self.secs.unwrap_or(cfg.secs),
            difficulty: self
                .difficulty
                .unwrap_or_else(|| Difficulty::from_name(&cfg.difficulty)),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if cli.debug {
        init_debug_logging()?;
    }

    let store = FileConfigStore::new();
    let settings = cli.merge(&store.load());
    if let Err(err) = store.save(&Config {
        secs: settings.secs,
        difficulty: settings.difficulty.to_string().to_lowercase(),
    }) {
        tracing::debug!(%err, "settings not persisted");
    }

    // Fail fast (bad duration) before touching the terminal.
    let mut app = App::new(settings)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Routes debug events to a log file; stdout belongs to the alternate
/// screen while the test runs.
fn init_debug_logging() -> Result<(), Box<dyn Error>> {
    let path = directories::ProjectDirs::from("", "", "term-type")
        .map(|pd| pd.data_dir().join("term-type.log"))
        .unwrap_or_else(|| "term-type.log".into());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .init();
    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                app.on_tick(Instant::now());
            }
            AppEvent::Resize => {}
            AppEvent::Input(InputEvent::Quit) => break,
            AppEvent::Input(input) => {
                app.on_input(input, Instant::now())?;
                // A busy keyboard must not starve the countdown.
                app.on_tick(Instant::now());
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
