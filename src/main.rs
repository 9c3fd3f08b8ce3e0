//! RWINFRA - Road Infrastructure Registry
//!
//! A terminal tool for recording cities, the roads between them and the
//! budget of each road. The city and road tables are rewritten to disk
//! after every change.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use rwinfra::application::App;
use rwinfra::domain::{seed, Registry};
use rwinfra::infrastructure::{init_logging, Config};
use rwinfra::presentation::{render_ui, InputHandler};

#[derive(Parser, Debug)]
#[command(name = "rwinfra", version, about = "Road infrastructure registry")]
struct Cli {
    /// Config file (defaults to ./rwinfra.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for cities.txt, roads.txt and snapshots
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Start with no cities instead of the built-in network
    #[arg(long)]
    empty: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.empty {
        config.seed = false;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }

    init_logging(config.log_file.as_deref(), cli.debug).context("failed to initialise logging")?;
    tracing::info!(data_dir = %config.data_dir.display(), seed = config.seed, "starting");

    let registry = if config.seed {
        seed::rwanda_network().context("built-in city network is inconsistent")?
    } else {
        Registry::new()
    };

    let mut app = App::new(registry, &config);
    app.writer
        .write_snapshot(&app.registry)
        .with_context(|| format!("cannot write tables to {}", config.data_dir.display()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal error");
        println!("{err:?}");
    }
    tracing::info!("exiting");

    Ok(())
}

/// Draws the UI and feeds key presses to the input handler until the
/// user picks Exit.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                InputHandler::handle_key_event(app, key.code, key.modifiers);
            }
        }
    }
    Ok(())
}
