use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use datadash::app::App;
use datadash::config::{self, Config};
use datadash::core::{Command, Context, NotifyLevel};
use datadash::infrastructure::{ApiClient, RuntimeBridge, RuntimeCommand};
use datadash::{logging, ui};

#[derive(Debug, Parser)]
#[command(
    name = "datadash",
    version,
    about = "Datadash: a terminal dashboard for the AI data-analytics backend"
)]
struct Args {
    /// Backend base URL (overrides DATADASH_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Bind an already-uploaded dataset at startup
    #[arg(long, requires = "dataset_name")]
    dataset_id: Option<String>,

    /// Filename of the dataset given by --dataset-id
    #[arg(long, requires = "dataset_id")]
    dataset_name: Option<String>,

    /// Write logs here instead of the data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load();

    let env_url = std::env::var(config::API_URL_ENV).ok();
    let base_url = config::pin_base_url(config::resolve_base_url(
        args.api_url.as_deref(),
        env_url.as_deref(),
        config.api_url.as_deref(),
    ));

    init_logging(&args, &config);
    info!(base_url, "starting datadash");

    let runtime = RuntimeBridge::new(ApiClient::from_config())?;

    let mut app = App::new(Context::new(base_url));
    app.set_sidebar_open(config.sidebar_open.unwrap_or(true));
    if let (Some(file_id), Some(filename)) = (args.dataset_id, args.dataset_name) {
        app.mount_dataset(file_id, filename);
    }
    app.run_command(Command::Health);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, &runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn init_logging(args: &Args, config: &Config) {
    let Some(path) = args
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .or_else(config::default_log_path)
    else {
        return;
    };
    if let Err(err) = logging::init(&path, config.log_filter.as_deref()) {
        eprintln!("logging disabled: {err:#}");
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: &RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            info!("quitting");
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.apply_event(event);
    }

    for cmd in app.take_requests() {
        let label = cmd.label();
        if let Err(err) = runtime.send(cmd) {
            warn!(label, error = %err, "worker unavailable");
            app.in_flight = app.in_flight.saturating_sub(1);
            app.set_status(format!("{label} not sent: {err}"), NotifyLevel::Error);
        }
    }
}
