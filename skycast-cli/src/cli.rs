use std::{
    io::{IsTerminal, Write},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use skycast_core::{
    Config, Dashboard, FetchFailure, FetchState, ForecastFetcher, ForecastResponse, Ticket,
    provider::fetcher_from_config,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and a default location.
    Configure,

    /// Show today's conditions and the 7-day forecast once.
    Show {
        /// Location name, e.g. "London" or "Paris,FR". Defaults to the configured location.
        location: Option<String>,
    },

    /// Keep the dashboard open; every line typed on stdin switches location.
    Watch {
        /// Location to start with. Defaults to the configured location.
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location } => {
                let config = Config::load()?;
                let location = config.location_or_default(location)?;
                let fetcher = fetcher_from_config(&config)?;
                show(&fetcher, location, &Screen::detect()).await
            }
            Command::Watch { location } => {
                let config = Config::load()?;
                let location = location.or_else(|| config.default_location.clone());
                let fetcher = fetcher_from_config(&config)?;
                watch(Arc::new(fetcher), location, &Screen::detect()).await
            }
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave blank to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let current = config.default_location.clone().unwrap_or_default();
    let location = inquire::Text::new("Default location:")
        .with_default(&current)
        .with_help_message("Used when `skycast show` is run without a location")
        .prompt()
        .context("Failed to read default location")?;
    config.set_default_location(location);

    let saved = config.save()?;
    info!(path = %saved.display(), "configuration saved");
    println!("Configuration saved to {}", saved.display());

    Ok(ExitCode::SUCCESS)
}

async fn show<F>(fetcher: &F, location: String, screen: &Screen) -> anyhow::Result<ExitCode>
where
    F: ForecastFetcher + ?Sized,
{
    let mut dashboard = Dashboard::new();
    if screen.interactive {
        screen.paint(&render(dashboard.state()))?;
    }

    let state = dashboard.refresh(fetcher, location).await;
    screen.paint(&render(state))?;

    Ok(match state {
        FetchState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

type FetchOutcome = (Ticket, Result<ForecastResponse, FetchFailure>);

/// Run one fetch in the background and report its outcome on `tx`.
///
/// Earlier fetches are not cancelled; the dashboard drops their results on
/// arrival. A panicking fetch still reports, as [`FetchFailure::Task`].
fn spawn_fetch<F>(fetcher: Arc<F>, ticket: Ticket, tx: mpsc::UnboundedSender<FetchOutcome>)
where
    F: ForecastFetcher + 'static,
{
    debug!(generation = ticket.generation(), location = %ticket.location(), "fetch started");

    tokio::spawn(async move {
        let location = ticket.location().to_string();
        let fetch = tokio::spawn(async move { fetcher.fetch_forecast(&location).await });

        let result = match fetch.await {
            Ok(result) => result,
            Err(err) => Err(FetchFailure::Task(err.to_string())),
        };
        let _ = tx.send((ticket, result));
    });
}

async fn watch<F>(
    fetcher: Arc<F>,
    initial: Option<String>,
    screen: &Screen,
) -> anyhow::Result<ExitCode>
where
    F: ForecastFetcher + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut dashboard = Dashboard::new();

    if let Some(location) = initial {
        spawn_fetch(Arc::clone(&fetcher), dashboard.set_location(location), tx.clone());
        screen.paint(&render(dashboard.state()))?;
    }

    eprintln!("Type a location and press Enter to switch (Ctrl-D to quit).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        // After stdin closes, stay only long enough to show the last requested location.
        if !stdin_open && (dashboard.location().is_none() || !dashboard.state().is_pending()) {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read location from stdin")? {
                    Some(line) => {
                        let location = line.trim();
                        if location.is_empty() {
                            continue;
                        }
                        spawn_fetch(Arc::clone(&fetcher), dashboard.set_location(location), tx.clone());
                        screen.paint(&render(dashboard.state()))?;
                    }
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            Some((ticket, result)) = rx.recv() => {
                if dashboard.apply(&ticket, result) {
                    screen.paint(&render(dashboard.state()))?;
                }
            }
        }
    }

    Ok(match dashboard.state() {
        FetchState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Where rendered frames go. On a terminal each frame replaces the last.
struct Screen {
    interactive: bool,
}

impl Screen {
    fn detect() -> Self {
        Self { interactive: std::io::stdout().is_terminal() }
    }

    fn paint(&self, frame: &str) -> anyhow::Result<()> {
        let mut out = std::io::stdout().lock();
        if self.interactive {
            execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        writeln!(out, "{}", frame.trim_end())?;
        out.flush()?;
        Ok(())
    }
}
