use anyhow::Context;
use clap::{Parser, Subcommand};

use citycast_core::{
    Config, JsonFileStore, OpenWeatherClient, RecentSearches, RenderPayload, RenderSink,
    SessionController,
};

use crate::output::TerminalRenderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "City weather lookup with a search history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show weather for a city; without one, repeat the last lookup.
    Show {
        /// City name, e.g. "London".
        city: Option<String>,
    },

    /// Interactive session: enter city names until an empty line.
    Prompt,

    /// Print the recent searches.
    Recent,

    /// Forget the recent searches.
    Clear,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        // Default to the interactive session, mirroring a bare invocation.
        match self.command.unwrap_or(Command::Prompt) {
            Command::Configure => configure(),
            Command::Show { city } => {
                let mut session = build_session()?;
                match city {
                    // The renderer already reported any failure; the
                    // process itself has nothing to add.
                    Some(city) => {
                        let _ = session.submit(&city).await;
                    }
                    None => session.startup().await,
                }
                Ok(())
            }
            Command::Prompt => prompt_loop().await,
            Command::Recent => show_recent(),
            Command::Clear => clear_recent(),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved. Try `citycast show London`.");
    Ok(())
}

fn open_history() -> anyhow::Result<RecentSearches<JsonFileStore>> {
    let path = Config::history_file_path()?;
    Ok(RecentSearches::load(JsonFileStore::open(path)))
}

fn build_session()
-> anyhow::Result<SessionController<OpenWeatherClient, TerminalRenderer, JsonFileStore>> {
    let config = Config::load()?;
    let fetcher = OpenWeatherClient::from_config(&config)?;
    let recent = open_history()?;

    Ok(SessionController::new(fetcher, TerminalRenderer::new(), recent))
}

async fn prompt_loop() -> anyhow::Result<()> {
    let mut session = build_session()?;
    session.startup().await;

    loop {
        let Some(input) = inquire::Text::new("City:")
            .with_help_message("empty line quits; a number re-runs that recent search")
            .prompt_skippable()
            .context("Failed to read input")?
        else {
            break;
        };

        if input.trim().is_empty() {
            break;
        }

        // Digits select from the rendered recency list, 1-based.
        if let Ok(index) = input.trim().parse::<usize>() {
            if (1..=session.recent_entries().len()).contains(&index) {
                let _ = session.submit_recent(index - 1).await;
                continue;
            }
        }

        let _ = session.submit(&input).await;
    }

    Ok(())
}

fn show_recent() -> anyhow::Result<()> {
    let recent = open_history()?;
    TerminalRenderer::new().render(RenderPayload::RecentList {
        names: recent.entries().to_vec(),
    })
}

fn clear_recent() -> anyhow::Result<()> {
    let mut recent = open_history()?;
    if recent.entries().is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    let confirmed = inquire::Confirm::new("Forget all recent searches?")
        .with_default(false)
        .prompt()
        .context("Failed to read confirmation")?;

    if confirmed {
        recent.clear();
        println!("Recent searches cleared.");
    } else {
        println!("Nothing changed.");
    }

    Ok(())
}
