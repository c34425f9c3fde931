use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use darkroom_core::{
    DarkroomEvent, HttpImageProvider, ImageProvider, StageController, UnavailableImageProvider,
};
use shared::{domain::ImageRef, protocol::Intent};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;
mod config;
mod presenter;

use commands::{parse_command, Command, HELP};
use config::{load_settings, Settings};
use presenter::{describe_event, render_snapshot};

#[derive(Parser, Debug)]
#[command(name = "darkroom", about = "Expose, develop and dry a virtual photographic print")]
struct Args {
    /// Config file (defaults to ./darkroom.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scene to photograph; overrides the configured theme.
    #[arg(long)]
    theme: Option<String>,
    /// Print events and status as JSON lines.
    #[arg(long)]
    json: bool,
    /// Stay in the dryer until `next` instead of reviewing automatically.
    #[arg(long)]
    manual_review: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if args.manual_review {
        settings.auto_review = false;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let controller = StageController::new(
        settings.timing(),
        build_image_provider(&settings)?,
        ImageRef::new(settings.fallback_image_url.clone()),
    );
    tokio::spawn(print_events(controller.subscribe_events(), args.json));

    let mut theme = settings.theme.clone();
    request_scene(&controller, &theme).await;
    if !args.json {
        println!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            Command::Intent(intent) => {
                let requested_theme = match &intent {
                    Intent::RequestImage { theme } => Some(theme.trim().to_string()),
                    _ => None,
                };
                let is_reset = intent == Intent::Reset;
                if let Err(err) = controller.dispatch(intent).await {
                    debug!(error = %err, "darkroom: command not applied");
                    continue;
                }
                if let Some(requested) = requested_theme {
                    theme = requested;
                }
                if is_reset {
                    // A fresh session starts without a scene.
                    request_scene(&controller, &theme).await;
                }
            }
            Command::Status => {
                let snapshot = controller.snapshot().await;
                if args.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    print!("{}", render_snapshot(&snapshot));
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    let running = controller.active_timers().await.len();
    info!("darkroom: leaving, {running} timer(s) still running");
    controller.reset().await;
    Ok(())
}

fn build_image_provider(settings: &Settings) -> Result<Arc<dyn ImageProvider>> {
    let Some(endpoint) = settings.image_endpoint.as_deref() else {
        info!("darkroom: no image endpoint configured; scenes use the fallback image");
        return Ok(Arc::new(UnavailableImageProvider));
    };
    let endpoint =
        Url::parse(endpoint).with_context(|| format!("invalid image endpoint '{endpoint}'"))?;
    info!("darkroom: image provider at {endpoint}");
    let provider = HttpImageProvider::new(
        endpoint,
        settings.image_api_key.clone(),
        settings.image_timeout(),
    )?;
    Ok(Arc::new(provider))
}

async fn request_scene(controller: &Arc<StageController>, theme: &str) -> bool {
    match controller.request_image(theme).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "darkroom: scene request for '{theme}' not sent");
            false
        }
    }
}

async fn print_events(mut events: tokio::sync::broadcast::Receiver<DarkroomEvent>, json: bool) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{line}"),
                        Err(err) => warn!(error = %err, "darkroom: failed to encode event"),
                    }
                } else if let Some(line) = describe_event(&event) {
                    println!("{line}");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("darkroom: event printer skipped {skipped} event(s)");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
