//! m3u8-inspect
//!
//! Reads one playlist file, parses and version-checks it, and prints a JSON
//! report on stdout. Exits with status 1 when version violations are found.
//!
//! Usage: `m3u8-inspect <playlist.m3u8> [config.toml]`

use std::process::ExitCode;

use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hls_playlist::{LoggingConfig, PlaylistConfig, Result, Validator};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "m3u8-inspect";

fn main() -> Result<ExitCode> {
    let mut args = std::env::args().skip(1);
    let Some(playlist_path) = args.next() else {
        eprintln!("usage: {} <playlist.m3u8> [config.toml]", APP_NAME);
        return Ok(ExitCode::from(2));
    };

    let config = match args.next() {
        Some(path) => PlaylistConfig::from_file(&path)?,
        None => PlaylistConfig::default(),
    };

    init_logging(&config.logging);
    tracing::info!("{} v{} starting", APP_NAME, VERSION);

    let text = std::fs::read_to_string(&playlist_path)?;
    let text = text.trim();

    let document = hls_playlist::parse(text)?;
    tracing::info!(
        path = %playlist_path,
        kind = ?document.kind(),
        segments = document.segments.len(),
        playlists = document.playlists.len(),
        "playlist parsed"
    );

    let validator = Validator::from_config(&config.validation)?;
    let violations = validator.validate_text(text);
    for violation in &violations {
        tracing::warn!(
            line = violation.line_number,
            "{}: {}",
            violation.message,
            violation.line_text
        );
    }

    let report = json!({
        "kind": document.kind(),
        "total_duration": document.total_duration(),
        "document": document,
        "violations": violations,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if violations.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize logging with tracing
fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("hls_playlist={0},m3u8_inspect={0}", config.level).into()
    });
    let json = config.is_json();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
