use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, OutputFormat};
use ytnotes::app::App;
use ytnotes::config::{API_KEY_ENV, Config};
use ytnotes::summarize::Gemini;
use ytnotes::youtube::CaptionFetcher;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytnotes.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytnotes")
        .join("logs")
}

fn build_after_help(config: &Config) -> String {
    let key_line = if config.api_key().is_some() {
        format!("  \x1b[32m✅\x1b[0m {API_KEY_ENV}")
    } else {
        format!("  \x1b[31m❌\x1b[0m {API_KEY_ENV} (not set, needed to generate notes)")
    };

    format!(
        "\nCREDENTIALS:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        ytnotes::config::config_path().display(),
        log_dir().join("ytnotes.log").display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before anything reads the environment
    let dotenv = dotenvy::dotenv();
    setup_logging()?;
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env loaded: {e}"),
    }

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();

    let after_help = build_after_help(&config);
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // CLI flags take priority over config
    let lang = config.lang(cli.lang.as_deref());
    let model = config.model(cli.model.as_deref());
    debug!("Using lang={lang} model={model}");

    let client = reqwest::Client::new();
    let app = App::new(
        CaptionFetcher::new(client.clone(), lang),
        Gemini::new(client, config.api_key(), model),
    );

    // Collect links: from arg or stdin
    let links = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if links.is_empty() {
        bail!("no YouTube link provided\n\nUsage: ytnotes <URL>\n       echo <URL> | ytnotes");
    }

    let mut rendered = Vec::new();
    let mut failed = 0usize;
    let mut total = 0usize;

    for link in &links {
        let link = link.trim();
        if link.is_empty() {
            continue;
        }
        total += 1;

        let preview = match app.on_link(link) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {e} ({link})");
                failed += 1;
                continue;
            }
        };

        if cli.preview {
            rendered.push(match cli.format {
                OutputFormat::Text => preview.thumbnail_url,
                OutputFormat::Json => serde_json::to_string_pretty(&preview)?,
            });
            continue;
        }

        let notes = match app.on_get_notes(link).await {
            Ok(n) => n,
            Err(e) => {
                eprintln!("error: {e}");
                failed += 1;
                continue;
            }
        };

        if cli.verbose {
            eprintln!(
                "Video: {} ({})\nThumbnail: {}\nSummary: {} bytes",
                notes.title,
                notes.video_id,
                notes.thumbnail_url,
                notes.summary.len(),
            );
        }

        rendered.push(match cli.format {
            OutputFormat::Text => ytnotes::output::render_text(&notes),
            OutputFormat::Json => ytnotes::output::render_json(&notes)?,
        });
    }

    if !rendered.is_empty() {
        let out = rendered.join("\n\n");
        if let Some(ref path) = cli.output {
            std::fs::write(path, &out)?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{out}");
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} link(s) failed");
    }

    Ok(())
}
