use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytnotes",
    about = "YouTube transcript to detailed notes converter",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video link (reads one link per line from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Transcript language [default: config default_lang, else en]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Gemini model for the notes [default: config default_model, else gemini-pro]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write notes to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only resolve the link and print its thumbnail
    #[arg(short, long)]
    pub preview: bool,

    /// Show video and transcript details
    #[arg(short, long)]
    pub verbose: bool,
}
