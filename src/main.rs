//! # content-brief CLI
//!
//! Command-line front end for the content-brief pipeline.
//!
//! - `extract`: fetch a page and print its content brief
//! - `generate`: fetch a page, confirm, then generate an article, a summary
//!   with an image prompt, and an illustration
//!
//! Failures are reported as messages; the process only exits with an error
//! for faults outside an action (terminal I/O, logging setup).

mod telemetry;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use content_brief::extractor::{self, ContentBrief};
use content_brief::fetcher::Fetcher;
use content_brief::generation::{DEFAULT_BASE_URL, GenerationClient, GenerationConfig};
use content_brief::input::{ApiKey, validate_url};
use content_brief::pipeline::{ActionOutcome, ActionState, ContentPipeline};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Turn a web page into a generated article and illustration", long_about = None)]
struct Cli {
    /// Export traces and metrics over OTLP
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a page and print its content brief
    Extract(ExtractArgs),

    /// Generate an article and an image from a page
    Generate(GenerateArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// URL of the page
    #[arg(required = true)]
    url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct GenerateArgs {
    /// URL of the page
    #[arg(required = true)]
    url: String,

    /// API key for the generation services
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Stop after the article; no summary or image
    #[arg(long)]
    no_image: bool,

    /// Model for the article and summary
    #[arg(long, default_value = "gpt-3.5-turbo")]
    text_model: String,

    /// Model for the illustration
    #[arg(long, default_value = "dall-e-2")]
    image_model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl std::fmt::Debug for GenerateArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateArgs")
            .field("url", &self.url)
            .field("yes", &self.yes)
            .field("no_image", &self.no_image)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(cli.otel)?;

    match cli.command {
        Some(Commands::Extract(args)) => extract_command(args).await?,
        Some(Commands::Generate(args)) => generate_command(args).await?,
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["content-brief", "--help"]);
        }
    }

    Ok(())
}

#[instrument]
async fn extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    let url = match validate_url(&args.url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Invalid URL: {}", e);
            return Ok(());
        }
    };

    let document = match Fetcher::new().fetch(&url).await {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error fetching the URL: {}", e);
            return Ok(());
        }
    };
    let brief = extractor::extract(&document);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&brief)?),
        OutputFormat::Text => print_brief(&brief),
    }

    Ok(())
}

#[instrument]
async fn generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let api_key = match resolve_api_key(args.api_key.as_deref(), &mut io::stdin().lock())? {
        Some(key) => key,
        None => {
            eprintln!("An API key is required to generate content.");
            return Ok(());
        }
    };

    let config = GenerationConfig::builder()
        .base_url(args.base_url.as_str())
        .text_model(args.text_model.as_str())
        .image_model(args.image_model.as_str())
        .build();
    let client = match GenerationClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating the generation client: {}", e);
            return Ok(());
        }
    };
    let pipeline = ContentPipeline::new(Fetcher::new(), client).with_image_generation(!args.no_image);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    let observer = spinner.clone();
    let prompt_spinner = spinner.clone();
    let assume_yes = args.yes;

    let outcome = pipeline
        .run(
            &args.url,
            &api_key,
            move |brief| prompt_spinner.suspend(|| confirm_generation(brief, assume_yes)),
            move |state| observer.set_message(state.to_string()),
        )
        .await;
    spinner.finish_and_clear();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?),
        OutputFormat::Text => print_outcome(&outcome)?,
    }

    Ok(())
}

/// Use the supplied key, or ask for one on `input`
///
/// A blank supplied key counts as missing.
fn resolve_api_key<R: BufRead>(
    supplied: Option<&str>,
    input: &mut R,
) -> anyhow::Result<Option<ApiKey>> {
    if let Some(key) = supplied.filter(|key| !key.trim().is_empty()) {
        return match ApiKey::new(key) {
            Ok(key) => Ok(Some(key)),
            Err(e) => {
                eprintln!("Invalid API key: {}", e);
                Ok(None)
            }
        };
    }

    eprintln!("OpenAI API key not found in OPENAI_API_KEY.");
    eprint!("Enter API key: ");
    io::stderr().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    match ApiKey::new(line) {
        Ok(key) => {
            eprintln!("API key provided. Set OPENAI_API_KEY to skip this prompt next time.");
            Ok(Some(key))
        }
        Err(_) => Ok(None),
    }
}

fn confirm_generation(brief: &ContentBrief, assume_yes: bool) -> bool {
    print_brief_counts(brief);
    if assume_yes {
        return true;
    }

    eprint!("Generate content from this page? [y/N] ");
    if let Err(e) = io::stderr().flush() {
        warn!("Failed to flush prompt: {}", e);
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            warn!("Failed to read confirmation: {}", e);
            false
        }
    }
}

fn print_brief_counts(brief: &ContentBrief) {
    eprintln!(
        "Found {} headlines, {} paragraphs, {} CTAs, {} images, {} videos.",
        brief.headlines().len(),
        brief.body_texts().len(),
        brief.ctas().len(),
        brief.images().len(),
        brief.videos().len()
    );
}

fn print_brief(brief: &ContentBrief) {
    println!("Headlines:");
    for headline in brief.headlines() {
        println!("  [{}] {}", headline.level, headline.text);
    }

    println!("Body texts:");
    for text in brief.body_texts() {
        println!("  - {}", text);
    }

    println!("CTAs:");
    for cta in brief.ctas() {
        match &cta.href {
            Some(href) => println!("  - {} -> {}", cta.text, href),
            None => println!("  - {} (button)", cta.text),
        }
    }

    println!("Images:");
    for image in brief.images() {
        println!(
            "  - {} alt=\"{}\" {}x{}",
            image.src, image.alt, image.width, image.height
        );
    }

    println!("Videos:");
    for video in brief.videos() {
        println!(
            "  - {} ({}) {}x{}",
            video.src, video.format, video.width, video.height
        );
    }
}

fn print_outcome(outcome: &ActionOutcome) -> anyhow::Result<()> {
    if let Some(image_url) = &outcome.image_url {
        println!("Generated Image");
        println!("{}\n", image_url);
    }

    if let Some(article) = &outcome.article {
        println!("Generated Content");
        content_brief::format_markdown(article)?;
    }

    if outcome.state == ActionState::Declined {
        eprintln!("Generation cancelled.");
    }

    if let Some(err) = &outcome.error {
        eprintln!("Error ({}): {}", outcome.state, err);
    }

    Ok(())
}

fn outcome_json(outcome: &ActionOutcome) -> serde_json::Value {
    serde_json::json!({
        "state": outcome.state.to_string(),
        "brief": outcome.brief,
        "article": outcome.article,
        "summary_and_prompt": outcome.summary_and_prompt,
        "image_url": outcome.image_url,
        "error": outcome.error.as_ref().map(|e| e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_supplied_key_is_used_without_prompting() {
        let mut input = Cursor::new("unused\n");
        let key = resolve_api_key(Some(" sk-flag "), &mut input).unwrap().unwrap();
        assert_eq!(key.expose(), "sk-flag");
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_blank_supplied_key_falls_back_to_prompt() {
        let mut input = Cursor::new("sk-typed\n");
        let key = resolve_api_key(Some("   "), &mut input).unwrap().unwrap();
        assert_eq!(key.expose(), "sk-typed");
    }

    #[test]
    fn test_blank_key_everywhere_is_handled() {
        let mut input = Cursor::new("\n");
        assert!(resolve_api_key(Some(""), &mut input).unwrap().is_none());

        let mut empty = Cursor::new("");
        assert!(resolve_api_key(None, &mut empty).unwrap().is_none());
    }
}
