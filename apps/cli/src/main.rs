use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use titlesmith_core::{CompletionClient, Session, Video};

#[derive(Parser)]
#[command(name = "titlesmith")]
#[command(about = "Fetch a YouTube channel's recent videos and rewrite their titles with AI")]
struct Cli {
    /// Channel URL, @handle, channel ID, or search text
    channel: String,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY")]
    api_key: String,

    /// Puter auth token. Omit to list videos without enhancing titles.
    #[arg(long, env = "PUTER_AUTH_TOKEN")]
    token: Option<String>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn print_video_line(video: &Video) {
    println!(
        "  {}  {}  {}",
        style(&video.published_at).dim(),
        style(format!("{:>7} views", video.view_count)).yellow(),
        video.title
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let token = cli.token.unwrap_or_default();
    let mut session = Session::new(cli.api_key, token.clone());

    println!(
        "\n{}  {}\n",
        style("titlesmith").cyan().bold(),
        style("Title Enhancer").dim()
    );

    // Step 1: resolve the channel and its recent videos
    let spinner = create_spinner("Fetching channel...");
    if let Err(e) = session.fetch_channel(&cli.channel).await {
        spinner.finish_and_clear();
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    if let Some(channel) = &session.channel {
        spinner.finish_with_message(format!(
            "{} {} — {} subscribers, {} videos",
            style("✓").green().bold(),
            style(&channel.title).bold(),
            channel.subscriber_count,
            channel.video_count
        ));
    }

    if session.videos.is_empty() {
        println!("\n{}", style("No recent videos found.").dim());
        return Ok(());
    }

    println!("\n{}", style(format!("Latest videos ({})", session.videos.len())).bold());
    for video in &session.videos {
        print_video_line(video);
    }

    if token.trim().is_empty() {
        println!(
            "\n{}",
            style("Pass --token (or set PUTER_AUTH_TOKEN) to enhance these titles.").dim()
        );
        return Ok(());
    }

    // Step 2: rewrite every title, one request at a time
    let enhancer = CompletionClient::default();
    let spinner = create_spinner(&format!(
        "Enhancing {} titles with AI...",
        session.videos.len()
    ));
    session.enhance_all(&enhancer).await;
    let enhanced = session.videos.iter().filter(|v| v.is_enhanced()).count();
    spinner.finish_with_message(format!(
        "{} Enhanced {}/{} titles",
        style("✓").green().bold(),
        enhanced,
        session.videos.len()
    ));

    println!("\n{}", style("─".repeat(60)).dim());
    for video in &session.videos {
        match (&video.enhanced_title, &video.reason) {
            (Some(title), Some(reason)) => {
                println!("{} {}", style("✓").green().bold(), style(title).bold());
                println!("  {} {}", style("was:").dim(), video.title);
                println!("  {} {}\n", style("why:").dim(), reason);
            }
            _ => {
                println!(
                    "{} {} {}\n",
                    style("✗").red().bold(),
                    video.title,
                    style("(not enhanced)").dim()
                );
            }
        }
    }

    if let Some(message) = &session.error {
        eprintln!("{} {}", style("Warning:").yellow().bold(), message);
    }

    Ok(())
}
