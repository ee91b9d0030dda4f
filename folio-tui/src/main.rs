//! Folio CLI entry point
//!
//! Interactive portfolio viewer plus export, preview and validation
//! commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use folio_core::Portfolio;
use folio_tui::{preview_text, run_viewer, FolioConfig};
use folio_utils::{basic_config, init_logging, LogLevel, LogOutput, LoggerConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Terminal portfolio viewer")]
#[command(long_about = "Browse a portfolio page in the terminal: section navigation that follows your scroll position and animated headline stats.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Portfolio content file (TOML, JSON or YAML)
    #[arg(long, value_name = "FILE", global = true)]
    content: Option<PathBuf>,

    /// Viewer configuration file (TOML, JSON or YAML)
    #[arg(long, value_name = "FILE", global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Write logs here while the viewer owns the terminal
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive viewer (default)
    Run,
    /// Write the portfolio content as pretty JSON
    Export {
        /// Output file path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the whole page as plain text
    Preview {
        /// Page width in columns
        #[arg(long, default_value = "80")]
        width: usize,
    },
    /// Check configuration, content and terminal size
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FolioConfig::load(cli.run.config.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration{}",
            describe_path(cli.run.config.as_deref())
        )
    })?;

    match &cli.command {
        None | Some(Commands::Run) => run_interactive(&cli.run, config),
        Some(Commands::Export { output }) => {
            init_stderr_logging(&config)?;
            export_content(&cli.run, &config, output.as_deref())
        }
        Some(Commands::Preview { width }) => {
            init_stderr_logging(&config)?;
            show_preview(&cli.run, &config, *width)
        }
        Some(Commands::Validate) => {
            init_stderr_logging(&config)?;
            validate(&cli.run, &config)
        }
    }
}

fn describe_path(path: Option<&Path>) -> String {
    path.map(|p| format!(" from {}", p.display()))
        .unwrap_or_default()
}

fn init_stderr_logging(config: &FolioConfig) -> Result<()> {
    basic_config(Some(config.logging.level)).context("Failed to initialize logging")
}

/// Content from the command line, else the config, else the built-in page
fn load_content(args: &RunArgs, config: &FolioConfig) -> Result<Portfolio> {
    let path = args.content.as_deref().or(config.content.as_deref());
    Portfolio::load_or_builtin(path)
        .with_context(|| format!("Failed to load portfolio content{}", describe_path(path)))
}

fn run_interactive(args: &RunArgs, config: FolioConfig) -> Result<()> {
    let output = args
        .log_file
        .clone()
        .or_else(|| config.logging.file.clone())
        .map_or(LogOutput::Discard, LogOutput::File);
    init_logging(&LoggerConfig {
        level: config.logging.level,
        output,
        include_location: true,
        ..LoggerConfig::default()
    })
    .context("Failed to initialize logging")?;

    let portfolio = load_content(args, &config)?;
    info!(name = %portfolio.profile.name, "starting viewer");

    run_viewer(portfolio, config).map_err(|e| {
        eprintln!("Viewer failed: {e}");
        eprintln!("Try a non-interactive command instead:");
        eprintln!("   folio preview --width 80");
        e
    })
}

fn export_content(args: &RunArgs, config: &FolioConfig, output: Option<&Path>) -> Result<()> {
    let portfolio = load_content(args, config)?;

    match output {
        Some(path) => {
            portfolio
                .export_json(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Portfolio content exported to: {}", path.display());
        }
        None => println!("{}", portfolio.to_json_pretty()?),
    }
    Ok(())
}

fn show_preview(args: &RunArgs, config: &FolioConfig, width: usize) -> Result<()> {
    let portfolio = load_content(args, config)?;
    let year = chrono::Local::now().year();
    print!("{}", preview_text(&portfolio, width.max(1), year));
    Ok(())
}

fn validate(args: &RunArgs, config: &FolioConfig) -> Result<()> {
    println!("Validating folio configuration...");
    println!(
        "   Configuration: ok{}",
        describe_path(args.config.as_deref())
    );
    println!("   Color scheme: {:?}", config.color_scheme);
    println!("   Log level: {}", config.logging.level);

    let portfolio = load_content(args, config)?;
    portfolio.validate()?;
    println!(
        "   Content: ok ({} stats, {} projects, {} experience, {} education)",
        portfolio.stats.len(),
        portfolio.projects.len(),
        portfolio.experience.len(),
        portfolio.education.len()
    );

    match crossterm::terminal::size() {
        Ok((columns, rows)) => {
            println!("   Terminal size: {columns}x{rows}");
            if columns < 60 || rows < 20 {
                println!("   Warning: terminal is small. Recommended: 80x24 or larger");
            }
        }
        Err(e) => println!("   Terminal size: unavailable ({e})"),
    }

    if config.logging.level <= LogLevel::Debug && config.logging.file.is_none() {
        println!("   Note: debug logging without logging.file is discarded in the viewer");
    }

    println!("\nReady. Run `folio` to open the viewer.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_before_run() {
        let cli = Cli::try_parse_from(["folio", "--log-file", "x.log"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.log_file, Some(PathBuf::from("x.log")));
    }

    #[test]
    fn test_log_file_after_run() {
        let cli = Cli::try_parse_from([
            "folio",
            "run",
            "--log-file",
            "x.log",
            "--content",
            "me.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.run.log_file, Some(PathBuf::from("x.log")));
        assert_eq!(cli.run.content, Some(PathBuf::from("me.toml")));
    }

    #[test]
    fn test_preview_width() {
        let cli = Cli::try_parse_from(["folio", "preview", "--width", "40"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Preview { width: 40 })));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["folio", "publish"]).is_err());
    }
}
