//! Tariff Explorer CLI - interactive tariff dashboard and economic chatbot.
//!
//! Explore how tariffs affect imports, prices, and supply chains.

mod dashboard;
mod resources;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use tariff_common::pipeline::{self, ReplySource};
use tariff_common::{ChatSession, CompletionGateway, ExplorerConfig, TariffDataset};

#[derive(Parser)]
#[command(name = "tariffctl")]
#[command(about = "U.S. tariff impact explorer and economic chatbot", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file path (overrides the discovery chain)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tariff dataset CSV path (overrides the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,

    /// List the countries in the dataset
    Countries,

    /// Ask a one-shot question about a country's tariff
    Ask {
        /// Country to ask about (must exist in the dataset)
        country: String,

        /// The question
        question: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ExplorerConfig::load_from(path)?,
        None => ExplorerConfig::load()?,
    };

    // Dataset load failure is fatal: without rows there is nothing to show
    let data_path = cli
        .data
        .clone()
        .unwrap_or_else(|| config.dataset.path.clone());
    let dataset = TariffDataset::load(&data_path)
        .with_context(|| format!("Failed to load tariff dataset from {}", data_path.display()))?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => dashboard::run(&config, &dataset),
        Commands::Countries => {
            for country in dataset.countries() {
                println!("{}", country);
            }
            Ok(())
        }
        Commands::Ask { country, question } => {
            ask(&config, &dataset, &country, &question.join(" "))
        }
    }
}

/// One-shot pipeline run: select the country, run a single turn, print.
fn ask(
    config: &ExplorerConfig,
    dataset: &TariffDataset,
    country: &str,
    question: &str,
) -> Result<()> {
    if question.trim().is_empty() {
        bail!("No question given");
    }

    let Some(record) = dataset.lookup(country) else {
        bail!(
            "Unknown country '{}'. Known countries: {}",
            country,
            dataset.countries().join(", ")
        );
    };

    let gateway = CompletionGateway::from_config(&config.gateway)
        .unwrap_or_else(|e| CompletionGateway::unconfigured(e.to_string()));

    let mut session = ChatSession::new();
    session.select_country(country);

    let reply = pipeline::run_turn(&mut session, record, &gateway, question)?;

    println!("{}", reply.text);

    if reply.suggest_resources && reply.source == ReplySource::Completion {
        println!();
        println!("{}", "Explore further:".bold());
        for (label, url) in resources::reference_links(country) {
            println!("  - {} ({})", label, url.cyan());
        }
    }

    Ok(())
}
