//! Franchise Cap Simulator CLI
//!
//! Loads players and contracts from a seed document, runs one cap or contract
//! command against them and prints the result as JSON. Mutating commands write
//! the ledger back to the seed file when write-back is enabled.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use contract_ledger::{ContractId, PlayerId, TeamId};
use contract_lifecycle::{NegotiationOutcome, VeteranTerms};
use franchise_service::{initialize_logging_with_config, load_configuration, ServiceState};

#[derive(Parser)]
#[command(name = "cap-sim")]
#[command(about = "Salary cap and contract simulator for a professional sports league")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed document with players and contracts (JSON)
    #[arg(short, long, global = true)]
    seed: Option<PathBuf>,

    /// Write the ledger back to the seed document after a mutating command
    #[arg(short, long, global = true)]
    write_back: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// League cap table and every team's cap position
    Overview,

    /// Cap summary of a team for a league year
    CapSummary {
        team_id: TeamId,
        /// League year (defaults to the current cap year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Cap summary with top contracts, position split and cap health
    CapReport { team_id: TeamId },

    /// Year-by-year analysis of a contract
    Contract { contract_id: u64 },

    /// Every contract a player has held, newest first
    History { player_id: PlayerId },

    /// Totals over a team's active contracts
    TeamContracts { team_id: TeamId },

    /// Sign a drafted player to the rookie scale
    SignRookie {
        player_id: PlayerId,
        team_id: TeamId,
        #[arg(short, long)]
        round: u32,
        #[arg(short, long)]
        years: Option<u8>,
    },

    /// Sign a player to a veteran deal
    SignVeteran {
        player_id: PlayerId,
        team_id: TeamId,
        #[command(flatten)]
        offer: OfferArgs,
    },

    /// Offer a player an extension
    Extend {
        player_id: PlayerId,
        team_id: TeamId,
        #[command(flatten)]
        offer: OfferArgs,
    },

    /// Convert first-year salary into signing bonus
    Restructure { contract_id: u64, amount: i64 },

    /// Release a player
    Release {
        contract_id: u64,
        /// Designate the release as post-June 1
        #[arg(long)]
        post_june_1: bool,
    },

    /// Place the franchise tag on a player
    Tag { player_id: PlayerId, team_id: TeamId },

    /// Trade value estimate for a player
    TradeValue { player_id: PlayerId },
}

#[derive(clap::Args)]
struct OfferArgs {
    /// First-year salary
    #[arg(short, long)]
    base_salary: i64,
    #[arg(short, long)]
    years: u8,
    #[arg(long, default_value_t = 0)]
    signing_bonus: i64,
    #[arg(long, default_value_t = 0)]
    roster_bonus: i64,
}

impl OfferArgs {
    fn terms(&self) -> VeteranTerms {
        VeteranTerms::new(self.base_salary, self.years)
            .with_signing_bonus(self.signing_bonus)
            .with_roster_bonus(self.roster_bonus)
    }
}

impl Commands {
    fn is_mutating(&self) -> bool {
        matches!(
            self,
            Commands::SignRookie { .. }
                | Commands::SignVeteran { .. }
                | Commands::Extend { .. }
                | Commands::Restructure { .. }
                | Commands::Release { .. }
                | Commands::Tag { .. }
        )
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.service.seed_file = Some(seed);
    }
    if cli.write_back {
        config.service.write_back = true;
    }

    initialize_logging_with_config(
        &config.logging.level,
        &config.logging.format,
        config.logging.file.as_deref(),
    )?;
    info!("Starting cap-sim v{}", env!("CARGO_PKG_VERSION"));

    let state = ServiceState::new(config)?;
    let lifecycle = state.lifecycle();

    match &cli.command {
        Commands::Overview => {
            let teams = state.team_ids().await;
            print_json(&lifecycle.league_overview(&teams).await?)?;
        }
        Commands::CapSummary { team_id, year } => {
            let engine = lifecycle.cap_engine();
            let year = year.unwrap_or(engine.league().year);
            print_json(&engine.team_cap_summary(*team_id, year).await?)?;
        }
        Commands::CapReport { team_id } => {
            print_json(&lifecycle.team_cap_report(*team_id).await?)?;
        }
        Commands::Contract { contract_id } => {
            print_json(&lifecycle.contract_analysis(ContractId(*contract_id)).await?)?;
        }
        Commands::History { player_id } => {
            print_json(&lifecycle.player_contract_history(*player_id).await?)?;
        }
        Commands::TeamContracts { team_id } => {
            print_json(&lifecycle.team_contract_summary(*team_id).await?)?;
        }
        Commands::SignRookie { player_id, team_id, round, years } => {
            let contract =
                lifecycle.create_rookie_contract(*player_id, *team_id, *round, *years).await?;
            print_json(&contract)?;
        }
        Commands::SignVeteran { player_id, team_id, offer } => {
            let contract =
                lifecycle.create_veteran_contract(*player_id, *team_id, offer.terms()).await?;
            print_json(&contract)?;
        }
        Commands::Extend { player_id, team_id, offer } => {
            let outcome =
                lifecycle.negotiate_extension(*player_id, *team_id, offer.terms()).await?;
            match &outcome {
                NegotiationOutcome::Accepted { contract_id, .. } => {
                    eprintln!("{} contract {}", "Offer accepted:".green().bold(), contract_id);
                }
                NegotiationOutcome::Rejected { acceptance_chance, .. } => {
                    eprintln!(
                        "{} acceptance chance was {:.1}%",
                        "Offer rejected:".yellow().bold(),
                        acceptance_chance * 100.0
                    );
                }
            }
            print_json(&outcome)?;
        }
        Commands::Restructure { contract_id, amount } => {
            print_json(&lifecycle.restructure_contract(ContractId(*contract_id), *amount).await?)?;
        }
        Commands::Release { contract_id, post_june_1 } => {
            print_json(&lifecycle.release_player(ContractId(*contract_id), *post_june_1).await?)?;
        }
        Commands::Tag { player_id, team_id } => {
            print_json(&lifecycle.franchise_tag(*player_id, *team_id).await?)?;
        }
        Commands::TradeValue { player_id } => {
            let player = lifecycle
                .players()
                .get_player(*player_id)
                .await?
                .with_context(|| format!("Player not found: {player_id}"))?;
            print_json(&lifecycle.valuation().trade_value(&player)?)?;
        }
    }

    if cli.command.is_mutating() && state.persist().await? {
        eprintln!("{}", "Ledger written back to seed file".dimmed());
    }

    Ok(())
}
