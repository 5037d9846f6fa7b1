//! Hex arena - match and tournament runner for the MCTS-RAVE engine
//!
//! Two subcommands:
//! 1. `play` runs one game and prints the board after every move
//! 2. `tournament` runs a series of games, swapping the starting colour for
//!    the second half, and prints (optionally saves) a summary table

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_core::Player;
use tracing::info;

mod agent;
mod arena;
mod config;
mod stats;

use crate::agent::Agent;
use crate::arena::{play_match, run_tournament};
use crate::config::{Cli, Command, Settings};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Build the player 1 and player 2 agents.
fn build_agents(settings: &Settings) -> Result<[Box<dyn Agent>; 2]> {
    let [one, two] = settings.agents()?;
    Ok([
        one.build(&settings.mcts_config_for_seat(0)?)?,
        two.build(&settings.mcts_config_for_seat(1)?)?,
    ])
}

fn run_play(settings: &Settings, first: u8) -> Result<()> {
    let first = Player::from_id(first).ok_or_else(|| anyhow!("invalid first player {first}"))?;
    let mut agents = build_agents(settings)?;
    let names = [agents[0].name().to_string(), agents[1].name().to_string()];
    let [one, two] = &mut agents;

    let record = play_match(
        settings.board_size,
        [&mut **one, &mut **two],
        first,
        |board, ply| {
            let agent = &names[arena::seat(ply.player)];
            println!("{board}");
            println!(
                "Turn {}: {} ({agent}) placed at {} in {:.2}s\n",
                ply.number,
                ply.player,
                ply.mv,
                ply.think_time.as_secs_f64()
            );
        },
    )?;

    println!(
        "{} ({}) wins after {} moves",
        record.winner,
        names[arena::seat(record.winner)],
        record.plies.len()
    );
    Ok(())
}

fn run_tournament_command(settings: &Settings, games: u32, summary_path: Option<String>) -> Result<()> {
    let mut agents = build_agents(settings)?;
    let summary = run_tournament(settings.board_size, games, &mut agents)?;

    println!("\nTournament Results:");
    print!("{}", summary.render_table());

    if let Some(path) = summary_path {
        summary.write_json(Path::new(&path))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    config::init_central_config()?;
    let cli = Cli::parse();
    cli.validate()?;

    init_tracing(&cli.settings.log_level)?;
    info!(
        board_size = cli.settings.board_size,
        player_one = %cli.settings.player_one,
        player_two = %cli.settings.player_two,
        time_limit_secs = cli.settings.time_limit_secs,
        rave_constant = cli.settings.rave_constant,
        "Hex arena starting"
    );

    match &cli.command {
        Command::Play { first } => run_play(&cli.settings, *first),
        Command::Tournament {
            games,
            summary_path,
        } => run_tournament_command(
            &cli.settings,
            *games,
            config::summary_path(summary_path.as_deref()),
        ),
    }
}
