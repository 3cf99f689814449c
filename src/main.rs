//! Neon Pong entry point
//!
//! Runs headless matches: the render pass draws into a command recorder and
//! sound cues go to the log. A windowing backend would supply its own
//! `Canvas`, `SoundSink` and input thread instead.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use neon_pong::Settings;
use neon_pong::audio::ChannelSoundSink;
use neon_pong::net::{self, HostHandle};
use neon_pong::platform::InputMailbox;
use neon_pong::renderer::CommandRecorder;
use neon_pong::runner::GameLoop;
use neon_pong::sim::{Field, GameMode, GameState};

#[derive(Debug, Parser)]
#[command(name = "neon-pong", version, about = "Neon two-paddle arcade game")]
struct Cli {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Watch the computer play itself until someone wins
    Demo {
        /// Run ticks back to back instead of at the configured rate
        #[arg(long)]
        unpaced: bool,
    },
    /// Announce this machine on the LAN and wait for a peer
    Host,
    /// Find a host on the LAN (or use the given address) and connect
    Join {
        #[arg(long)]
        host: Option<IpAddr>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let seed = cli
        .seed
        .or(settings.seed)
        .unwrap_or_else(rand::random::<u64>);

    log::info!("Neon Pong starting (seed {})", seed);

    match cli.command.unwrap_or(Command::Demo { unpaced: false }) {
        Command::Demo { unpaced } => run_match(&settings, GameMode::VsAi, seed, unpaced),
        Command::Host => host(&settings, seed),
        Command::Join { host } => join(&settings, host, seed),
    }
}

fn host(settings: &Settings, seed: u64) -> anyhow::Result<()> {
    let mut host = HostHandle::start(&settings.discovery)?;
    println!(
        "Hosting on {} (discovery {}), waiting for a player...",
        host.game_addr(),
        host.discovery_addr()
    );
    let connection = loop {
        if let Some(connection) = host.wait_for_connection(Duration::from_secs(1)) {
            break connection;
        }
    };
    host.stop();
    println!("Player joined from {}", connection.peer);
    run_match(settings, GameMode::LanMultiplayer, seed, false)
}

fn join(settings: &Settings, host: Option<IpAddr>, seed: u64) -> anyhow::Result<()> {
    let target = match host {
        Some(ip) => ip,
        None => {
            let local = net::local_ipv4().context("no LAN address to search from")?;
            println!("Searching for hosts from {}...", local);
            let hosts = net::find_hosts(local, &settings.discovery);
            let Some(&first) = hosts.first() else {
                bail!("no hosts found on the local network");
            };
            for ip in &hosts {
                println!("  found {}", ip);
            }
            first
        }
    };
    let stream = net::connect(target, &settings.discovery)?;
    println!("Connected to {}", stream.peer_addr()?);
    run_match(settings, GameMode::LanMultiplayer, seed, false)
}

/// Play one headless match with the autopilot on both paddles
fn run_match(settings: &Settings, mode: GameMode, seed: u64, unpaced: bool) -> anyhow::Result<()> {
    let field = Field::new(settings.field_width, settings.field_height, settings.orientation)?;
    let state = GameState::new(field, mode, settings, seed);

    let input = Arc::new(InputMailbox::new(field, mode));
    input.set_idle_mode(true);

    let (sound, cues) = ChannelSoundSink::new(&settings.audio);
    let audio = thread::spawn(move || {
        for cue in cues {
            log::debug!("Sound {} at volume {:.2}", cue.effect.name(), cue.volume);
        }
    });

    let period = if unpaced {
        Duration::ZERO
    } else {
        settings.tick_period()
    };
    let handle = GameLoop::new(state, input, CommandRecorder::new(), sound, period)
        .stop_on_game_over(true)
        .spawn();

    let state = handle.wait()?;
    // The sink went down with the loop, which ends the cue stream
    if audio.join().is_err() {
        log::warn!("Audio thread panicked");
    }

    let seconds = state.time_ticks as f64 / settings.tick_rate as f64;
    println!(
        "Final score {}-{} after {} ticks ({:.1}s of play)",
        state.matches.home_score(),
        state.matches.away_score(),
        state.time_ticks,
        seconds
    );
    println!("{}", serde_json::to_string_pretty(&state.matches)?);
    Ok(())
}
