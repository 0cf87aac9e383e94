use algorithm::Centerline;
use clap::{CommandFactory, Parser};
use common::race_config::RaceConfig;
use detection::{
    constant_source::{ConstantDetectionModule, SimulationConfig},
    replay_source::ReplayDetectionModule,
};
use leaderboard::LeaderboardModule;
use module_core::{Event, EventBus, EventKind, Module};
use race_control::RaceModule;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Race configuration in JSON format.
    #[arg(short, long, default_value = "assets/race.json")]
    config: PathBuf,
    /// Drive the configured vehicles around the track at constant speed.
    #[arg(short, long)]
    simulate: bool,
    /// Replay recorded marker detections from a CSV file.
    #[arg(short, long)]
    replay: Option<PathBuf>,
    #[arg(long, default_value_t = 33)]
    frame_interval_ms: u64,
    /// Random detection offset of the simulation in pixels.
    #[arg(long, default_value_t = 0.0)]
    jitter: f64,
    /// Only register the vehicles, the countdown is not started.
    #[arg(long)]
    no_autostart: bool,
}

fn load_config(cli: &Cli) -> Result<Arc<RaceConfig>, ()> {
    let config = RaceConfig::from_file(&cli.config).map_err(|e| {
        error!("Failed to load {}. Error: {e}", cli.config.display());
    })?;
    config.validate().map_err(|e| {
        error!("Invalid race configuration. Error: {e}");
    })?;
    Ok(Arc::new(config))
}

fn create_detection_module(
    eb: &EventBus,
    cli: &Cli,
    config: &RaceConfig,
) -> Result<Box<dyn Module>, ()> {
    let frame_interval = Duration::from_millis(cli.frame_interval_ms);
    if let Some(replay) = &cli.replay {
        let module = ReplayDetectionModule::from_path(eb.context(), replay, frame_interval)
            .map_err(|e| error!("Failed to read {}. Error: {e}", replay.display()))?;
        Ok(Box::new(module))
    } else if cli.simulate {
        let centerline = Centerline::from_track(&config.track)
            .map_err(|e| error!("Failed to create the centerline. Error: {e}"))?;
        let markers: Vec<_> = config.vehicles.iter().map(|v| v.marker_id).collect();
        let simulation = SimulationConfig {
            jitter: cli.jitter,
            frame_interval,
            ..SimulationConfig::default()
        };
        let module = ConstantDetectionModule::new(eb.context(), centerline, &markers, simulation)
            .map_err(|e| error!("Failed to create ConstantDetectionModule. Error: {e}"))?;
        Ok(Box::new(module))
    } else {
        error!("No detection source specified. Use --simulate or --replay");
        let _ = Cli::command().print_help();
        Err(())
    }
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config(&cli)?;
    let eb = EventBus::default();
    let mut detection = create_detection_module(&eb, &cli, &config)?;
    let mut race = RaceModule::new(eb.context(), config.clone())
        .map_err(|e| error!("Failed to create RaceModule. Error: {e}"))?;
    let mut leaderboard = LeaderboardModule::new(eb.context());

    let quit_sender = eb.context().sender;
    ctrlc::set_handler(move || {
        let _ = quit_sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .map_err(|e| error!("Failed to install the Ctrl-C handler. Error: {e}"))?;

    if !cli.no_autostart {
        eb.publish(&EventKind::StartCountdownEvent.into());
    }

    info!(
        "Starting race on {} with {} vehicles",
        config.track.name,
        config.vehicles.len()
    );
    let (race_result, _, _) = tokio::join!(race.run(), leaderboard.run(), detection.run());
    race_result
}
