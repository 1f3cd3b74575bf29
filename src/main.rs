//! Prize Machine - headless session runner
//!
//! Loads a launch config, spins the three reels once against a logging
//! scene, plays the outcome presentation and prints the stage trace.

mod report;
mod scene;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;

use pm_game::{
    AlwaysWin, AssetTasks, FromConfig, Game, GameLaunchConfig, LogNavigator, MachineBody,
    OutcomePolicy, SharedScene,
};
use pm_slot::{SpinSession, SpinTiming, TimingProfile};
use pm_stage::StageRecorder;

use crate::scene::{LocalAssetLoader, LoggingScene};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Timing {
    Normal,
    Turbo,
    Instant,
}

impl From<Timing> for TimingProfile {
    fn from(timing: Timing) -> Self {
        match timing {
            Timing::Normal => TimingProfile::Normal,
            Timing::Turbo => TimingProfile::Turbo,
            Timing::Instant => TimingProfile::Instant,
        }
    }
}

#[derive(Parser)]
#[command(name = "prize-machine", about = "Run one Prize Machine session")]
struct Cli {
    /// Launch config (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force a win regardless of the config
    #[arg(long, conflicts_with = "lose")]
    win: bool,

    /// Force a loss regardless of the config
    #[arg(long)]
    lose: bool,

    /// Spin timing
    #[arg(short, long, value_enum, default_value = "normal")]
    timing: Timing,

    /// Seed for the blurred symbol picker
    #[arg(long)]
    seed: Option<u64>,

    /// Directory tile textures are resolved against
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Pointer-down to simulate after the presentation, as X,Y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    click: Vec<(f64, f64)>,

    /// Print the trace as JSON
    #[arg(long)]
    json: bool,
}

fn parse_point(value: &str) -> Result<(f64, f64)> {
    let Some((x, y)) = value.split_once(',') else {
        bail!("expected X,Y, got {:?}", value);
    };
    Ok((x.trim().parse()?, y.trim().parse()?))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameLaunchConfig::from_path(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => GameLaunchConfig::default(),
    };
    if cli.lose {
        config.has_won = false;
    }

    let policy: Box<dyn OutcomePolicy> = if cli.win {
        Box::new(AlwaysWin)
    } else {
        Box::new(FromConfig)
    };

    let timing = SpinTiming::from_profile(cli.timing.into());
    let mut recorder = StageRecorder::new(uuid::Uuid::new_v4().to_string(), "prize-machine")
        .with_metadata("timing", timing.profile.name())
        .with_metadata("outcome_policy", policy.name());
    if let Some(seed) = cli.seed {
        recorder = recorder.with_metadata("seed", seed);
    }

    let mut session = SpinSession::new(timing.clone(), recorder);
    if let Some(seed) = cli.seed {
        session = session.with_seed(seed);
    }

    let mut scene = LoggingScene::new();
    session.build_views(&mut scene);
    let scene: SharedScene = Arc::new(Mutex::new(scene));

    let body = MachineBody::new(scene.clone(), config.is_mega)
        .with_frame_period(timing.frame_period());
    if let Err(err) = body.build() {
        log::warn!("Machine body degraded: {}", err);
    }

    let mut assets: AssetTasks = AssetTasks::for_config(&config, "");
    assets.load_all(&mut LocalAssetLoader { root: cli.assets });

    log::info!("Starting Prize Machine ({:?} timing)...", cli.timing);
    let mut game = Game::new(config, session, Box::new(body), scene, Box::new(LogNavigator))
        .with_policy(policy.as_ref())
        .with_assets(assets)
        .with_frame_period(timing.frame_period());

    game.spin().await.context("Spin refused")?;

    for (x, y) in cli.click {
        game.handle_pointer_down(x, y);
    }
    game.stop_presentation();

    let trace = game.recorder().snapshot();
    if cli.json {
        println!("{}", trace.to_json()?);
    } else {
        report::print_trace(&trace, game.report());
    }
    Ok(())
}
