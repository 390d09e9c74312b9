//! Roadbyte Racer Runner
//!
//! Decodes a track, races it with the lookahead planner and reports the
//! result. Can also record a run, verify a recorded run, or re-encrypt a
//! track for another file name.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use roadbyte::{
    race::{RaceRecord, ReplayMismatch},
    run_race, track_fingerprint, verify_record, CollisionMode, RunnerConfig, ScoringMode,
    TrackGrid, VERSION,
};

#[derive(Parser)]
#[command(name = "roadbyte")]
#[command(version, about = "Decode a Roadbyte Racer track and drive it with the lookahead planner")]
struct Args {
    /// Track file (`.trk` plaintext or `.trk.enc` encrypted)
    track: PathBuf,

    /// JSON runner config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed paired with the track set
    #[arg(long)]
    seed: Option<u64>,

    /// Row width of an encrypted track
    #[arg(long)]
    width: Option<usize>,

    /// Candidate widths tried when no width is known
    #[arg(long, value_delimiter = ',')]
    candidates: Option<Vec<usize>>,

    /// Rows visible to the planner (H)
    #[arg(long)]
    lookahead: Option<usize>,

    /// Planner search depth (D)
    #[arg(long)]
    horizon: Option<usize>,

    /// Starting column
    #[arg(long)]
    start: Option<usize>,

    #[arg(long, value_enum)]
    scoring: Option<ScoringArg>,

    #[arg(long, value_enum)]
    collision: Option<CollisionArg>,

    /// Write a JSON record of the run
    #[arg(long, conflicts_with_all = ["verify", "encrypt"])]
    record: Option<PathBuf>,

    /// Verify a JSON record against the track instead of racing
    #[arg(long, conflicts_with = "encrypt")]
    verify: Option<PathBuf>,

    /// Write the track encrypted under the output's file name
    #[arg(long)]
    encrypt: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScoringArg {
    Movements,
    Dodges,
}

#[derive(Clone, Copy, ValueEnum)]
enum CollisionArg {
    Front,
    Delayed,
}

impl Args {
    /// File config (or defaults) with flag overrides applied.
    fn runner_config(&self) -> Result<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RunnerConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.track.seed = seed;
        }
        if let Some(width) = self.width {
            config.track.width = Some(width);
        }
        if let Some(candidates) = &self.candidates {
            config.track.candidate_widths = candidates.clone();
        }
        if let Some(lookahead) = self.lookahead {
            config.race.lookahead = lookahead;
        }
        if let Some(horizon) = self.horizon {
            config.race.horizon = horizon;
        }
        if let Some(start) = self.start {
            config.race.start_column = start;
        }
        if let Some(scoring) = self.scoring {
            config.race.scoring = match scoring {
                ScoringArg::Movements => ScoringMode::Movements,
                ScoringArg::Dodges => ScoringMode::Dodges,
            };
        }
        if let Some(collision) = self.collision {
            config.race.collision = match collision {
                CollisionArg::Front => CollisionMode::FrontOfWindow,
                CollisionArg::Delayed => CollisionMode::Delayed,
            };
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.runner_config()?;

    info!("Roadbyte Racer v{}", VERSION);

    let grid = config
        .track
        .loader()
        .load(&args.track)
        .with_context(|| format!("loading track {}", args.track.display()))?;

    info!(
        rows = grid.len(),
        width = grid.width(),
        fingerprint = %hex::encode(track_fingerprint(&grid)),
        "track decoded"
    );

    if let Some(output) = &args.encrypt {
        return encrypt(&grid, config.track.seed, output);
    }
    if let Some(record) = &args.verify {
        return verify(&grid, record);
    }

    let result = run_race(&grid, config.race.planner(), &config.race);
    let path: Vec<String> = result.path.iter().map(ToString::to_string).collect();
    println!("{result}");
    println!("PATH:{}", path.join(","));

    if let Some(output) = &args.record {
        let record = RaceRecord::new(&grid, config.race, result);
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(output, json).with_context(|| format!("writing record {}", output.display()))?;
        info!(path = %output.display(), "race recorded");
    }

    Ok(())
}

fn encrypt(grid: &TrackGrid, seed: u64, output: &Path) -> Result<()> {
    let filename = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("output path has no file name")?;

    let asset = roadbyte::TrackCodec::new(seed).encode(grid, &filename)?;
    fs::write(output, &asset).with_context(|| format!("writing {}", output.display()))?;

    info!(path = %output.display(), bytes = asset.len(), seed, "track encrypted");
    Ok(())
}

fn verify(grid: &TrackGrid, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading record {}", path.display()))?;
    let record: RaceRecord = serde_json::from_str(&text).context("parsing record")?;

    match verify_record(grid, &record) {
        Ok(result) => {
            println!("VERIFIED: {result}");
            Ok(())
        }
        Err(mismatch @ ReplayMismatch::TrackMismatch { .. }) => {
            bail!("record was made on another track: {mismatch}")
        }
        Err(mismatch) => bail!("record does not replay: {mismatch}"),
    }
}
