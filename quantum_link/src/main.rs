//! quantum_link: interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use quantum_link::app::{run, AppConfig, SourceKind};
use quantum_link::source::DetectorConfig;

#[derive(Parser, Debug)]
#[command(
    name = "quantum_link",
    version,
    about = "Grab and move voxel cubes by holding up fingers"
)]
struct Cli {
    /// Replay a recorded JSON-lines session instead of the simulator
    #[arg(long, value_name = "FILE", conflicts_with = "detector")]
    replay: Option<PathBuf>,

    /// Replay speed in frames per second
    #[arg(long, default_value_t = 30.0)]
    replay_fps: f32,

    /// External landmark detector that prints READY, then one JSON detection per line
    #[arg(long, value_name = "PROGRAM")]
    detector: Option<String>,

    /// Extra arguments for the detector, after `--`
    #[arg(last = true)]
    detector_args: Vec<String>,

    /// Minimum hand detection confidence
    #[arg(long, default_value_t = 0.75)]
    min_detection_confidence: f32,

    /// Minimum landmark tracking confidence
    #[arg(long, default_value_t = 0.75)]
    min_tracking_confidence: f32,

    /// Hide the slot tiles and coordinate readout
    #[arg(long)]
    no_hud: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let source = match (self.replay, self.detector) {
            (Some(path), _) => SourceKind::Replay { path, fps: self.replay_fps },
            (None, Some(program)) => SourceKind::Detector { program, args: self.detector_args },
            (None, None) => SourceKind::Simulation,
        };
        AppConfig {
            source,
            detector: DetectorConfig {
                min_detection_confidence: self.min_detection_confidence.clamp(0.0, 1.0),
                min_tracking_confidence:  self.min_tracking_confidence.clamp(0.0, 1.0),
                ..DetectorConfig::default()
            },
            show_hud: !self.no_hud,
            ..AppConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantum_link=info,hand_gesture=info".into()),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Quantum Link — Finger-Count Voxel Controller          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let cfg = cli.into_config();
    match &cfg.source {
        SourceKind::Simulation => {
            println!("  Mode: Keyboard/mouse simulation  (0-4 fingers, H hide, wheel depth)");
        }
        SourceKind::Replay { path, fps } => {
            println!("  Mode: Replay {}  @ {} fps", path.display(), fps);
        }
        SourceKind::Detector { program, .. } => {
            println!("  Mode: External detector  ({})", program);
        }
    }
    println!();

    info!("quantum_link v{} starting", env!("CARGO_PKG_VERSION"));
    run(cfg).context("visualizer failed")?;
    info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_simulation() {
        let cfg = Cli::parse_from(["quantum_link"]).into_config();
        assert_eq!(cfg.source, SourceKind::Simulation);
        assert!(cfg.show_hud);
        assert_eq!(cfg.detector, DetectorConfig::default());
    }

    #[test]
    fn detector_with_trailing_args() {
        let cfg = Cli::parse_from([
            "quantum_link", "--detector", "python3", "--min-detection-confidence", "0.6",
            "--", "hands.py", "--camera", "1",
        ]).into_config();
        assert_eq!(cfg.source, SourceKind::Detector {
            program: "python3".into(),
            args: vec!["hands.py".into(), "--camera".into(), "1".into()],
        });
        assert_eq!(cfg.detector.min_detection_confidence, 0.6);
        assert_eq!(cfg.detector.max_hands, 1);
    }

    #[test]
    fn replay_and_detector_conflict() {
        assert!(Cli::try_parse_from([
            "quantum_link", "--replay", "a.jsonl", "--detector", "x",
        ]).is_err());
    }

    #[test]
    fn replay_fps_and_no_hud() {
        let cfg = Cli::parse_from([
            "quantum_link", "--replay", "s.jsonl", "--replay-fps", "60", "--no-hud",
        ]).into_config();
        assert_eq!(cfg.source, SourceKind::Replay { path: "s.jsonl".into(), fps: 60.0 });
        assert!(!cfg.show_hud);
    }
}
