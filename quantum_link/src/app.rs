//! Top-level application state machine.
//!
//! `AppState` owns the latest `GestureState` snapshot, the animated
//! `SceneState`, and the source status line.  It processes `InferenceEvent`s
//! and drives the visualizer each frame.

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use hand_gesture::{FingerCount, GestureInterpreter, GestureState};
use thiserror::Error;
use tracing::{debug, info};

use crate::inference::{InferenceEvent, InferenceLoop};
use crate::scene::SceneState;
use crate::source::{
    DetectorConfig, DetectorProcess, LandmarkSource, ReplaySource, SimInput, SimLandmarkSource,
};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where landmark samples come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    /// Keyboard and mouse drive a synthetic hand.
    Simulation,
    /// A recorded JSON-lines session.
    Replay { path: PathBuf, fps: f32 },
    /// An external detector process.
    Detector { program: String, args: Vec<String> },
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source:   SourceKind,
    pub detector: DetectorConfig,
    pub title:    String,
    pub show_hud: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source:   SourceKind::Simulation,
            detector: DetectorConfig::default(),
            title:    "Quantum Link - Hand Tracking Voxels".to_string(),
            show_hud: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not open window: {0}")]
    Window(#[from] minifb::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// Source status
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    Starting,
    Live,
    Unavailable(String),
    Ended,
}

impl SourceStatus {
    pub fn label(&self) -> &str {
        match self {
            SourceStatus::Starting       => "STARTING",
            SourceStatus::Live           => "LIVE",
            SourceStatus::Unavailable(_) => "NO CAMERA",
            SourceStatus::Ended          => "ENDED",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    gesture:       Arc<GestureState>,
    scene:         SceneState,
    source_status: SourceStatus,

    // ── status message ────────────────────────────────────────────────────
    pub status:    String,
}

impl AppState {
    pub fn new() -> Self {
        let initial = GestureInterpreter::new().state().clone();
        AppState {
            scene:         SceneState::new(&initial),
            gesture:       Arc::new(initial),
            source_status: SourceStatus::Starting,
            status:        "Waiting for landmark source".to_string(),
        }
    }

    // ── process one InferenceEvent ────────────────────────────────────────

    pub fn handle_event(&mut self, event: InferenceEvent) {
        match event {
            InferenceEvent::Ready => {
                self.source_status = SourceStatus::Live;
                self.status = "Source live - show 1, 2 or 3 fingers to grab a cube".to_string();
            }

            InferenceEvent::Unavailable(reason) => {
                self.status = format!("{} - no hand will be tracked", reason);
                self.source_status = SourceStatus::Unavailable(reason);
            }

            InferenceEvent::Snapshot(next) => {
                if next.finger_count != self.gesture.finger_count {
                    self.status = describe(&next);
                }
                self.gesture = next;
            }

            InferenceEvent::Ended => {
                self.source_status = SourceStatus::Ended;
                self.status = format!(
                    "Source ended after {} frames - last state holds", self.gesture.frame
                );
            }
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, t_ms: f32) {
        self.scene.tick(&self.gesture, t_ms);
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn gesture(&self)       -> &GestureState  { &self.gesture }
    pub fn scene(&self)         -> &SceneState    { &self.scene }
    pub fn source_status(&self) -> &SourceStatus  { &self.source_status }

    /// Status bar text: source state plus the latest message.
    pub fn status_line(&self) -> String {
        format!("[{}] {}", self.source_status.label(), self.status)
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

fn describe(g: &GestureState) -> String {
    match (g.finger_count, g.active_slot()) {
        (_, Some(slot)) => format!("Holding object {:02}", slot.finger_count()),
        (FingerCount::Four, None) => "Four fingers - no object".to_string(),
        _ if !g.hand_detected => "No hand".to_string(),
        _ => "Hand open for a new gesture".to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Source selection
// ════════════════════════════════════════════════════════════════════════════

/// Build the configured source.  The simulation receiver is consumed only
/// for `SourceKind::Simulation`; the returned flag says whether the window
/// should forward input to it.
pub fn build_source(
    cfg:    &AppConfig,
    sim_rx: mpsc::Receiver<SimInput>,
) -> (Box<dyn LandmarkSource>, bool) {
    let min_score = cfg.detector.min_detection_confidence;
    let source: Box<dyn LandmarkSource> = match &cfg.source {
        SourceKind::Simulation => Box::new(SimLandmarkSource::new(sim_rx)),
        SourceKind::Replay { path, fps } => Box::new(ReplaySource::new(path.clone(), *fps, min_score)),
        SourceKind::Detector { program, args } => {
            Box::new(DetectorProcess::new(program.clone(), args.clone(), cfg.detector.clone()))
        }
    };
    (source, cfg.source == SourceKind::Simulation)
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It starts the inference
/// loop on the configured source, opens the visualizer, and drives the
/// event/render loop at ~60 fps until the window closes.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    // ── Source + inference thread ─────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let (source, simulated) = build_source(&cfg, sim_rx);
    let mut inference = InferenceLoop::spawn(source);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(&cfg.title, simulated.then_some(sim_tx))?;
    info!("window open ({:?})", cfg.source);

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new();
    let started = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input → SimInput
        if !vis.poll_input() { break; }

        // 2. Drain inference events
        for event in inference.drain() {
            app.handle_event(event);
        }

        // 3. Per-frame animation
        app.tick(started.elapsed().as_secs_f32() * 1000.0);

        // 4. Render
        vis.render(app.scene(), app.gesture(), &app.status_line(), cfg.show_hud);
    }

    debug!("render loop finished");
    inference.stop();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{synthesize_hand, FingerStates, Point3};

    fn snapshot(n: usize) -> InferenceEvent {
        let mut it = GestureInterpreter::new();
        let pts = synthesize_hand(Point3::new(0.6, 0.4, 0.0), FingerStates::first(n));
        InferenceEvent::Snapshot(Arc::new(it.update(Some(&pts))))
    }

    #[test]
    fn starts_with_home_slots() {
        let app = AppState::new();
        assert_eq!(app.source_status(), &SourceStatus::Starting);
        assert_eq!(app.gesture().frame, 0);
        assert!(app.gesture().slots.iter().all(|s| !s.active));
    }

    #[test]
    fn ready_goes_live() {
        let mut app = AppState::new();
        app.handle_event(InferenceEvent::Ready);
        assert_eq!(app.source_status(), &SourceStatus::Live);
        assert!(app.status_line().starts_with("[LIVE]"));
    }

    #[test]
    fn unavailable_keeps_reason() {
        let mut app = AppState::new();
        app.handle_event(InferenceEvent::Unavailable("no camera".into()));
        assert_eq!(app.source_status(), &SourceStatus::Unavailable("no camera".into()));
        assert!(app.status.contains("no camera"));
    }

    #[test]
    fn snapshot_replaces_gesture() {
        let mut app = AppState::new();
        app.handle_event(snapshot(2));
        assert_eq!(app.gesture().finger_count, FingerCount::Two);
        assert_eq!(app.gesture().active_slot().map(|s| s.id), Some(1));
        assert!(app.status.contains("02"));
    }

    #[test]
    fn tick_activates_cube() {
        let mut app = AppState::new();
        app.handle_event(snapshot(3));
        app.tick(0.0);
        assert!(app.scene().cubes[2].active);
        assert!(!app.scene().cubes[0].active);
    }

    #[test]
    fn ended_holds_last_state() {
        let mut app = AppState::new();
        app.handle_event(snapshot(1));
        app.handle_event(InferenceEvent::Ended);
        assert_eq!(app.source_status(), &SourceStatus::Ended);
        assert_eq!(app.gesture().finger_count, FingerCount::One);
    }

    #[test]
    fn simulation_is_the_default_source() {
        let cfg = AppConfig::default();
        let (_tx, rx) = mpsc::channel();
        let (_, simulated) = build_source(&cfg, rx);
        assert!(simulated);
    }

    #[test]
    fn replay_source_does_not_take_window_input() {
        let cfg = AppConfig {
            source: SourceKind::Replay { path: "session.jsonl".into(), fps: 30.0 },
            ..AppConfig::default()
        };
        let (_tx, rx) = mpsc::channel();
        let (_, simulated) = build_source(&cfg, rx);
        assert!(!simulated);
    }
}
