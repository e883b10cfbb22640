//! Landmark sources: hand detectors, recorded sessions, and keyboard/mouse
//! simulation.
//!
//! Every source implements [`LandmarkSource`].  The inference loop doesn't
//! need to know whether samples came from a live detector, a replay file, or
//! the simulator.  Samples are passed on untouched; validation happens in the
//! interpreter.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use hand_gesture::{synthesize_hand, FingerStates, Point3};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not start (camera, model, or file missing).
    #[error("landmark source unavailable: {0}")]
    Unavailable(String),

    #[error("landmark source I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source has no more samples.
    #[error("landmark source closed")]
    Closed,
}

/// Anything that produces one hand's landmarks per inference cycle.
pub trait LandmarkSource: Send + 'static {
    /// Acquire resources.  Called once, on the inference thread, before the
    /// first `detect`.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Block until the next inference cycle completes.
    ///
    /// `Ok(None)` means no hand was seen this cycle.
    fn detect(&mut self) -> Result<Option<Vec<Point3>>, SourceError>;
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorConfig: init-time policy for real detectors
// ════════════════════════════════════════════════════════════════════════════

/// Detection policy handed to the detector at start-up.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    pub max_hands:                usize,
    pub model_complexity:         u8,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            max_hands:                1,
            model_complexity:         1,
            min_detection_confidence: 0.75,
            min_tracking_confidence:  0.75,
        }
    }
}

impl DetectorConfig {
    /// Command-line form understood by the detector helper.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--max-hands".into(),                self.max_hands.to_string(),
            "--model-complexity".into(),         self.model_complexity.to_string(),
            "--min-detection-confidence".into(), self.min_detection_confidence.to_string(),
            "--min-tracking-confidence".into(),  self.min_tracking_confidence.to_string(),
        ]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JSON-lines detection protocol
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default = "full_score")]
    score: f32,
    #[serde(default)]
    handedness: Option<String>,
    landmarks: Vec<Point3>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

fn full_score() -> f32 { 1.0 }

/// Decode one detection line into at most one hand.
///
/// Lines that fail to parse or report an error are treated as "no hand".
/// Only the first hand at or above `min_score` is kept.
pub fn decode_detection(line: &str, min_score: f32) -> Option<Vec<Point3>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let result: DetectionJson = match serde_json::from_str(line) {
        Ok(r)  => r,
        Err(e) => {
            debug!("undecodable detection line: {}", e);
            return None;
        }
    };
    if let Some(err) = result.error {
        warn!("detector reported: {}", err);
        return None;
    }
    let hand = result.hands.into_iter().find(|h| h.score >= min_score)?;
    debug!(
        score = hand.score,
        handedness = hand.handedness.as_deref().unwrap_or("?"),
        points = hand.landmarks.len(),
        "hand detected"
    );
    Some(hand.landmarks)
}

/// Reads detections, one JSON object per line, from any buffered reader.
///
/// ```text
/// {"hands":[{"score":0.93,"handedness":"Right","landmarks":[{"x":0.5,"y":0.5,"z":0.0}, ...]}]}
/// {"hands":[]}
/// ```
///
/// With `pace` set, successive detections are spaced at least that far apart
/// (used for replaying recordings in real time).
pub struct JsonLinesSource<R> {
    reader:    R,
    min_score: f32,
    pace:      Option<Duration>,
    last:      Option<Instant>,
    line:      String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, min_score: f32) -> Self {
        JsonLinesSource { reader, min_score, pace: None, last: None, line: String::new() }
    }

    pub fn paced(mut self, fps: f32) -> Self {
        self.pace = (fps.is_finite() && fps > 0.0).then(|| Duration::from_secs_f32(1.0 / fps));
        self
    }

    fn wait_for_pace(&mut self) {
        if let (Some(pace), Some(last)) = (self.pace, self.last) {
            let elapsed = last.elapsed();
            if elapsed < pace {
                thread::sleep(pace - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }

    fn next_detection(&mut self) -> Result<Option<Vec<Point3>>, SourceError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err(SourceError::Closed);
        }
        self.wait_for_pace();
        Ok(decode_detection(&self.line, self.min_score))
    }
}

impl<R: BufRead + Send + 'static> LandmarkSource for JsonLinesSource<R> {
    fn open(&mut self) -> Result<(), SourceError> { Ok(()) }

    fn detect(&mut self) -> Result<Option<Vec<Point3>>, SourceError> {
        self.next_detection()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource: a recorded session on disk
// ════════════════════════════════════════════════════════════════════════════

/// Replays a JSON-lines recording at a fixed frame rate.
pub struct ReplaySource {
    path:      PathBuf,
    fps:       f32,
    min_score: f32,
    lines:     Option<JsonLinesSource<BufReader<File>>>,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>, fps: f32, min_score: f32) -> Self {
        ReplaySource { path: path.into(), fps, min_score, lines: None }
    }
}

impl LandmarkSource for ReplaySource {
    fn open(&mut self) -> Result<(), SourceError> {
        let file = File::open(&self.path).map_err(|e| {
            SourceError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        info!("replaying {} at {} fps", self.path.display(), self.fps);
        self.lines = Some(JsonLinesSource::new(BufReader::new(file), self.min_score).paced(self.fps));
        Ok(())
    }

    fn detect(&mut self) -> Result<Option<Vec<Point3>>, SourceError> {
        self.lines.as_mut().ok_or(SourceError::Closed)?.next_detection()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorProcess: external landmark model over a pipe
// ════════════════════════════════════════════════════════════════════════════

/// Runs an external detector (for example a MediaPipe helper script) that
/// owns the camera and prints one JSON detection per frame.
///
/// The helper must print `READY` once its model is loaded, within the
/// handshake timeout.  The child is killed when the source is dropped, or
/// as soon as the handshake fails.
pub struct DetectorProcess {
    program: String,
    args:    Vec<String>,
    policy:  DetectorConfig,
    handshake_timeout: Duration,
    child:   Option<Child>,
    lines:   Option<JsonLinesSource<BufReader<ChildStdout>>>,
}

/// Model loading can take a while on a cold start.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(20);

impl DetectorProcess {
    pub fn new(program: impl Into<String>, args: Vec<String>, policy: DetectorConfig) -> Self {
        DetectorProcess {
            program: program.into(),
            args,
            policy,
            handshake_timeout: HANDSHAKE_TIMEOUT,
            child: None,
            lines: None,
        }
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Read the `READY` line on a helper thread so a silent detector can't
    /// block `open()` past the timeout.
    fn handshake(&mut self, stdout: ChildStdout) -> Result<BufReader<ChildStdout>, SourceError> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("detector-handshake".into())
            .spawn(move || {
                let mut reader = BufReader::new(stdout);
                let mut line = String::new();
                let res = reader.read_line(&mut line).map(|_| line);
                let _ = tx.send((reader, res));
            })?;

        match rx.recv_timeout(self.handshake_timeout) {
            Ok((reader, Ok(line))) if line.trim() == "READY" => Ok(reader),
            Ok((_, Ok(line))) => Err(SourceError::Unavailable(format!(
                "detector did not signal READY (got {:?})", line.trim()
            ))),
            Ok((_, Err(e))) => Err(SourceError::Io(e)),
            Err(_) => Err(SourceError::Unavailable(format!(
                "detector did not signal READY within {:?}", self.handshake_timeout
            ))),
        }
    }

    fn kill_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            debug!("detector process reaped");
        }
    }
}

impl LandmarkSource for DetectorProcess {
    fn open(&mut self) -> Result<(), SourceError> {
        info!("starting detector: {} {}", self.program, self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(self.policy.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", self.program, e)))?;

        let stdout = match child.stdout.take() {
            Some(s) => s,
            None    => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SourceError::Unavailable("detector stdout not captured".into()));
            }
        };
        self.child = Some(child);

        match self.handshake(stdout) {
            Ok(reader) => {
                info!("detector ready");
                self.lines = Some(JsonLinesSource::new(reader, self.policy.min_detection_confidence));
                Ok(())
            }
            Err(e) => {
                self.kill_child();
                Err(e)
            }
        }
    }

    fn detect(&mut self) -> Result<Option<Vec<Point3>>, SourceError> {
        self.lines.as_mut().ok_or(SourceError::Closed)?.next_detection()
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        self.kill_child();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    KeyDown(SimKey),
    /// Pointer position, normalized to the window (0..1 on both axes).
    PointerMoved { x: f32, y: f32 },
    /// Scroll-wheel delta; positive moves the hand toward the camera.
    Depth(f32),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    /// Hold up the first `n` fingers (0 = fist, 4 = open hand minus thumb).
    Fingers(u8),
    /// Show / hide the hand.
    ToggleHand,
    Quit,
}

/// Capture cadence of the simulator.
const SIM_PERIOD: Duration = Duration::from_millis(16);
/// Depth travel per scroll unit, in normalized units.
const SIM_DEPTH_STEP: f32 = 0.02;
const SIM_DEPTH_LIMIT: f32 = 0.3;

/// Landmark source driven by [`SimInput`] events from the visualizer window.
///
/// The visualizer sends `SimInput` events here; this source turns the
/// current pose into a synthetic hand every ~16 ms.
pub struct SimLandmarkSource {
    rx:      Receiver<SimInput>,
    palm:    Point3,
    fingers: FingerStates,
    visible: bool,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimLandmarkSource {
            rx,
            palm:    Point3::new(0.5, 0.5, 0.0),
            fingers: FingerStates::first(1),
            visible: true,
        }
    }

    /// Apply one input.  Returns false on quit.
    fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::KeyDown(SimKey::Fingers(n)) => {
                self.fingers = FingerStates::first(n as usize);
                self.visible = true;
            }
            SimInput::KeyDown(SimKey::ToggleHand) => self.visible = !self.visible,
            SimInput::KeyDown(SimKey::Quit)       => return false,
            SimInput::PointerMoved { x, y } => {
                self.palm.x = x.clamp(0.0, 1.0);
                self.palm.y = y.clamp(0.0, 1.0);
            }
            SimInput::Depth(d) => {
                self.palm.z = (self.palm.z - d * SIM_DEPTH_STEP)
                    .clamp(-SIM_DEPTH_LIMIT, SIM_DEPTH_LIMIT);
            }
        }
        true
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn open(&mut self) -> Result<(), SourceError> {
        info!("simulated hand ready");
        Ok(())
    }

    fn detect(&mut self) -> Result<Option<Vec<Point3>>, SourceError> {
        let deadline = Instant::now() + SIM_PERIOD;
        loop {
            let now = Instant::now();
            if now >= deadline { break; }
            match self.rx.recv_timeout(deadline - now) {
                Ok(input) => {
                    if !self.apply(input) { return Err(SourceError::Closed); }
                }
                Err(RecvTimeoutError::Timeout)      => break,
                Err(RecvTimeoutError::Disconnected) => return Err(SourceError::Closed),
            }
        }
        Ok(self.visible.then(|| synthesize_hand(self.palm, self.fingers)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
