//! The inference loop: a dedicated thread that pulls samples from a
//! [`LandmarkSource`], runs the [`GestureInterpreter`], and publishes each
//! snapshot to the render loop.
//!
//! Snapshots travel as whole `Arc<GestureState>` values over an `mpsc`
//! channel.  The reader never sees a half-updated state; it drains the
//! channel each frame and keeps the newest.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hand_gesture::{GestureInterpreter, GestureState};
use tracing::{debug, info, warn};

use crate::source::{LandmarkSource, SourceError};

/// How long `stop()` waits for the thread before detaching it.
const STOP_GRACE: Duration = Duration::from_millis(500);

// ════════════════════════════════════════════════════════════════════════════
// InferenceEvent: sent to the render loop
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub enum InferenceEvent {
    /// The source opened; snapshots follow.
    Ready,
    /// The source failed to open.  No snapshots will follow.
    Unavailable(String),
    /// A freshly computed gesture snapshot.
    Snapshot(Arc<GestureState>),
    /// The source ran out of samples; the last snapshot stands.
    Ended,
}

// ════════════════════════════════════════════════════════════════════════════
// InferenceLoop: handle to the inference thread
// ════════════════════════════════════════════════════════════════════════════

pub struct InferenceLoop {
    live:   Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    rx:     Receiver<InferenceEvent>,
}

impl InferenceLoop {
    /// Spawn the inference thread.  `source` is moved onto it and dropped
    /// there when the loop ends.
    pub fn spawn(source: Box<dyn LandmarkSource>) -> Self {
        let live = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel::<InferenceEvent>();

        let thread_live = Arc::clone(&live);
        let handle = thread::Builder::new()
            .name("inference".into())
            .spawn(move || inference_thread(source, thread_live, tx))
            .map_err(|e| warn!("could not spawn inference thread: {}", e))
            .ok();

        InferenceLoop { live, handle, rx }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Drain pending events (non-blocking).  Empty once stopped.
    pub fn drain(&self) -> Vec<InferenceEvent> {
        if !self.is_live() {
            return Vec::new();
        }
        self.rx.try_iter().collect()
    }

    /// Clear the liveness flag and wait briefly for the thread to exit.
    pub fn stop(&mut self) {
        self.live.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else { return };

        let deadline = Instant::now() + STOP_GRACE;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        if handle.is_finished() {
            let _ = handle.join();
            debug!("inference thread joined");
        } else {
            warn!("inference thread still blocked in its source; detaching");
        }
    }
}

impl Drop for InferenceLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// inference_thread: the actual loop
// ════════════════════════════════════════════════════════════════════════════

fn inference_thread(
    mut source: Box<dyn LandmarkSource>,
    live:       Arc<AtomicBool>,
    tx:         Sender<InferenceEvent>,
) {
    let publish = |event: InferenceEvent| -> bool {
        live.load(Ordering::Acquire) && tx.send(event).is_ok()
    };

    if let Err(e) = source.open() {
        warn!("{}; continuing with no hand", e);
        publish(InferenceEvent::Unavailable(e.to_string()));
        return;
    }
    info!("landmark source ready");
    if !publish(InferenceEvent::Ready) { return; }

    let mut interpreter = GestureInterpreter::new();

    while live.load(Ordering::Acquire) {
        let sample = match source.detect() {
            Ok(s) => s,
            Err(SourceError::Closed) => {
                info!("landmark source closed after {} frames", interpreter.state().frame);
                publish(InferenceEvent::Ended);
                return;
            }
            Err(e) => {
                warn!("{}; stopping inference", e);
                publish(InferenceEvent::Ended);
                return;
            }
        };

        let state = interpreter.update(sample.as_deref());
        if !publish(InferenceEvent::Snapshot(Arc::new(state))) {
            break;
        }
    }

    debug!("inference loop exiting");
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{synthesize_hand, FingerCount, FingerStates, Point3};
    use std::collections::VecDeque;

    /// Plays back a fixed list of samples, then either closes or idles.
    struct ScriptedSource {
        frames:    VecDeque<Option<Vec<Point3>>>,
        fail_open: bool,
        idle:      bool,
    }

    impl ScriptedSource {
        fn new(frames: Vec<Option<Vec<Point3>>>) -> Self {
            ScriptedSource { frames: frames.into(), fail_open: false, idle: false }
        }
    }

    impl LandmarkSource for ScriptedSource {
        fn open(&mut self) -> Result<(), SourceError> {
            if self.fail_open {
                Err(SourceError::Unavailable("no camera".into()))
            } else {
                Ok(())
            }
        }

        fn detect(&mut self) -> Result<Option<Vec<Point3>>, SourceError> {
            match self.frames.pop_front() {
                Some(f) => Ok(f),
                None if self.idle => {
                    thread::sleep(Duration::from_millis(2));
                    Ok(None)
                }
                None => Err(SourceError::Closed),
            }
        }
    }

    fn collect_until_ended(lp: &InferenceLoop) -> Vec<InferenceEvent> {
        let mut out = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            let batch = lp.drain();
            let ended = batch.iter().any(|e| matches!(
                e, InferenceEvent::Ended | InferenceEvent::Unavailable(_)
            ));
            out.extend(batch);
            if ended { break; }
            thread::sleep(Duration::from_millis(2));
        }
        out
    }

    fn hand(n: usize) -> Option<Vec<Point3>> {
        Some(synthesize_hand(Point3::new(0.5, 0.5, 0.0), FingerStates::first(n)))
    }

    #[test]
    fn publishes_ready_then_snapshots_then_ended() {
        let lp = InferenceLoop::spawn(Box::new(ScriptedSource::new(vec![hand(1), None, hand(3)])));
        let events = collect_until_ended(&lp);

        assert!(matches!(events.first(), Some(InferenceEvent::Ready)));
        assert!(matches!(events.last(), Some(InferenceEvent::Ended)));

        let counts: Vec<FingerCount> = events.iter().filter_map(|e| match e {
            InferenceEvent::Snapshot(s) => Some(s.finger_count),
            _ => None,
        }).collect();
        assert_eq!(counts, vec![FingerCount::One, FingerCount::Zero, FingerCount::Three]);
    }

    #[test]
    fn unavailable_source_sends_one_event() {
        let mut src = ScriptedSource::new(vec![hand(1)]);
        src.fail_open = true;
        let lp = InferenceLoop::spawn(Box::new(src));
        let events = collect_until_ended(&lp);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], InferenceEvent::Unavailable(_)));
    }

    /// Blocks in `detect()` until the test opens the gate.
    struct GatedSource {
        gate: mpsc::Receiver<()>,
    }

    impl LandmarkSource for GatedSource {
        fn open(&mut self) -> Result<(), SourceError> { Ok(()) }

        fn detect(&mut self) -> Result<Option<Vec<Point3>>, SourceError> {
            self.gate.recv().map_err(|_| SourceError::Closed)?;
            Ok(hand(2))
        }
    }

    #[test]
    fn nothing_after_stop() {
        let mut src = ScriptedSource::new(vec![]);
        src.idle = true;
        let mut lp = InferenceLoop::spawn(Box::new(src));
        thread::sleep(Duration::from_millis(20));
        lp.stop();
        assert!(!lp.is_live());
        assert!(lp.drain().is_empty());
    }

    #[test]
    fn sample_finishing_after_stop_is_not_published() {
        let (gate_tx, gate) = mpsc::channel();
        let mut lp = InferenceLoop::spawn(Box::new(GatedSource { gate }));

        // Wait for the thread to open the source and park in detect().
        let ready = lp.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(ready, InferenceEvent::Ready));

        // Release the pending detect() only after stop() has cleared the flag.
        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            let _ = gate_tx.send(());
        });
        lp.stop();
        releaser.join().unwrap();

        // Read the raw channel; drain() would hide anything sent late.
        let late: Vec<InferenceEvent> = lp.rx.try_iter().collect();
        assert!(
            late.iter().all(|e| !matches!(e, InferenceEvent::Snapshot(_))),
            "snapshot published after stop: {:?}", late
        );
    }
}
