//! Intro driver
//!
//! One task owns the intro state and selects over the frame clock, host
//! inputs, the data-ready signal, the outline load and the fallback timer.
//! Whatever happens to the assets, the overlay is hidden by the fallback.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::camera::{Camera, CameraFlight};
use crate::error::GlobeResult;
use crate::orbit::DragOrbit;
use crate::scene::{load_outline, Outline, GLOBE_RADIUS};

use super::{IntroConfig, IntroFrame, IntroInput, IntroOutcome, IntroPhase, IntroVariant};

/// Host side of a running intro
#[derive(Debug, Clone)]
pub struct IntroHandle {
    inputs: mpsc::UnboundedSender<IntroInput>,
    data_ready: watch::Sender<bool>,
    frames: watch::Receiver<IntroFrame>,
}

impl IntroHandle {
    /// Page data has arrived; the interactive intro may finish
    pub fn signal_data_ready(&self) {
        self.data_ready.send_replace(true);
    }

    /// Returns false once the intro has finished
    pub fn send(&self, input: IntroInput) -> bool {
        self.inputs.send(input).is_ok()
    }

    pub fn frames(&self) -> watch::Receiver<IntroFrame> {
        self.frames.clone()
    }

    pub fn current_frame(&self) -> IntroFrame {
        *self.frames.borrow()
    }
}

#[derive(Debug, Clone)]
pub struct IntroReport {
    pub variant: IntroVariant,
    pub outcome: IntroOutcome,
    pub frames: u64,
    pub final_frame: IntroFrame,
    pub outline: Option<Outline>,
}

pub struct GlobeIntro {
    config: IntroConfig,
    inputs: mpsc::UnboundedReceiver<IntroInput>,
    data_ready: watch::Receiver<bool>,
    frames: watch::Sender<IntroFrame>,
}

impl GlobeIntro {
    pub fn new(config: IntroConfig) -> (Self, IntroHandle) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = watch::channel(false);
        let state = IntroState::new(&config, Instant::now());
        let (frame_tx, frame_rx) = watch::channel(state.frame());

        let intro = Self {
            config,
            inputs: input_rx,
            data_ready: ready_rx,
            frames: frame_tx,
        };
        let handle = IntroHandle {
            inputs: input_tx,
            data_ready: ready_tx,
            frames: frame_rx,
        };
        (intro, handle)
    }

    /// Drive the intro until the overlay is hidden
    #[instrument(skip(self), fields(variant = self.config.variant.as_str()))]
    pub async fn run(self) -> IntroReport {
        let Self {
            config,
            mut inputs,
            mut data_ready,
            frames,
        } = self;

        let mut state = IntroState::new(&config, Instant::now());
        let mut ticker = interval(config.frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let fallback = sleep(config.fallback);
        tokio::pin!(fallback);

        let mut outline_task: Option<JoinHandle<GlobeResult<Outline>>> =
            config.geojson_path.clone().map(|path| {
                tokio::spawn(async move { load_outline(&path, GLOBE_RADIUS).await })
            });
        let mut outline = None;
        let mut inputs_open = true;
        let mut ready_open = true;
        state.ready = *data_ready.borrow_and_update();

        let outcome = loop {
            tokio::select! {
                () = &mut fallback => {
                    warn!(phase = ?state.phase, "Intro fallback fired, hiding overlay");
                    state.hide();
                    break IntroOutcome::FallbackHidden;
                }
                _ = ticker.tick() => {
                    state.frames += 1;
                    if state.advance(&config, Instant::now()) {
                        break IntroOutcome::Completed;
                    }
                }
                changed = data_ready.changed(), if ready_open && !state.ready => {
                    match changed {
                        Ok(()) => {
                            state.ready = *data_ready.borrow_and_update();
                            debug!(ready = state.ready, "Data ready signal");
                        }
                        Err(_) => ready_open = false,
                    }
                }
                input = inputs.recv(), if inputs_open => match input {
                    Some(input) => state.apply(input),
                    None => inputs_open = false,
                },
                joined = join_outline(&mut outline_task), if outline_task.is_some() => {
                    outline_task = None;
                    match joined {
                        Ok(Ok(loaded)) => {
                            state.outline_loaded = true;
                            outline = Some(loaded);
                        }
                        Ok(Err(e)) => warn!(error = %e, "Outline unavailable, continuing without it"),
                        Err(e) => warn!(error = %e, "Outline task failed"),
                    }
                }
            }
            frames.send_replace(state.frame());
        };

        if let Some(task) = outline_task {
            task.abort();
        }
        let final_frame = state.frame();
        frames.send_replace(final_frame);
        info!(outcome = ?outcome, frames = state.frames, "Intro finished");

        IntroReport {
            variant: config.variant,
            outcome,
            frames: state.frames,
            final_frame,
            outline,
        }
    }
}

async fn join_outline(
    task: &mut Option<JoinHandle<GlobeResult<Outline>>>,
) -> Result<GlobeResult<Outline>, tokio::task::JoinError> {
    match task {
        Some(task) => task.await,
        None => std::future::pending().await,
    }
}

struct IntroState {
    variant: IntroVariant,
    phase: IntroPhase,
    phase_started: Instant,
    flight: CameraFlight,
    deep_zoom: CameraFlight,
    camera: Camera,
    orbit: DragOrbit,
    overlay_opacity: f64,
    overlay_visible: bool,
    outline_loaded: bool,
    ready: bool,
    frames: u64,
}

impl IntroState {
    fn new(config: &IntroConfig, now: Instant) -> Self {
        Self {
            variant: config.variant,
            phase: IntroPhase::Flying,
            phase_started: now,
            flight: CameraFlight::new(config.far_distance, config.near_distance, config.flight),
            deep_zoom: CameraFlight::new(
                config.near_distance,
                config.deep_zoom_distance,
                config.deep_zoom,
            ),
            camera: Camera::new(config.far_distance, config.viewport),
            orbit: DragOrbit::default(),
            overlay_opacity: 1.0,
            overlay_visible: true,
            outline_loaded: false,
            ready: false,
            frames: 0,
        }
    }

    /// Step the animation; true once the overlay is hidden
    fn advance(&mut self, config: &IntroConfig, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.phase_started);
        match self.phase {
            IntroPhase::Flying => {
                self.camera.distance = self.flight.distance_at(elapsed);
                if self.variant == IntroVariant::Crossfade {
                    self.overlay_opacity = 1.0 - self.flight.eased(elapsed);
                }
                if self.flight.is_finished(elapsed) {
                    self.camera.distance = config.near_distance;
                    if self.variant == IntroVariant::Interactive {
                        self.enter(IntroPhase::Orbiting, now);
                    } else {
                        self.hide();
                        return true;
                    }
                }
            }
            IntroPhase::Orbiting => {
                if self.ready {
                    self.orbit.pointer_up();
                    self.enter(IntroPhase::DeepZoom, now);
                }
            }
            IntroPhase::DeepZoom => {
                self.camera.distance = self.deep_zoom.distance_at(elapsed);
                self.overlay_opacity = 1.0 - self.deep_zoom.eased(elapsed);
                if self.deep_zoom.is_finished(elapsed) {
                    self.camera.distance = config.deep_zoom_distance;
                    self.hide();
                    return true;
                }
            }
            IntroPhase::Hidden => return true,
        }
        false
    }

    fn apply(&mut self, input: IntroInput) {
        match input {
            IntroInput::Resize { width, height } => self.camera.resize(width, height),
            // only the orbiting phase is interactive
            _ if self.phase != IntroPhase::Orbiting => {}
            IntroInput::PointerDown { x, y } => self.orbit.pointer_down(x, y),
            IntroInput::PointerMove { x, y } => self.orbit.pointer_move(x, y),
            IntroInput::PointerUp => self.orbit.pointer_up(),
        }
    }

    fn enter(&mut self, phase: IntroPhase, now: Instant) {
        debug!(from = ?self.phase, to = ?phase, "Intro phase change");
        self.phase = phase;
        self.phase_started = now;
    }

    fn hide(&mut self) {
        self.phase = IntroPhase::Hidden;
        self.overlay_opacity = 0.0;
        self.overlay_visible = false;
    }

    fn frame(&self) -> IntroFrame {
        IntroFrame {
            phase: self.phase,
            distance: self.camera.distance,
            aspect: self.camera.aspect,
            yaw: self.orbit.yaw,
            pitch: self.orbit.pitch,
            overlay_opacity: self.overlay_opacity,
            overlay_visible: self.overlay_visible,
            outline_loaded: self.outline_loaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const EPS: f64 = 1e-9;

    #[tokio::test(start_paused = true)]
    async fn test_landing_flies_in_then_hides() {
        let config = IntroConfig::new(IntroVariant::Landing);
        let (intro, handle) = GlobeIntro::new(config);
        let started = Instant::now();

        let report = intro.run().await;

        assert_eq!(report.outcome, IntroOutcome::Completed);
        assert_eq!(report.final_frame.phase, IntroPhase::Hidden);
        assert!(!report.final_frame.overlay_visible);
        assert!((report.final_frame.distance - 3.0).abs() < EPS);
        assert!(started.elapsed() >= Duration::from_millis(2_500));
        assert!(started.elapsed() < Duration::from_millis(8_000));
        assert!(report.frames > 100);
        assert_eq!(handle.current_frame().phase, IntroPhase::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_crossfade_fades_overlay_during_flight() {
        let (intro, handle) = GlobeIntro::new(IntroConfig::new(IntroVariant::Crossfade));
        let task = tokio::spawn(intro.run());

        sleep(Duration::from_millis(1_250)).await;
        let mid = handle.current_frame();
        assert_eq!(mid.phase, IntroPhase::Flying);
        assert!(mid.overlay_opacity > 0.05 && mid.overlay_opacity < 0.3, "{mid:?}");
        assert!(mid.distance < 30.0 && mid.distance > 3.0);

        let report = task.await.unwrap();
        assert_eq!(report.outcome, IntroOutcome::Completed);
        assert!(report.final_frame.overlay_opacity.abs() < EPS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_landing_keeps_overlay_opaque_while_flying() {
        let (intro, handle) = GlobeIntro::new(IntroConfig::new(IntroVariant::Landing));
        let task = tokio::spawn(intro.run());

        sleep(Duration::from_millis(1_000)).await;
        let frame = handle.current_frame();
        assert!((frame.overlay_opacity - 1.0).abs() < EPS);
        assert!(frame.overlay_visible);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_interactive_waits_for_data_then_deep_zooms() {
        let (intro, handle) = GlobeIntro::new(IntroConfig::new(IntroVariant::Interactive));
        let task = tokio::spawn(intro.run());

        sleep(Duration::from_millis(3_000)).await;
        assert_eq!(handle.current_frame().phase, IntroPhase::Orbiting);

        assert!(handle.send(IntroInput::PointerDown { x: 0.0, y: 0.0 }));
        assert!(handle.send(IntroInput::PointerMove { x: 200.0, y: 0.0 }));
        assert!(handle.send(IntroInput::PointerUp));
        sleep(Duration::from_millis(100)).await;
        assert!((handle.current_frame().yaw - 1.0).abs() < EPS);

        // still orbiting long after the flight without data
        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(handle.current_frame().phase, IntroPhase::Orbiting);

        handle.signal_data_ready();
        let report = task.await.unwrap();
        assert_eq!(report.outcome, IntroOutcome::Completed);
        assert!((report.final_frame.distance - 1.15).abs() < EPS);
        assert!(!report.final_frame.overlay_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_before_orbit_goes_straight_to_deep_zoom() {
        let (intro, handle) = GlobeIntro::new(IntroConfig::new(IntroVariant::Interactive));
        handle.signal_data_ready();
        let started = Instant::now();

        let report = intro.run().await;
        assert_eq!(report.outcome, IntroOutcome::Completed);
        assert!(started.elapsed() < Duration::from_millis(4_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_hides_when_data_never_arrives() {
        let config = IntroConfig::new(IntroVariant::Interactive).with_fallback(Duration::from_millis(5_000));
        let (intro, handle) = GlobeIntro::new(config);
        let started = Instant::now();

        let report = intro.run().await;
        assert_eq!(report.outcome, IntroOutcome::FallbackHidden);
        assert_eq!(report.final_frame.phase, IntroPhase::Hidden);
        assert!(!report.final_frame.overlay_visible);
        assert!(started.elapsed() >= Duration::from_millis(5_000));
        // handle outlives the intro
        assert!(!handle.send(IntroInput::PointerUp));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_and_missing_outline() {
        let config = IntroConfig::new(IntroVariant::Landing).with_geojson("/nonexistent/land.geojson");
        let (intro, handle) = GlobeIntro::new(config);
        handle.send(IntroInput::Resize {
            width: 1000,
            height: 500,
        });

        let report = intro.run().await;
        assert_eq!(report.outcome, IntroOutcome::Completed);
        assert!((report.final_frame.aspect - 2.0).abs() < EPS);
        assert!(!report.final_frame.outline_loaded);
        assert!(report.outline.is_none());
    }

    #[tokio::test]
    async fn test_outline_is_loaded_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("land.geojson");
        std::fs::write(
            &path,
            r#"{"type": "LineString", "coordinates": [[0, 0], [10, 10]]}"#,
        )
        .unwrap();

        let mut config = IntroConfig::new(IntroVariant::Landing).with_geojson(&path);
        config.flight = Duration::from_millis(300);
        let (intro, _handle) = GlobeIntro::new(config);

        let report = intro.run().await;
        assert!(report.final_frame.outline_loaded);
        assert_eq!(report.outline.unwrap().lines.len(), 1);
    }
}
