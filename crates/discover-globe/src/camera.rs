//! Perspective camera, viewport and the eased fly-in

use std::time::Duration;

use serde::Serialize;

use crate::math::{ease_out_cubic, lerp};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; a zero-height viewport counts as one pixel tall
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    /// Distance from the globe centre
    pub distance: f64,
    pub fov_deg: f64,
    pub aspect: f64,
    pub viewport: Viewport,
}

impl Camera {
    pub fn new(distance: f64, viewport: Viewport) -> Self {
        Self {
            distance,
            fov_deg: 45.0,
            aspect: viewport.aspect(),
            viewport,
        }
    }

    /// Window resize: new viewport and aspect, distance unchanged
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.aspect = self.viewport.aspect();
    }
}

/// Distance animation from `from` to `to` over `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFlight {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl CameraFlight {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Eased progress, used for both distance and overlay fade
    pub fn eased(&self, elapsed: Duration) -> f64 {
        ease_out_cubic(self.progress(elapsed))
    }

    pub fn distance_at(&self, elapsed: Duration) -> f64 {
        lerp(self.from, self.to, self.eased(elapsed))
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_eases_from_far_to_near() {
        let flight = CameraFlight::new(30.0, 3.0, Duration::from_millis(2_000));
        assert!((flight.distance_at(Duration::ZERO) - 30.0).abs() < 1e-9);
        assert!((flight.distance_at(Duration::from_millis(1_000)) - (30.0 - 27.0 * 0.875)).abs() < 1e-9);
        assert!((flight.distance_at(Duration::from_secs(5)) - 3.0).abs() < 1e-9);
        assert!(!flight.is_finished(Duration::from_millis(1_999)));
        assert!(flight.is_finished(Duration::from_millis(2_000)));
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let flight = CameraFlight::new(10.0, 2.0, Duration::ZERO);
        assert!((flight.distance_at(Duration::ZERO) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = Camera::new(30.0, Viewport::new(800, 600));
        camera.resize(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-9);
        assert_eq!(camera.viewport, Viewport::new(1920, 1080));
        assert!((camera.distance - 30.0).abs() < 1e-9);

        camera.resize(500, 0);
        assert!((camera.aspect - 500.0).abs() < 1e-9);
    }
}
