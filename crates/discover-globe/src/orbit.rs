//! Drag-to-orbit rotation

use std::f64::consts::FRAC_PI_2;

use serde::Serialize;

/// Keep the camera just short of the poles
const PITCH_LIMIT: f64 = FRAC_PI_2 - 0.05;
/// Radians per dragged pixel
const DEFAULT_SENSITIVITY: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragOrbit {
    pub yaw: f64,
    pub pitch: f64,
    #[serde(skip)]
    sensitivity: f64,
    #[serde(skip)]
    last: Option<(f64, f64)>,
}

impl Default for DragOrbit {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: DEFAULT_SENSITIVITY,
            last: None,
        }
    }
}

impl DragOrbit {
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.last = Some((x, y));
    }

    /// Rotate by the movement since the last pointer position; ignored unless dragging
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some((last_x, last_y)) = self.last else {
            return;
        };
        self.yaw = (self.yaw + (x - last_x) * self.sensitivity).rem_euclid(std::f64::consts::TAU);
        self.pitch = (self.pitch + (y - last_y) * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.last = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.last = None;
    }
}
