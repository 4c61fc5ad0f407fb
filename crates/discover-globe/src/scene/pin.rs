use serde::Serialize;

use crate::math::{lat_lon_to_vec3, Vec3};

/// Seoul
pub const DEFAULT_LANDMARK: (f64, f64) = (37.5665, 126.978);

const PIN_HEIGHT: f64 = 0.08;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LandmarkPin {
    pub lat: f64,
    pub lon: f64,
    /// Base of the pin on the surface
    pub position: Vec3,
    /// Head of the pin, raised along the surface normal
    pub tip: Vec3,
}

impl LandmarkPin {
    pub fn new(lat: f64, lon: f64, radius: f64) -> Self {
        let lat = lat.clamp(-90.0, 90.0);
        Self {
            lat,
            lon,
            position: lat_lon_to_vec3(lat, lon, radius),
            tip: lat_lon_to_vec3(lat, lon, radius + PIN_HEIGHT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_sits_on_surface() {
        let pin = LandmarkPin::new(DEFAULT_LANDMARK.0, DEFAULT_LANDMARK.1, 1.0);
        assert!((pin.position.length() - 1.0).abs() < 1e-9);
        assert!((pin.tip.length() - (1.0 + PIN_HEIGHT)).abs() < 1e-9);
    }
}
