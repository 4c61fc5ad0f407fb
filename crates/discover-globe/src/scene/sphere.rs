use serde::Serialize;

use crate::math::{lat_lon_to_vec3, Vec3};

/// Line points per ring
const RING_RESOLUTION: usize = 64;

/// Latitude rings and longitude meridians as polylines
#[derive(Debug, Clone, Serialize)]
pub struct WireframeSphere {
    pub radius: f64,
    pub parallels: Vec<Vec<Vec3>>,
    pub meridians: Vec<Vec<Vec3>>,
}

impl WireframeSphere {
    pub fn new(radius: f64, lat_segments: usize, lon_segments: usize) -> Self {
        let lat_segments = lat_segments.max(2);
        let lon_segments = lon_segments.max(3);

        // poles are points, so skip i = 0 and i = lat_segments
        let parallels = (1..lat_segments)
            .map(|i| {
                let lat = -90.0 + 180.0 * i as f64 / lat_segments as f64;
                ring(|t| lat_lon_to_vec3(lat, -180.0 + 360.0 * t, radius), true)
            })
            .collect();

        let meridians = (0..lon_segments)
            .map(|j| {
                let lon = -180.0 + 360.0 * j as f64 / lon_segments as f64;
                ring(|t| lat_lon_to_vec3(-90.0 + 180.0 * t, lon, radius), false)
            })
            .collect();

        Self {
            radius,
            parallels,
            meridians,
        }
    }
}

fn ring(point: impl Fn(f64) -> Vec3, closed: bool) -> Vec<Vec3> {
    let steps = if closed { RING_RESOLUTION } else { RING_RESOLUTION / 2 };
    (0..=steps).map(|k| point(k as f64 / steps as f64)).collect()
}
