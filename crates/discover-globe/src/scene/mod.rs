//! Static scene content: sphere, stars, pin and the optional outline

mod outline;
mod pin;
mod sphere;
mod starfield;

use serde::Serialize;

pub use outline::{load_outline, Outline};
pub use pin::{LandmarkPin, DEFAULT_LANDMARK};
pub use sphere::WireframeSphere;
pub use starfield::Starfield;

pub const GLOBE_RADIUS: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    pub seed: u64,
    pub star_count: usize,
    /// Stars sit on a shell between these radii
    pub star_shell: (f64, f64),
    pub lat_segments: usize,
    pub lon_segments: usize,
    pub landmark: (f64, f64),
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            seed: 7,
            star_count: 1_500,
            star_shell: (8.0, 40.0),
            lat_segments: 12,
            lon_segments: 24,
            landmark: DEFAULT_LANDMARK,
        }
    }
}

/// Everything the renderer draws
#[derive(Debug, Clone, Serialize)]
pub struct GlobeScene {
    pub radius: f64,
    pub sphere: WireframeSphere,
    pub stars: Starfield,
    pub pin: LandmarkPin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
}

impl GlobeScene {
    pub fn build(options: &SceneOptions) -> Self {
        let (lat, lon) = options.landmark;
        Self {
            radius: GLOBE_RADIUS,
            sphere: WireframeSphere::new(GLOBE_RADIUS, options.lat_segments, options.lon_segments),
            stars: Starfield::generate(
                options.seed,
                options.star_count,
                options.star_shell.0,
                options.star_shell.1,
            ),
            pin: LandmarkPin::new(lat, lon, GLOBE_RADIUS),
            outline: None,
        }
    }

    /// Attach an outline once it has loaded
    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = Some(outline);
        self
    }
}
