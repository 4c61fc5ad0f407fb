use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::math::Vec3;

/// Point cloud around the globe, reproducible from its seed
#[derive(Debug, Clone, Serialize)]
pub struct Starfield {
    pub seed: u64,
    pub points: Vec<Vec3>,
}

impl Starfield {
    /// Uniform directions, radius uniform in `[min_radius, max_radius]`
    pub fn generate(seed: u64, count: usize, min_radius: f64, max_radius: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (lo, hi) = if min_radius <= max_radius {
            (min_radius, max_radius)
        } else {
            (max_radius, min_radius)
        };

        let points = (0..count)
            .map(|_| {
                let theta = rng.gen_range(0.0..std::f64::consts::TAU);
                let cos_phi: f64 = rng.gen_range(-1.0..=1.0);
                let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
                let radius = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
                Vec3::new(
                    radius * sin_phi * theta.cos(),
                    radius * cos_phi,
                    radius * sin_phi * theta.sin(),
                )
            })
            .collect();

        Self { seed, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stars() {
        let a = Starfield::generate(42, 200, 5.0, 10.0);
        let b = Starfield::generate(42, 200, 5.0, 10.0);
        let c = Starfield::generate(43, 200, 5.0, 10.0);
        assert_eq!(a.points, b.points);
        assert_ne!(a.points, c.points);
    }

    #[test]
    fn test_stars_stay_in_shell() {
        let stars = Starfield::generate(1, 500, 10.0, 5.0);
        assert!(stars
            .points
            .iter()
            .all(|p| (5.0 - 1e-9..=10.0 + 1e-9).contains(&p.length())));
    }
}
