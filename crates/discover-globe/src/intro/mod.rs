//! Intro variants, timing configuration and the frames they produce

mod sequencer;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use discover_common::GlobeConfig;
use serde::Serialize;

use crate::camera::Viewport;
use crate::error::GlobeError;
use crate::scene::SceneOptions;

pub use sequencer::{GlobeIntro, IntroHandle, IntroReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntroVariant {
    /// Fly in, then hide the overlay
    #[default]
    Landing,
    /// Fly in while the overlay fades out
    Crossfade,
    /// Fly in, orbit by drag until the page data is ready, deep zoom, hide
    Interactive,
}

impl IntroVariant {
    pub const ALL: [Self; 3] = [Self::Landing, Self::Crossfade, Self::Interactive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Crossfade => "crossfade",
            Self::Interactive => "interactive",
        }
    }
}

impl FromStr for IntroVariant {
    type Err = GlobeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == raw)
            .ok_or_else(|| GlobeError::UnknownVariant(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroPhase {
    Flying,
    Orbiting,
    DeepZoom,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroOutcome {
    Completed,
    /// The fallback timer fired before the normal path finished
    FallbackHidden,
}

/// Host page events fed into a running intro
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntroInput {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Resize { width: u32, height: u32 },
}

/// Snapshot a renderer draws from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntroFrame {
    pub phase: IntroPhase,
    pub distance: f64,
    pub aspect: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub overlay_opacity: f64,
    pub overlay_visible: bool,
    pub outline_loaded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntroConfig {
    pub variant: IntroVariant,
    pub far_distance: f64,
    pub near_distance: f64,
    /// Final distance of the interactive deep zoom
    pub deep_zoom_distance: f64,
    #[serde(serialize_with = "as_millis")]
    pub flight: Duration,
    #[serde(serialize_with = "as_millis")]
    pub deep_zoom: Duration,
    #[serde(serialize_with = "as_millis")]
    pub frame: Duration,
    #[serde(serialize_with = "as_millis")]
    pub fallback: Duration,
    #[serde(skip)]
    pub geojson_path: Option<PathBuf>,
    #[serde(skip)]
    pub scene: SceneOptions,
    pub viewport: Viewport,
}

impl IntroConfig {
    pub fn new(variant: IntroVariant) -> Self {
        Self {
            variant,
            far_distance: 30.0,
            near_distance: 3.0,
            deep_zoom_distance: 1.15,
            flight: Duration::from_millis(2_500),
            deep_zoom: Duration::from_millis(1_200),
            frame: Duration::from_millis(16),
            fallback: Duration::from_millis(8_000),
            geojson_path: None,
            scene: SceneOptions::default(),
            viewport: Viewport::default(),
        }
    }

    pub fn from_globe_config(config: &GlobeConfig, variant: IntroVariant) -> Self {
        Self {
            fallback: Duration::from_millis(config.fallback_ms),
            geojson_path: config.geojson_path.as_ref().map(PathBuf::from),
            ..Self::new(variant)
        }
    }

    pub fn with_fallback(mut self, fallback: Duration) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_geojson(mut self, path: impl Into<PathBuf>) -> Self {
        self.geojson_path = Some(path.into());
        self
    }
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
