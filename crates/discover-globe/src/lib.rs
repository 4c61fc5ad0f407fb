//! # discover-globe
//!
//! Scene model and intro sequencing for the globe animations shown before
//! the discover page. A thin renderer draws the [`GlobeScene`] and follows
//! the [`IntroFrame`]s produced by [`GlobeIntro`].
//!
//! The HTTP API serves only the scene and an [`IntroConfig`]; the browser
//! runs its own copy of the timeline from that config. [`GlobeIntro`] is the
//! reference timeline that copy mirrors: phase order, cubic ease-out flight,
//! cross-fade, drag orbit until data is ready, deep zoom, and the fallback
//! hide. Its tests pin the behavior the client has to reproduce, and a
//! native host can drive it directly through [`IntroHandle`].

pub mod camera;
pub mod error;
pub mod intro;
pub mod math;
pub mod orbit;
pub mod scene;

pub use camera::{Camera, CameraFlight, Viewport};
pub use error::{GlobeError, GlobeResult};
pub use intro::{
    GlobeIntro, IntroConfig, IntroFrame, IntroHandle, IntroInput, IntroOutcome, IntroPhase,
    IntroReport, IntroVariant,
};
pub use math::{ease_out_cubic, lat_lon_to_vec3, Vec3};
pub use orbit::DragOrbit;
pub use scene::{
    load_outline, GlobeScene, LandmarkPin, Outline, SceneOptions, Starfield, WireframeSphere,
    GLOBE_RADIUS,
};
