//! Engine-free gameplay simulation
//!
//! Everything here is plain state driven by explicit calls:
//! - No engine types, only `glam` math
//! - Seeded RNG only
//! - Outcomes leave as `GameEvent`s, never as engine side effects

pub mod bridge;
pub mod clock;
pub mod cues;
pub mod doll;
pub mod light;
pub mod placement;
pub mod portal;
pub mod state;

pub use bridge::{BridgePhase, GlassBridge, Surface};
pub use clock::FrameClock;
pub use cues::CueScheduler;
pub use doll::DollHead;
pub use light::LightMachine;
pub use placement::{PlaneRaycaster, Placement, Touch, TouchPhase, first_tap};
pub use portal::{CameraView, Portal, StencilCompare, WorldVisibility};
pub use state::{Cue, GameEvent, GameState, Phase, PlatformState, Pose};
