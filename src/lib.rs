//! Squid AR - gameplay state for an augmented-reality mini-game
//!
//! Core modules:
//! - `sim`: Engine-free gameplay state (red light/green light, glass bridge, portal, placement)
//! - `config`: Data-driven game tuning loaded from JSON
//! - `error`: Configuration errors
//!
//! The engine owns rendering, physics, audio and AR tracking. It feeds poses,
//! probe results and frame deltas in and consumes [`sim::GameEvent`]s out.

pub mod config;
pub mod error;
pub mod sim;

pub use config::{BridgeConfig, GameConfig, LightConfig};
pub use error::ConfigError;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches typical AR camera frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed into the accumulator (app resume, tracking loss)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Doll head snaps to its target once within this many degrees
    pub const DOLL_SNAP_DEGREES: f32 = 0.1;

    /// Lower bound for the runtime-adjustable movement threshold (meters)
    pub const MIN_MOVEMENT_THRESHOLD: f32 = 0.001;
    /// Lower bound for the runtime-adjustable rotation threshold (degrees)
    pub const MIN_ROTATION_THRESHOLD: f32 = 0.1;
}

/// Format a countdown as `MM:SS` for the timer label.
///
/// Minutes and seconds are floored, so 59.9 s reads `00:59`.
pub fn format_clock(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    format!("{minutes:02}:{secs:02}")
}
