//! Shared gameplay types
//!
//! Everything the engine reads back out of the simulation lives here.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Current light of the red light/green light cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Doll faces away, movement is allowed
    #[default]
    Green,
    /// Doll is watching, movement is penalized after the grace window
    Red,
}

impl Phase {
    pub fn flipped(self) -> Self {
        match self {
            Phase::Green => Phase::Red,
            Phase::Red => Phase::Green,
        }
    }
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Not started, or stopped from outside
    #[default]
    Inactive,
    /// Clock running
    Active,
    /// Survived until the clock ran out
    Won,
    /// Caught moving, or hit a fatal region
    Eliminated,
}

impl GameState {
    /// Won and Eliminated end the round
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Won | GameState::Eliminated)
    }
}

/// Tracked camera pose (world space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Straight-line distance between the two positions
    #[inline]
    pub fn distance_to(&self, other: &Pose) -> f32 {
        self.position.distance(other.position)
    }

    /// Smallest rotation (degrees) taking one orientation to the other
    #[inline]
    pub fn angle_to_degrees(&self, other: &Pose) -> f32 {
        let dot = self.rotation.dot(other.rotation).abs().min(1.0);
        (2.0 * dot.acos()).to_degrees()
    }
}

/// Presentation cues: sounds and panels the engine should play/show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    GreenLight,
    RedLight,
    /// Doll head turning back to face the player
    HeadTurn,
    /// Countdown tick in the final seconds
    TimerTick,
    TimerEnd,
    Elimination,
    Gunshot,
    /// Game over / round end panel
    ShowEndPanel,
    /// Looping bridge soundtrack
    BackgroundMusic,
    GlassBreak,
}

/// Visual state of a bridge platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformState {
    Safe,
    Fragile,
    Broken,
}

/// Events raised synchronously by the simulation, drained by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged(Phase),
    StateChanged(GameState),
    /// Remaining round time (seconds)
    TimerUpdated(f32),
    /// Play `cue` after `delay` seconds
    Cue { cue: Cue, delay: f32 },
    PlatformChanged {
        lane: usize,
        index: usize,
        state: PlatformState,
    },
    /// The bridge's stop control should be shown/hidden
    StopControlVisible(bool),
    /// Camera crossed the portal plane
    WorldSwitched { in_other_world: bool },
    /// An object was anchored on a detected plane
    Placed(Pose),
}

impl GameEvent {
    /// A cue to play right away
    pub fn cue(cue: Cue) -> Self {
        GameEvent::Cue { cue, delay: 0.0 }
    }
}
