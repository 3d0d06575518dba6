//! Doll head rotation
//!
//! Purely presentational: the head turns away on green and back toward the
//! player on red. The light machine decides outcomes, the head just follows
//! `PhaseChanged` events.

use glam::Quat;
use serde::{Deserialize, Serialize};

use super::state::{Cue, Phase};
use crate::consts::DOLL_SNAP_DEGREES;

/// Doll head turning about its local Z axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DollHead {
    /// Angle facing the player (degrees)
    pub front_angle: f32,
    /// Angle facing away (degrees)
    pub back_angle: f32,
    /// Turn rate (degrees per second)
    pub speed: f32,
    angle: f32,
    target: f32,
    facing_front: bool,
    phase: Phase,
}

impl Default for DollHead {
    fn default() -> Self {
        Self::new(0.0, 180.0, 90.0)
    }
}

impl DollHead {
    /// Head starts facing the player
    pub fn new(front_angle: f32, back_angle: f32, speed: f32) -> Self {
        Self {
            front_angle,
            back_angle,
            speed: speed.max(0.0),
            angle: front_angle,
            target: front_angle,
            facing_front: true,
            phase: Phase::Green,
        }
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle
    }

    /// Local rotation to apply to the head transform
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.angle.to_radians())
    }

    pub fn is_rotating(&self) -> bool {
        self.angle != self.target
    }

    pub fn is_facing_front(&self) -> bool {
        self.facing_front
    }

    /// Follow a light change
    pub fn on_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.set_facing(phase == Phase::Red);
    }

    /// Manually swing the head the other way.
    ///
    /// Returns the turn cue when the doll swings back to face the player on red.
    pub fn turn(&mut self) -> Option<Cue> {
        if self.is_rotating() {
            return None;
        }
        self.set_facing(!self.facing_front);
        (self.facing_front && self.phase == Phase::Red).then_some(Cue::HeadTurn)
    }

    /// Rotate toward the target at `speed`
    pub fn update(&mut self, dt: f32) {
        if !self.is_rotating() || !(dt > 0.0) {
            return;
        }
        let delta = self.target - self.angle;
        let step = self.speed * dt;
        if delta.abs() <= step {
            self.angle = self.target;
        } else {
            self.angle += step.copysign(delta);
        }
        if (self.target - self.angle).abs() < DOLL_SNAP_DEGREES {
            self.angle = self.target;
        }
    }

    fn set_facing(&mut self, front: bool) {
        self.facing_front = front;
        self.target = if front {
            self.front_angle
        } else {
            self.back_angle
        };
    }
}
