//! Tap-to-place on detected AR planes
//!
//! The first tap that lands on a tracked plane anchors the game board there.
//! Later taps are ignored so the board can't be moved mid-round.

use glam::Vec2;

use super::state::{GameEvent, Pose};

/// Touch lifecycle as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Screen position (pixels)
    pub position: Vec2,
    pub phase: TouchPhase,
}

/// Screen-space raycast against detected planes
pub trait PlaneRaycaster {
    /// Hit poses on planes (inside their polygon), nearest first
    fn raycast(&self, screen: Vec2) -> Vec<Pose>;
}

/// A new tap: only the first finger, only on the frame it touches down
pub fn first_tap(touches: &[Touch]) -> Option<Vec2> {
    touches
        .first()
        .filter(|t| t.phase == TouchPhase::Began)
        .map(|t| t.position)
}

/// Places a single object on the first plane hit
#[derive(Debug, Clone, Default)]
pub struct Placement {
    placed: Option<Pose>,
    events: Vec<GameEvent>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pose of the spawned object, once placed
    pub fn placed(&self) -> Option<Pose> {
        self.placed
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Try to place with this frame's tap. Returns the pose on the frame it spawns.
    pub fn update(&mut self, tap: Option<Vec2>, raycaster: &impl PlaneRaycaster) -> Option<Pose> {
        if self.placed.is_some() {
            return None;
        }
        let pose = raycaster.raycast(tap?).into_iter().next()?;
        log::info!("Placed object at {:?}", pose.position);
        self.placed = Some(pose);
        self.events.push(GameEvent::Placed(pose));
        Some(pose)
    }
}
