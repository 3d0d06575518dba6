//! Portal world switch
//!
//! A doorway whose local +Y axis points out of its front face. Walking the
//! camera through it flips between the normal world and the portal world:
//! the stencil compare on the portal-world materials swaps so they render
//! everywhere instead of only through the doorway, and two object groups
//! trade visibility.

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

use super::state::GameEvent;

/// Stencil comparison for portal-world materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StencilCompare {
    /// Draw only where the doorway wrote the stencil (seen through the portal)
    Equal,
    /// Draw everywhere except the doorway (standing inside the portal world)
    NotEqual,
}

/// Which object groups should be active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldVisibility {
    /// Objects hidden on entering the portal world
    pub normal_objects: bool,
    /// Objects revealed on entering the portal world
    pub portal_objects: bool,
}

/// Camera state the portal needs each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    /// Unit forward vector
    pub forward: Vec3,
    pub near_clip: f32,
}

impl CameraView {
    /// Point on the near plane straight ahead; this is what crosses the doorway
    fn near_point(&self) -> Vec3 {
        self.position + self.forward * self.near_clip
    }
}

#[derive(Debug, Clone)]
pub struct Portal {
    portal_from_world: Affine3A,
    in_other_world: bool,
    was_in_front: bool,
    /// Camera is inside the doorway trigger
    tracking: bool,
    events: Vec<GameEvent>,
}

impl Portal {
    /// `world_from_portal` is the doorway's transform
    pub fn new(world_from_portal: Affine3A) -> Self {
        Self {
            portal_from_world: world_from_portal.inverse(),
            in_other_world: false,
            was_in_front: false,
            tracking: false,
            events: Vec::new(),
        }
    }

    pub fn in_other_world(&self) -> bool {
        self.in_other_world
    }

    pub fn stencil_compare(&self) -> StencilCompare {
        if self.in_other_world {
            StencilCompare::NotEqual
        } else {
            StencilCompare::Equal
        }
    }

    pub fn visibility(&self) -> WorldVisibility {
        WorldVisibility {
            normal_objects: !self.in_other_world,
            portal_objects: self.in_other_world,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Is the camera's near point on the front side of the doorway
    pub fn is_in_front(&self, camera: &CameraView) -> bool {
        self.portal_from_world.transform_point3(camera.near_point()).y >= 0.0
    }

    pub fn on_trigger_enter(&mut self, camera: &CameraView) {
        self.was_in_front = self.is_in_front(camera);
        self.tracking = true;
    }

    pub fn on_trigger_stay(&mut self, camera: &CameraView) {
        if !self.tracking {
            return;
        }
        let in_front = self.is_in_front(camera);
        if in_front != self.was_in_front {
            self.in_other_world = !self.in_other_world;
            log::info!(
                "Crossed portal, now in {} world",
                if self.in_other_world { "portal" } else { "normal" }
            );
            self.events.push(GameEvent::WorldSwitched {
                in_other_world: self.in_other_world,
            });
        }
        self.was_in_front = in_front;
    }

    pub fn on_trigger_exit(&mut self) {
        self.tracking = false;
    }
}
