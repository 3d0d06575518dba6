//! Glass bridge round
//!
//! Lanes of glass platforms span a drop. The first pane of every lane is
//! fragile. The player dies by running out of time or by standing without
//! support for longer than the fall delay. On death the fragile panes shatter
//! and the world drops away until the camera probe reaches the dead zone.

use glam::Vec3;

use super::state::{Cue, GameEvent, GameState, PlatformState};
use crate::config::BridgeConfig;
use crate::error::ConfigError;

/// What the downward probe under the camera hit this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ground,
    Glass { lane: usize, index: usize },
    /// Kill volume at the bottom of the drop
    DeadZone,
    Nothing,
}

/// Bridge round progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePhase {
    Running,
    Falling,
    Over,
}

#[derive(Debug, Clone)]
pub struct GlassBridge {
    config: BridgeConfig,
    lanes: Vec<Vec<PlatformState>>,
    phase: BridgePhase,
    clock: f32,
    clock_running: bool,
    /// Seconds spent without ground or safe glass underfoot
    unsupported: f32,
    /// Accumulated drop applied to the falling rig (local space)
    fall_offset: Vec3,
    events: Vec<GameEvent>,
}

impl GlassBridge {
    pub fn new(config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let lanes = config.lanes.iter().map(|&n| vec![PlatformState::Safe; n]).collect();
        let mut bridge = Self {
            clock: config.total_game_seconds,
            config,
            lanes,
            phase: BridgePhase::Running,
            clock_running: true,
            unsupported: 0.0,
            fall_offset: Vec3::ZERO,
            events: Vec::new(),
        };
        bridge.reset_platforms();
        Ok(bridge)
    }

    /// Scene loaded: start the soundtrack and show the timer
    pub fn start(&mut self) {
        self.events.push(GameEvent::cue(Cue::BackgroundMusic));
        self.events.push(GameEvent::TimerUpdated(self.clock));
    }

    pub fn phase(&self) -> BridgePhase {
        self.phase
    }

    /// Round outcome in light-machine terms
    pub fn state(&self) -> GameState {
        match self.phase {
            BridgePhase::Running => GameState::Active,
            BridgePhase::Falling | BridgePhase::Over => GameState::Eliminated,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.clock
    }

    pub fn fall_offset(&self) -> Vec3 {
        self.fall_offset
    }

    pub fn platform(&self, lane: usize, index: usize) -> Option<PlatformState> {
        self.lanes.get(lane)?.get(index).copied()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one frame with the current probe result
    pub fn tick(&mut self, dt: f32, below: Surface) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.phase {
            BridgePhase::Running => {
                if self.clock_running {
                    self.clock = (self.clock - dt).max(0.0);
                    self.events.push(GameEvent::TimerUpdated(self.clock));
                    if self.clock <= 0.0 {
                        log::info!("Bridge timer expired");
                        self.kill();
                        return;
                    }
                }

                if self.is_supported(below) {
                    self.unsupported = 0.0;
                } else {
                    self.unsupported += dt;
                    if self.unsupported >= self.config.fall_delay_seconds {
                        log::info!("No support for {:.2}s, player falls", self.unsupported);
                        self.kill();
                    }
                }
            }
            BridgePhase::Falling => {
                self.fall_offset += Vec3::NEG_Z * self.config.fall_speed * dt;
                if below == Surface::DeadZone {
                    self.finish();
                }
            }
            BridgePhase::Over => {}
        }
    }

    /// Camera entered the kill volume
    pub fn report_dead_zone(&mut self) {
        if self.phase == BridgePhase::Falling {
            self.finish();
        }
    }

    pub fn restart(&mut self) {
        self.phase = BridgePhase::Running;
        self.clock = self.config.total_game_seconds;
        self.clock_running = true;
        self.unsupported = 0.0;
        self.fall_offset = Vec3::ZERO;
        self.reset_platforms();
        self.events.push(GameEvent::TimerUpdated(self.clock));
        self.events.push(GameEvent::StopControlVisible(true));
        self.events.push(GameEvent::StateChanged(GameState::Active));
        log::info!("Bridge restarted");
    }

    fn is_supported(&self, below: Surface) -> bool {
        match below {
            Surface::Ground => true,
            Surface::Glass { lane, index } => {
                self.platform(lane, index) == Some(PlatformState::Safe)
            }
            Surface::DeadZone | Surface::Nothing => false,
        }
    }

    fn kill(&mut self) {
        self.clock_running = false;
        for lane in 0..self.lanes.len() {
            self.set_platform(lane, 0, PlatformState::Broken);
        }
        self.phase = BridgePhase::Falling;
        self.events.push(GameEvent::cue(Cue::GlassBreak));
        self.events.push(GameEvent::StateChanged(GameState::Eliminated));
    }

    fn finish(&mut self) {
        log::info!("Player reached the bottom, round over");
        self.phase = BridgePhase::Over;
        self.events.push(GameEvent::cue(Cue::ShowEndPanel));
        self.events.push(GameEvent::StopControlVisible(false));
    }

    fn reset_platforms(&mut self) {
        for lane in 0..self.lanes.len() {
            for index in 0..self.lanes[lane].len() {
                let state = if index == 0 {
                    PlatformState::Fragile
                } else {
                    PlatformState::Safe
                };
                self.set_platform(lane, index, state);
            }
        }
    }

    fn set_platform(&mut self, lane: usize, index: usize, state: PlatformState) {
        if let Some(slot) = self.lanes.get_mut(lane).and_then(|l| l.get_mut(index)) {
            *slot = state;
            self.events.push(GameEvent::PlatformChanged { lane, index, state });
        }
    }
}
