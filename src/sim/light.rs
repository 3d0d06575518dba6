//! Red light/green light round
//!
//! The doll alternates between Green (move freely) and Red (freeze). Each
//! light lasts a random time drawn from its configured range. Once Red has
//! been up longer than the grace window, any frame-to-frame camera motion
//! beyond the thresholds eliminates the player. Surviving until the round
//! clock hits zero wins.
//!
//! The engine drives it: `set_observer_pose` with the tracked camera, then
//! `tick` with the frame delta, then `drain_events` to update the scene.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Cue, GameEvent, GameState, Phase, Pose};
use crate::config::LightConfig;
use crate::consts::{MIN_MOVEMENT_THRESHOLD, MIN_ROTATION_THRESHOLD};
use crate::error::ConfigError;

/// Red light/green light state machine
#[derive(Debug, Clone)]
pub struct LightMachine<R = Pcg32> {
    config: LightConfig,
    rng: R,

    state: GameState,
    phase: Phase,
    /// Remaining round time (seconds)
    clock: f32,
    /// False while the round clock is paused from outside
    clock_running: bool,
    /// Seconds until the next light change
    phase_timer: f32,
    /// Seconds of active play since `start`
    elapsed: f32,
    /// `elapsed` when Red last came up
    red_since: f32,
    /// Seconds until the next countdown tick cue
    tick_cue_in: f32,

    /// Latest pose from the tracker
    current_pose: Pose,
    /// Pose movement is measured against
    baseline: Pose,

    events: Vec<GameEvent>,
}

impl LightMachine<Pcg32> {
    /// Build a machine with a seeded PCG generator
    pub fn with_seed(config: LightConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> LightMachine<R> {
    /// Validate `config` and build an inactive machine
    pub fn new(config: LightConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = config.total_game_seconds;
        Ok(Self {
            config,
            rng,
            state: GameState::Inactive,
            phase: Phase::Green,
            clock,
            clock_running: true,
            phase_timer: 0.0,
            elapsed: 0.0,
            red_since: 0.0,
            tick_cue_in: 0.0,
            current_pose: Pose::IDENTITY,
            baseline: Pose::IDENTITY,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Remaining round time (seconds)
    pub fn remaining(&self) -> f32 {
        self.clock
    }

    /// Seconds until the light changes
    pub fn phase_timer(&self) -> f32 {
        self.phase_timer
    }

    /// Pose that movement is currently measured against
    pub fn baseline(&self) -> Pose {
        self.baseline
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock_running
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed the latest tracked camera pose
    pub fn set_observer_pose(&mut self, pose: Pose) {
        self.current_pose = pose;
    }

    /// Begin a fresh round
    ///
    /// No-op while a round is already running. From a finished round this
    /// starts over.
    pub fn start(&mut self) {
        if self.state == GameState::Active {
            return;
        }

        self.clock = self.config.total_game_seconds;
        self.clock_running = true;
        self.elapsed = 0.0;
        self.red_since = 0.0;
        self.tick_cue_in = 0.0;
        self.events.push(GameEvent::TimerUpdated(self.clock));

        self.set_state(GameState::Active);
        self.enter_phase(Phase::Green);
        log::info!(
            "Round started: {:.1}s, first green {:.2}s",
            self.clock,
            self.phase_timer
        );

        self.emit_tick_cue();
    }

    /// Halt the round from outside. Finished rounds stay finished.
    pub fn stop(&mut self) {
        if self.state == GameState::Active {
            self.set_state(GameState::Inactive);
        }
    }

    /// Freeze the round clock; the lights keep cycling
    pub fn pause_timer(&mut self) {
        self.clock_running = false;
    }

    pub fn resume_timer(&mut self) {
        self.clock_running = true;
    }

    /// Extend the round
    pub fn add_time(&mut self, seconds: f32) {
        if !seconds.is_finite() || seconds <= 0.0 || self.state.is_terminal() {
            return;
        }
        self.clock += seconds;
        self.events.push(GameEvent::TimerUpdated(self.clock));
    }

    pub fn set_movement_threshold(&mut self, meters: f32) {
        self.config.movement_threshold = meters.max(MIN_MOVEMENT_THRESHOLD);
    }

    pub fn set_rotation_threshold(&mut self, degrees: f32) {
        self.config.rotation_threshold_degrees = degrees.max(MIN_ROTATION_THRESHOLD);
    }

    /// External fatal trigger (e.g. walked into a kill volume)
    pub fn report_elimination(&mut self) {
        if self.state == GameState::Active {
            log::info!("Elimination reported externally");
            self.eliminate();
        }
    }

    /// Advance the round by one frame
    pub fn tick(&mut self, dt: f32) {
        if self.state != GameState::Active || !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        self.elapsed += dt;

        if self.clock_running {
            self.clock = (self.clock - dt).max(0.0);
            self.events.push(GameEvent::TimerUpdated(self.clock));
            if self.clock <= 0.0 {
                log::info!("Time's up, player survived");
                self.set_state(GameState::Won);
                self.events.push(GameEvent::cue(Cue::TimerEnd));
                self.events.push(GameEvent::cue(Cue::ShowEndPanel));
                return;
            }
        }

        self.tick_cue_in -= dt;
        self.emit_tick_cue();

        self.phase_timer -= dt;
        if self.phase_timer <= 0.0 {
            self.enter_phase(self.phase.flipped());
        }

        if self.phase == Phase::Red && self.elapsed - self.red_since > self.config.grace_window_seconds
        {
            let moved = self.current_pose.distance_to(&self.baseline);
            let turned = self.current_pose.angle_to_degrees(&self.baseline);
            if moved > self.config.movement_threshold
                || turned > self.config.rotation_threshold_degrees
            {
                log::info!("Camera moved on red: position {moved:.4}, rotation {turned:.3}deg");
                self.eliminate();
                return;
            }
            // Sliding baseline: only motion between consecutive frames counts
            self.baseline = self.current_pose;
        }
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.phase_timer = match phase {
            Phase::Green => self
                .rng
                .random_range(self.config.min_green_seconds..=self.config.max_green_seconds),
            Phase::Red => {
                self.red_since = self.elapsed;
                self.rng
                    .random_range(self.config.min_red_seconds..=self.config.max_red_seconds)
            }
        };
        self.baseline = self.current_pose;

        log::debug!("{:?} light for {:.2}s", phase, self.phase_timer);
        self.events.push(GameEvent::PhaseChanged(phase));
        self.events.push(GameEvent::cue(match phase {
            Phase::Green => Cue::GreenLight,
            Phase::Red => Cue::RedLight,
        }));
    }

    fn eliminate(&mut self) {
        self.set_state(GameState::Eliminated);
        let gunshot = self.config.gunshot_delay_seconds;
        self.events.push(GameEvent::cue(Cue::Elimination));
        self.events.push(GameEvent::Cue {
            cue: Cue::Gunshot,
            delay: gunshot,
        });
        self.events.push(GameEvent::Cue {
            cue: Cue::ShowEndPanel,
            delay: gunshot + self.config.panel_delay_seconds,
        });
    }

    /// Countdown ticks once per second of play inside the final window.
    /// At most one per frame; missed seconds are dropped.
    fn emit_tick_cue(&mut self) {
        if self.tick_cue_in > 0.0 {
            return;
        }
        if self.clock <= self.config.tick_cue_window_seconds {
            self.events.push(GameEvent::cue(Cue::TimerTick));
        }
        // Keep the sub-second phase, land in (0, 1]
        self.tick_cue_in = self.tick_cue_in.rem_euclid(1.0);
        if self.tick_cue_in <= 0.0 {
            self.tick_cue_in = 1.0;
        }
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            log::debug!("Light round {:?} -> {:?}", self.state, state);
            self.state = state;
            self.events.push(GameEvent::StateChanged(state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use proptest::prelude::*;

    fn fixed_config() -> LightConfig {
        LightConfig {
            total_game_seconds: 10.0,
            min_green_seconds: 3.0,
            max_green_seconds: 3.0,
            min_red_seconds: 5.0,
            max_red_seconds: 5.0,
            grace_window_seconds: 1.0,
            movement_threshold: 0.01,
            rotation_threshold_degrees: 0.5,
            ..Default::default()
        }
    }

    fn started(config: LightConfig) -> LightMachine {
        let mut machine = LightMachine::with_seed(config, 12345).unwrap();
        machine.start();
        machine.drain_events();
        machine
    }

    fn at(x: f32) -> Pose {
        Pose::new(Vec3::new(x, 1.6, 0.0), Quat::IDENTITY)
    }

    #[test]
    fn test_start_activates_green() {
        let mut machine = LightMachine::with_seed(fixed_config(), 1).unwrap();
        assert_eq!(machine.state(), GameState::Inactive);

        machine.start();
        assert_eq!(machine.state(), GameState::Active);
        assert_eq!(machine.phase(), Phase::Green);
        assert_eq!(machine.remaining(), 10.0);
        assert_eq!(machine.phase_timer(), 3.0);

        let events = machine.drain_events();
        assert!(events.contains(&GameEvent::StateChanged(GameState::Active)));
        assert!(events.contains(&GameEvent::PhaseChanged(Phase::Green)));
        assert!(events.contains(&GameEvent::TimerUpdated(10.0)));
        assert!(events.contains(&GameEvent::cue(Cue::GreenLight)));
    }

    #[test]
    fn test_start_is_noop_while_active() {
        let mut machine = started(fixed_config());
        machine.tick(1.0);
        machine.drain_events();
        machine.start();
        assert_eq!(machine.remaining(), 9.0);
        assert!(machine.drain_events().is_empty());
    }

    #[test]
    fn test_eliminated_after_grace() {
        let mut machine = started(fixed_config());
        machine.set_observer_pose(at(0.0));

        machine.tick(3.0);
        assert_eq!(machine.phase(), Phase::Red);
        assert!(machine.drain_events().contains(&GameEvent::PhaseChanged(Phase::Red)));

        // Inside the grace window motion is ignored
        machine.set_observer_pose(at(0.5));
        machine.tick(0.5);
        assert_eq!(machine.phase(), Phase::Red);
        assert_eq!(machine.state(), GameState::Active);

        machine.set_observer_pose(at(0.02));
        machine.tick(0.6);
        assert_eq!(machine.state(), GameState::Eliminated);

        let events = machine.drain_events();
        assert!(events.contains(&GameEvent::StateChanged(GameState::Eliminated)));
        assert!(events.contains(&GameEvent::cue(Cue::Elimination)));
        assert!(events.contains(&GameEvent::Cue {
            cue: Cue::Gunshot,
            delay: 3.0
        }));
        assert!(events.contains(&GameEvent::Cue {
            cue: Cue::ShowEndPanel,
            delay: 4.0
        }));
    }

    #[test]
    fn test_rotation_eliminates() {
        let mut machine = started(fixed_config());
        machine.tick(3.0);
        machine.tick(1.1);
        assert_eq!(machine.state(), GameState::Active);

        machine.set_observer_pose(Pose::new(Vec3::ZERO, Quat::from_rotation_y(1.0_f32.to_radians())));
        machine.tick(0.1);
        assert_eq!(machine.state(), GameState::Eliminated);
    }

    #[test]
    fn test_slow_drift_survives() {
        let mut machine = started(fixed_config());
        machine.set_observer_pose(at(0.0));
        machine.tick(3.0);
        machine.tick(1.1);

        // 0.005 per frame stays under the threshold even though total drift is large
        let mut x = 0.0;
        for _ in 0..20 {
            x += 0.005;
            machine.set_observer_pose(at(x));
            machine.tick(0.1);
        }
        assert_eq!(machine.state(), GameState::Active);
        assert!((machine.baseline().position.x - x).abs() < 1e-6);
    }

    #[test]
    fn test_green_allows_movement() {
        let mut machine = started(fixed_config());
        machine.set_observer_pose(at(3.0));
        machine.tick(1.0);
        machine.set_observer_pose(at(-3.0));
        machine.tick(1.0);
        assert_eq!(machine.state(), GameState::Active);
        assert_eq!(machine.phase(), Phase::Green);
    }

    #[test]
    fn test_red_returns_to_green() {
        let mut machine = started(fixed_config());
        machine.tick(3.0);
        assert_eq!(machine.phase(), Phase::Red);
        for _ in 0..5 {
            machine.tick(1.0);
        }
        assert_eq!(machine.phase(), Phase::Green);
        assert_eq!(machine.phase_timer(), 3.0);
    }

    #[test]
    fn test_win_when_clock_runs_out() {
        let config = LightConfig {
            total_game_seconds: 2.0,
            ..fixed_config()
        };
        let mut machine = started(config);
        machine.tick(1.0);
        assert_eq!(machine.state(), GameState::Active);
        machine.tick(1.0);
        assert_eq!(machine.state(), GameState::Won);
        assert_eq!(machine.remaining(), 0.0);

        let events = machine.drain_events();
        assert!(events.contains(&GameEvent::StateChanged(GameState::Won)));
        assert!(events.contains(&GameEvent::cue(Cue::TimerEnd)));

        // Terminal states freeze everything
        machine.tick(1.0);
        machine.report_elimination();
        assert_eq!(machine.state(), GameState::Won);
        assert!(machine.drain_events().is_empty());
    }

    #[test]
    fn test_stop_freezes_clock() {
        let mut machine = started(fixed_config());
        machine.tick(1.0);
        machine.stop();
        assert_eq!(machine.state(), GameState::Inactive);

        machine.tick(5.0);
        assert_eq!(machine.remaining(), 9.0);
        assert_eq!(machine.phase(), Phase::Green);
    }

    #[test]
    fn test_report_elimination_only_when_active() {
        let mut machine = LightMachine::with_seed(fixed_config(), 7).unwrap();
        machine.report_elimination();
        assert_eq!(machine.state(), GameState::Inactive);

        machine.start();
        machine.report_elimination();
        assert_eq!(machine.state(), GameState::Eliminated);
        machine.drain_events();

        machine.report_elimination();
        assert!(machine.drain_events().is_empty());
    }

    #[test]
    fn test_restart_after_elimination() {
        let mut machine = started(fixed_config());
        machine.report_elimination();
        machine.start();
        assert_eq!(machine.state(), GameState::Active);
        assert_eq!(machine.remaining(), 10.0);
        assert_eq!(machine.phase(), Phase::Green);
    }

    #[test]
    fn test_negative_and_nan_delta_ignored() {
        let mut machine = started(fixed_config());
        machine.tick(-1.0);
        machine.tick(f32::NAN);
        assert_eq!(machine.remaining(), 10.0);
        assert_eq!(machine.phase_timer(), 3.0);
    }

    #[test]
    fn test_paused_timer_keeps_lights() {
        let mut machine = started(fixed_config());
        machine.pause_timer();
        machine.tick(3.0);
        assert_eq!(machine.remaining(), 10.0);
        assert_eq!(machine.phase(), Phase::Red);

        machine.resume_timer();
        machine.tick(0.5);
        assert_eq!(machine.remaining(), 9.5);
    }

    #[test]
    fn test_add_time() {
        let mut machine = started(fixed_config());
        machine.add_time(5.0);
        assert_eq!(machine.remaining(), 15.0);
        assert_eq!(machine.drain_events(), vec![GameEvent::TimerUpdated(15.0)]);
        machine.add_time(-5.0);
        assert_eq!(machine.remaining(), 15.0);
    }

    #[test]
    fn test_threshold_setters_clamp() {
        let mut machine = started(fixed_config());
        machine.set_movement_threshold(0.0);
        machine.set_rotation_threshold(0.0);
        assert_eq!(machine.config().movement_threshold, MIN_MOVEMENT_THRESHOLD);
        assert_eq!(machine.config().rotation_threshold_degrees, MIN_ROTATION_THRESHOLD);
    }

    #[test]
    fn test_tick_cues_in_final_window() {
        let config = LightConfig {
            total_game_seconds: 12.0,
            tick_cue_window_seconds: 10.0,
            ..fixed_config()
        };
        let mut machine = LightMachine::with_seed(config, 3).unwrap();
        machine.start();
        fn ticks(events: &[GameEvent]) -> usize {
            events
                .iter()
                .filter(|e| **e == GameEvent::cue(Cue::TimerTick))
                .count()
        }
        assert_eq!(ticks(&machine.drain_events()), 0);

        // 12 -> 11: outside the window
        machine.tick(1.0);
        assert_eq!(ticks(&machine.drain_events()), 0);
        // 11 -> 10: inside
        machine.tick(1.0);
        assert_eq!(ticks(&machine.drain_events()), 1);
        machine.tick(0.5);
        assert_eq!(ticks(&machine.drain_events()), 0);
        machine.tick(0.5);
        assert_eq!(ticks(&machine.drain_events()), 1);
    }

    #[test]
    fn test_long_paused_frame_emits_one_tick() {
        let mut machine = started(fixed_config());
        machine.pause_timer();

        machine.tick(5000.0);
        let ticks = machine
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::cue(Cue::TimerTick))
            .count();
        assert_eq!(ticks, 1);

        // Large enough that adding one second is lost to rounding
        machine.tick(1.0e8);
        let ticks = machine
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::cue(Cue::TimerTick))
            .count();
        assert!(ticks <= 1);
        assert_eq!(machine.state(), GameState::Active);
        assert_eq!(machine.remaining(), 10.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LightConfig {
            min_red_seconds: 6.0,
            max_red_seconds: 2.0,
            ..Default::default()
        };
        assert!(LightMachine::with_seed(config, 0).is_err());

        let config = LightConfig {
            max_green_seconds: -1.0,
            ..Default::default()
        };
        assert!(LightMachine::with_seed(config, 0).is_err());
    }

    #[test]
    fn test_determinism() {
        let config = LightConfig::default();
        let mut a = LightMachine::with_seed(config.clone(), 99999).unwrap();
        let mut b = LightMachine::with_seed(config, 99999).unwrap();
        a.start();
        b.start();
        for _ in 0..600 {
            a.tick(1.0 / 60.0);
            b.tick(1.0 / 60.0);
        }
        assert_eq!(a.drain_events(), b.drain_events());
        assert_eq!(a.phase_timer(), b.phase_timer());
    }

    proptest! {
        #[test]
        fn prop_still_player_wins(
            seed in any::<u64>(),
            deltas in prop::collection::vec(0.01f32..0.5, 1..400),
        ) {
            let config = LightConfig {
                total_game_seconds: 5.0,
                ..LightConfig::default()
            };
            let mut machine = LightMachine::with_seed(config, seed).unwrap();
            machine.start();

            let mut last = machine.remaining();
            let mut total = 0.0f32;
            for dt in deltas {
                machine.tick(dt);
                total += dt;
                prop_assert!(machine.remaining() <= last);
                last = machine.remaining();
                if machine.state() == GameState::Won {
                    prop_assert_eq!(machine.remaining(), 0.0);
                }
                prop_assert_ne!(machine.state(), GameState::Eliminated);
            }
            if total >= 5.0 + 1e-3 {
                prop_assert_eq!(machine.state(), GameState::Won);
            }
            if total < 5.0 - 1e-3 {
                prop_assert_eq!(machine.state(), GameState::Active);
            }
        }

        #[test]
        fn prop_phase_timer_within_bounds(
            seed in any::<u64>(),
            steps in 1usize..600,
        ) {
            let config = LightConfig {
                total_game_seconds: 1000.0,
                ..LightConfig::default()
            };
            let (min_g, max_g) = (config.min_green_seconds, config.max_green_seconds);
            let (min_r, max_r) = (config.min_red_seconds, config.max_red_seconds);
            let mut machine = LightMachine::with_seed(config, seed).unwrap();
            machine.start();

            let dt = 0.1;
            for _ in 0..steps {
                let before = machine.phase();
                let timer_before = machine.phase_timer();
                machine.tick(dt);
                if machine.phase() != before {
                    // Flips only once the timer runs out
                    prop_assert!(timer_before - dt <= 0.0);
                    let (lo, hi) = match machine.phase() {
                        Phase::Green => (min_g, max_g),
                        Phase::Red => (min_r, max_r),
                    };
                    prop_assert!(machine.phase_timer() >= lo && machine.phase_timer() <= hi);
                }
            }
        }
    }
}
