//! Squid AR headless driver
//!
//! Runs scripted red light/green light and glass bridge rounds through the
//! same frame loop an engine would, logging every event.
//!
//! Usage: `squid-ar [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use squid_ar::GameConfig;

    env_logger::init();
    log::info!("Squid AR (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    if let Err(e) = headless::run_light_round(&config, seed) {
        log::error!("{e}");
        std::process::exit(1);
    }
    if let Err(e) = headless::run_bridge_round(&config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds embed the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::{Quat, Vec3};

    use squid_ar::sim::{
        BridgePhase, CueScheduler, DollHead, FrameClock, GameEvent, GameState, GlassBridge,
        LightMachine, Phase, Pose, Surface,
    };
    use squid_ar::{ConfigError, GameConfig, format_clock};

    /// Engine frame rate being simulated
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Player starts fidgeting after this long
    const FIDGET_AFTER: f32 = 20.0;

    /// Log events and forward cues to the scheduler
    fn present(events: &[GameEvent], cues: &mut CueScheduler, mut doll: Option<&mut DollHead>) {
        for event in events {
            match event {
                GameEvent::TimerUpdated(_) => {}
                GameEvent::PhaseChanged(phase) => {
                    log::info!("Light: {phase:?}");
                    if let Some(doll) = doll.as_deref_mut() {
                        doll.on_phase(*phase);
                    }
                }
                other => log::info!("Event: {other:?}"),
            }
        }
        cues.extend_from_events(events);
    }

    pub fn run_light_round(config: &GameConfig, seed: u64) -> Result<(), ConfigError> {
        let mut machine = LightMachine::with_seed(config.light.clone(), seed)?;
        let mut clock = FrameClock::default();
        let mut cues = CueScheduler::new();
        let mut doll = DollHead::default();

        machine.start();
        let mut time = 0.0f32;
        let mut last_label = String::new();
        let limit = config.light.total_game_seconds + 10.0;

        while time < limit {
            time += FRAME_DT;
            for _ in 0..clock.advance(FRAME_DT) {
                // Hold still at first, then start swaying on red
                let sway = if time > FIDGET_AFTER && machine.phase() == Phase::Red {
                    (time * 40.0).sin() * 0.05
                } else {
                    0.0
                };
                machine.set_observer_pose(Pose::new(
                    Vec3::new(sway, 1.6, 0.0),
                    Quat::from_rotation_y(sway * 0.1),
                ));
                machine.tick(clock.step());
                doll.update(clock.step());

                let events = machine.drain_events();
                present(&events, &mut cues, Some(&mut doll));
            }

            for cue in cues.advance(FRAME_DT) {
                log::info!("[{:>6.2}s] play {cue:?}", time);
            }

            let label = format_clock(machine.remaining());
            if label != last_label {
                log::debug!("Timer {label}");
                last_label = label;
            }

            if machine.state().is_terminal() && cues.is_empty() {
                break;
            }
        }

        match machine.state() {
            GameState::Won => log::info!("Light round: survived"),
            GameState::Eliminated => log::info!("Light round: eliminated at {time:.2}s"),
            other => log::info!("Light round ended {other:?}"),
        }
        Ok(())
    }

    pub fn run_bridge_round(config: &GameConfig) -> Result<(), ConfigError> {
        let mut bridge = GlassBridge::new(config.bridge.clone())?;
        let mut clock = FrameClock::default();
        let mut cues = CueScheduler::new();

        bridge.start();
        present(&bridge.drain_events(), &mut cues, None);

        let mut time = 0.0f32;
        while bridge.phase() != BridgePhase::Over && time < 60.0 {
            time += FRAME_DT;
            for _ in 0..clock.advance(FRAME_DT) {
                // Walk off the start ground onto the first pane of lane 0
                let below = match bridge.phase() {
                    _ if time < 1.0 => Surface::Ground,
                    BridgePhase::Running => Surface::Glass { lane: 0, index: 0 },
                    _ if bridge.fall_offset().z < -10.0 => Surface::DeadZone,
                    _ => Surface::Nothing,
                };
                bridge.tick(clock.step(), below);
                present(&bridge.drain_events(), &mut cues, None);
            }
            for cue in cues.advance(FRAME_DT) {
                log::info!("[{:>6.2}s] play {cue:?}", time);
            }
        }

        log::info!(
            "Bridge round: {:?} after {time:.2}s, dropped {:.1}",
            bridge.phase(),
            -bridge.fall_offset().z
        );
        Ok(())
    }
}
