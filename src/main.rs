//! Ember Run headless runner
//!
//! Plays the campaign (or a generated world) with a scripted input pattern,
//! feeding sound events to a logging audio backend and draw commands to a
//! recording surface. Useful for soak-testing the simulation.
//!
//! Usage: ember-run [--seed N] [--settings PATH] [--ticks N]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use ember_run::audio::{AudioManager, LogSink};
    use ember_run::render::{DrawCommand, FrameTable, RecordingSurface};
    use ember_run::sim::{TickInput, tick};
    use ember_run::{Session, SessionStatus, Settings, world};

    env_logger::init();

    let mut seed: Option<u64> = None;
    let mut settings_path = PathBuf::from("ember-run-settings.json");
    let mut max_ticks: u64 = 20_000;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => seed = args.next().and_then(|s| s.parse().ok()),
            "--settings" => {
                if let Some(path) = args.next() {
                    settings_path = PathBuf::from(path);
                }
            }
            "--ticks" => {
                if let Some(n) = args.next().and_then(|s| s.parse().ok()) {
                    max_ticks = n;
                }
            }
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }

    let settings = Settings::load(&settings_path);
    let frame_ms = settings.frame_budget_ms();
    let mut audio = AudioManager::new(LogSink);
    audio.apply_settings(&settings);

    let worlds = match seed {
        Some(seed) => vec![world::generate(seed)],
        None => world::campaign(),
    };
    let mut session = Session::new(worlds);
    session.show_outlines = settings.show_platform_outlines;

    let frames = FrameTable::new();
    let mut surface = RecordingSurface::new();
    let mut missing_frames = 0usize;
    let mut wall_ms: u64 = 0;
    let mut total_ticks: u64 = 0;

    log::info!("Ember Run (headless) starting");

    while let Some(mut state) = session.start_level(wall_ms) {
        if let Some(config) = session.current_world() {
            audio.play_music(&config.music);
        }
        loop {
            wall_ms += frame_ms;
            total_ticks += 1;
            let input = TickInput {
                now_ms: wall_ms,
                right: true,
                jump: total_ticks % 45 == 0,
                fire: total_ticks % 20 == 0,
                up: true,
                ..Default::default()
            };
            tick(&mut state, &input);
            audio.handle_events(&state.drain_events());

            surface.clear();
            state.render(&mut surface);
            missing_frames += surface
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Sprite { key, .. } if frames.index(*key).is_none()))
                .count();

            if state.outcome() != ember_run::sim::LevelOutcome::Running || total_ticks >= max_ticks {
                break;
            }
        }
        audio.stop_music();

        if total_ticks >= max_ticks && state.outcome() == ember_run::sim::LevelOutcome::Running {
            log::info!("Tick budget of {} reached", max_ticks);
            break;
        }
        if session.finish_level(&state) != SessionStatus::InProgress {
            break;
        }
    }

    println!(
        "status={:?} world={} lives={} coins={} ticks={} missing_frames={}",
        session.status,
        session.world_number(),
        session.lives,
        session.coins,
        total_ticks,
        missing_frames
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is driven by the embedding page
}
