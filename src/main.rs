//! Station Drift headless entry point
//!
//! Runs a scripted session with a recording surface and a logging audio
//! sink, then prints a summary. Windowed hosts embed the library instead.
//!
//! Usage: `station-drift [tuning.json] [settings.json]`
//! The seed comes from `STATION_DRIFT_SEED` (default 2024).

use station_drift::audio::LogSink;
use station_drift::platform::{Control, ScriptedControls};
use station_drift::renderer::RecordingSurface;
use station_drift::runner::Runner;
use station_drift::sim::{Game, GamePhase};
use station_drift::{Settings, Tuning};

const DEMO_FRAMES: u64 = 60 * 90;
const FRAME_SECS: f64 = 1.0 / 60.0;

/// Load a JSON config, falling back to defaults on any problem
fn load_or_default<T: Default>(
    path: Option<&str>,
    what: &str,
    parse: fn(&str) -> Result<T, serde_json::Error>,
) -> T {
    let Some(path) = path else {
        return T::default();
    };
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| parse(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(value) => {
            log::info!("loaded {} from {}", what, path);
            value
        }
        Err(e) => {
            log::warn!("could not load {} from {}: {}; using defaults", what, path, e);
            T::default()
        }
    }
}

/// Fly around shooting, warp and magwave in bursts, poke NPCs when docked
fn demo_script() -> ScriptedControls {
    let mut script = ScriptedControls::new()
        .tap(Control::Start, 1)
        .hold(Control::Fire, 2, DEMO_FRAMES);
    let mut t = 30;
    while t < DEMO_FRAMES {
        let dir = if (t / 240) % 2 == 0 { Control::Left } else { Control::Right };
        script = script
            .hold(dir, t, t + 90)
            .hold(Control::Up, t + 100, t + 140)
            .hold(Control::Down, t + 150, t + 190)
            .hold(Control::Magwave, t + 60, t + 120)
            .tap(Control::Action, t + 200);
        if (t / 240) % 3 == 0 {
            script = script.hold(Control::Warp, t + 20, t + 80);
        }
        t += 240;
    }
    // Pause briefly mid-run
    script.tap(Control::Pause, 1800).tap(Control::Pause, 1860)
}

fn main() {
    env_logger::init();
    log::info!("Station Drift (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let tuning = load_or_default(args.get(1).map(String::as_str), "tuning", Tuning::from_json);
    let settings = load_or_default(args.get(2).map(String::as_str), "settings", Settings::from_json);
    let seed = std::env::var("STATION_DRIFT_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);

    let mut runner = Runner::new(Game::new(seed, tuning, settings));
    let mut controls = demo_script();
    let mut audio = LogSink::default();
    let mut surface = RecordingSurface::default();
    let mut last_station = None;
    let mut ticks = 0u64;

    for frame in 0..DEMO_FRAMES {
        controls.tick = frame;
        let stats = runner.frame(frame as f64 * FRAME_SECS, &controls, &mut audio, &mut surface);
        ticks += stats.ticks as u64;

        if let Some(interior) = &runner.game.interior {
            if last_station != Some(interior.station_id) {
                last_station = Some(interior.station_id);
                log::info!(
                    "docked at station {}:\n{}",
                    interior.station_id,
                    interior.layout.grid.render_ascii()
                );
            }
        }
        if runner.game.phase() == GamePhase::GameOver {
            break;
        }
    }

    let game = &runner.game;
    let projectile_stats = game.world.projectiles.pool().stats();
    println!("seed:        {}", game.seed);
    println!("frames:      {} ({} ticks)", runner.frames(), ticks);
    println!("phase:       {:?}", game.phase());
    println!("score:       {}", game.session.progress.score);
    println!("level:       {}", game.session.progress.level);
    println!("docks:       {}", game.session.docks);
    println!("audio cues:  {}", audio.played);
    println!(
        "projectiles: {} acquired, {} overflowed",
        projectile_stats.acquired, projectile_stats.overflowed
    );
    println!("draw calls:  {}", surface.commands.len());
}
