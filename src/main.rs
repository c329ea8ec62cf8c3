//! Cave Runner headless host
//!
//! Drives a run without rendering: loads settings, steps the stream at a fixed
//! rate, plays a trivial autopilot that rides the cave centerline, ends the run
//! on the first spike it touches, and logs a summary.
//!
//! Usage: `cave-runner [settings.json] [seconds]`

use cave_runner::WorldSettings;
use cave_runner::consts::DEMO_DT;
use cave_runner::sim::{Aabb, RunClock, WorldContext, WorldEvent, WorldStream};
use glam::Vec2;

const DEFAULT_SECONDS: f32 = 60.0;
const PLAYER_RADIUS: f32 = 0.35;

fn load_settings(path: Option<&str>) -> Result<WorldSettings, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let settings = WorldSettings::from_json(&json)?;
            log::info!("Loaded settings from {path}");
            Ok(settings)
        }
        None => {
            log::info!("Using default settings");
            Ok(WorldSettings::default())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = load_settings(args.first().map(String::as_str))?;
    let seconds = match args.get(1) {
        Some(s) => s.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };

    let clock = RunClock::new(&settings);
    let mut stream = WorldStream::with_entropy(settings, clock)?;
    log::info!("Cave Runner (headless) simulating {seconds}s");

    let mut hazards = 0u32;
    let mut spawned = 0u32;
    let frames = (seconds / DEMO_DT).ceil() as u32;

    for _ in 0..frames {
        if stream.context().is_game_over() {
            break;
        }
        stream.context_mut().tick(DEMO_DT);
        stream.tick(DEMO_DT);

        // Autopilot: hover on the centerline of the segment under the player
        let player_x = stream.context().player_position.x;
        let ride_y = stream
            .segments()
            .min_by(|a, b| {
                (a.x - player_x)
                    .abs()
                    .partial_cmp(&(b.x - player_x).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|seg| seg.centerline())
            .unwrap_or(0.0);
        stream.context_mut().player_position.y = ride_y;
        let player = stream.context().player_position;

        let body = Aabb::new(player, Vec2::splat(PLAYER_RADIUS * 2.0));
        let touched: Vec<u32> = stream
            .pickups()
            .iter()
            .filter(|p| p.bounds().is_some_and(|b| b.overlaps(&body)))
            .map(|p| p.id)
            .collect();
        for id in touched {
            stream.on_pickup_collected(id);
        }

        let hit = stream
            .segments()
            .flat_map(|seg| seg.hazard_bounds())
            .any(|b| b.overlaps_circle(player, PLAYER_RADIUS));
        if hit {
            stream.context_mut().end_run();
            stream.on_game_over();
        }

        let events = stream.drain_events();
        for event in &events {
            match event {
                WorldEvent::HazardPlaced { .. } => hazards += 1,
                WorldEvent::DiamondSpawned { .. } => spawned += 1,
                _ => {}
            }
        }
        stream.context_mut().apply(&events);
    }

    let clock = stream.context();
    println!(
        "Survived {}s ({:?}): speed {:.2}, {} live segments, {} hazards, {} diamonds spawned, {} banked",
        clock.display_score(),
        stream.phase(),
        clock.scroll_speed(),
        stream.segments().len(),
        hazards,
        spawned,
        clock.diamonds
    );
    Ok(())
}
