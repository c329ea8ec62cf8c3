//! Per-run game clock
//!
//! Tracks survival time (the score), derives difficulty and scroll speed from
//! it, and banks diamonds reported by the stream. The host owns player-side
//! facts (position, magnet power-up) and writes them here each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::stream::{WorldContext, WorldEvent};
use crate::settings::WorldSettings;

/// Difficulty growth per second of survival (scaled by 0.01)
pub const DEFAULT_DIFFICULTY_RATE: f32 = 0.1;

/// Score, difficulty and currency for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunClock {
    /// Seconds survived
    pub score: f32,
    pub diamonds: u32,
    pub game_over: bool,
    pub difficulty_rate: f32,
    /// Power-up speed multiplier (1.0 = none)
    pub speed_multiplier: f32,
    pub magnet_active: bool,
    pub player_position: Vec2,
    /// HUD diamond counter in world space
    pub collect_target: Vec2,
    base_scroll_speed: f32,
    max_scroll_speed: f32,
}

impl RunClock {
    pub fn new(settings: &WorldSettings) -> Self {
        Self {
            score: 0.0,
            diamonds: 0,
            game_over: false,
            difficulty_rate: DEFAULT_DIFFICULTY_RATE,
            speed_multiplier: 1.0,
            magnet_active: false,
            player_position: Vec2::new(-6.0, 0.0),
            collect_target: Vec2::new(settings.spawn_x - 2.0, settings.max_wave_y + settings.gap_height),
            base_scroll_speed: settings.base_scroll_speed,
            max_scroll_speed: settings.max_scroll_speed,
        }
    }

    /// Difficulty multiplier, starting at 1.0
    pub fn difficulty(&self) -> f32 {
        1.0 + self.score * self.difficulty_rate * 0.01
    }

    /// Whole seconds survived, as shown to the player
    pub fn display_score(&self) -> u32 {
        self.score.floor() as u32
    }

    /// Advance survival time; frozen after game over
    pub fn tick(&mut self, dt: f32) {
        if !self.game_over && dt > 0.0 {
            self.score += dt;
        }
    }

    pub fn end_run(&mut self) {
        if !self.game_over {
            log::info!(
                "run over: score {}, diamonds {}",
                self.display_score(),
                self.diamonds
            );
            self.game_over = true;
        }
    }

    /// Apply stream events that affect the run (diamond credit)
    pub fn apply(&mut self, events: &[WorldEvent]) {
        for event in events {
            if let WorldEvent::DiamondBanked { .. } = event {
                self.diamonds += 1;
            }
        }
    }
}

impl WorldContext for RunClock {
    fn scroll_speed(&self) -> f32 {
        (self.base_scroll_speed * self.difficulty() * self.speed_multiplier).min(self.max_scroll_speed)
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn magnet_active(&self) -> bool {
        self.magnet_active
    }

    fn player_position(&self) -> Vec2 {
        self.player_position
    }

    fn collect_target(&self) -> Vec2 {
        self.collect_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_starts_at_base_and_caps() {
        let settings = WorldSettings::default();
        let mut clock = RunClock::new(&settings);
        assert_eq!(clock.scroll_speed(), settings.base_scroll_speed);

        // 1000s at 0.1 rate -> difficulty 2.0 -> 8.0 (cap)
        clock.score = 1000.0;
        assert!((clock.difficulty() - 2.0).abs() < 1e-5);
        clock.score = 5000.0;
        assert_eq!(clock.scroll_speed(), settings.max_scroll_speed);
    }

    #[test]
    fn test_score_freezes_on_game_over() {
        let mut clock = RunClock::new(&WorldSettings::default());
        clock.tick(1.5);
        assert_eq!(clock.display_score(), 1);
        clock.end_run();
        clock.tick(10.0);
        assert_eq!(clock.score, 1.5);
        assert!(clock.is_game_over());
    }

    #[test]
    fn test_apply_banks_diamonds() {
        let mut clock = RunClock::new(&WorldSettings::default());
        clock.apply(&[
            WorldEvent::DiamondBanked { pickup_id: 3 },
            WorldEvent::DiamondSpawned {
                pickup_id: 4,
                position: Vec2::ZERO,
            },
            WorldEvent::DiamondBanked { pickup_id: 5 },
        ]);
        assert_eq!(clock.diamonds, 2);
    }

    #[test]
    fn test_speed_multiplier() {
        let settings = WorldSettings::default();
        let mut clock = RunClock::new(&settings);
        clock.speed_multiplier = 1.5;
        assert!((clock.scroll_speed() - 6.0).abs() < 1e-5);
    }
}
