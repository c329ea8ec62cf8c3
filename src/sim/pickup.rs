//! Collectible diamonds
//!
//! Idle diamonds ride the scroll, bob in place and can be pulled in by the
//! magnet. Once touched they fly to the HUD counter and are banked on arrival,
//! not on contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::move_towards;
use crate::settings::DiamondSettings;

/// Pickup lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupState {
    /// Bobbing in the world, can be touched
    Idle,
    /// Flying to the collect target; terminal
    Collected,
}

/// What a pickup needs from the outside world each frame
#[derive(Debug, Clone, Copy)]
pub struct PickupEnv {
    pub magnet_active: bool,
    pub player_position: Vec2,
    /// Where collected pickups fly to (world space)
    pub collect_target: Vec2,
    /// Run time in seconds (drives bobbing)
    pub time: f32,
}

/// Result of a pickup update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupUpdate {
    Alive,
    /// Reached the collect target; remove and credit
    Banked,
}

/// A diamond
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    /// Rendered position (anchor plus bob, or flight position)
    pub position: Vec2,
    /// Rest position that scrolls with the cave
    pub anchor: Vec2,
    pub scale: f32,
    pub base_scale: f32,
    pub radius: f32,
    pub state: PickupState,
    /// Bob phase offset so neighbours don't move in lockstep
    phase: f32,
    #[serde(default)]
    banked: bool,
}

impl Pickup {
    pub fn new(id: u32, anchor: Vec2, phase: f32, tuning: &DiamondSettings) -> Self {
        Self {
            id,
            position: anchor,
            anchor,
            scale: tuning.scale,
            base_scale: tuning.scale,
            radius: tuning.collider_radius * tuning.scale,
            state: PickupState::Idle,
            phase,
            banked: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == PickupState::Idle
    }

    /// Trigger region; collected pickups no longer collide
    pub fn bounds(&self) -> Option<Aabb> {
        self.is_idle()
            .then(|| Aabb::new(self.position, Vec2::splat(self.radius * 2.0)))
    }

    /// Scroll with the cave (idle only; flying pickups are screen-bound)
    pub fn scroll(&mut self, dx: f32) {
        if self.is_idle() {
            self.anchor.x -= dx;
            self.position.x -= dx;
        }
    }

    /// Player touched this pickup. Returns false if it was already collected.
    pub fn collect(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = PickupState::Collected;
        true
    }

    /// Animate one frame
    pub fn update(&mut self, dt: f32, env: &PickupEnv, tuning: &DiamondSettings) -> PickupUpdate {
        match self.state {
            PickupState::Idle => {
                self.update_idle(dt, env, tuning);
                PickupUpdate::Alive
            }
            PickupState::Collected => self.update_flight(dt, env, tuning),
        }
    }

    fn update_idle(&mut self, dt: f32, env: &PickupEnv, tuning: &DiamondSettings) {
        if env.magnet_active && self.position.distance(env.player_position) < tuning.magnet_range {
            let pulled = move_towards(self.position, env.player_position, tuning.magnet_speed * dt);
            self.position = pulled;
            self.anchor = pulled;
            return;
        }

        let t = env.time + self.phase;
        let bob = (t * tuning.bob_speed).sin() * tuning.bob_height;
        self.position = self.anchor + Vec2::new(0.0, bob);
        self.scale = self.base_scale * (1.0 + (t * tuning.pulse_speed).sin() * tuning.pulse_amount);
    }

    fn update_flight(&mut self, dt: f32, env: &PickupEnv, tuning: &DiamondSettings) -> PickupUpdate {
        if self.banked {
            return PickupUpdate::Alive;
        }
        self.position = move_towards(self.position, env.collect_target, tuning.fly_speed * dt);
        let shrink = (tuning.fly_shrink_speed * dt).clamp(0.0, 1.0);
        self.scale += (0.0 - self.scale) * shrink;

        if self.position.distance(env.collect_target) < tuning.collect_epsilon {
            self.banked = true;
            return PickupUpdate::Banked;
        }
        PickupUpdate::Alive
    }
}
