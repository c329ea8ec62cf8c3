//! Cave streaming
//!
//! Owns every live segment and pickup. Each frame it eases the centerline,
//! scrolls and culls what fell behind the trailing edge, then builds new
//! segments until the spawn cursor reaches the spawn edge again.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dice::{Dice, SeededDice};
use super::pickup::{Pickup, PickupEnv, PickupUpdate};
use super::placement::{Obstacle, PlacementPolicy};
use super::segment::{Segment, SegmentFactory};
use super::wave::PathWave;
use crate::settings::{ConfigError, WorldSettings};

/// Read-only view of the game the stream runs inside
pub trait WorldContext {
    /// Current scroll speed (units per second)
    fn scroll_speed(&self) -> f32;

    fn is_game_over(&self) -> bool;

    fn magnet_active(&self) -> bool {
        false
    }

    fn player_position(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// World-space point collected pickups fly to
    fn collect_target(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Stream lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamPhase {
    /// Building the hazard-free starting window
    Filling,
    /// Steady-state spawning and retiring
    Streaming,
    /// Game over: frozen, still visible
    Stopped,
}

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    PhaseChanged { from: StreamPhase, to: StreamPhase },
    HazardPlaced { segment_id: u32, obstacle: Obstacle },
    DiamondSpawned { pickup_id: u32, position: Vec2 },
    /// A collected diamond reached its target; credit the player now
    DiamondBanked { pickup_id: u32 },
}

/// The world generator
#[derive(Debug)]
pub struct WorldStream<C: WorldContext, D: Dice = SeededDice> {
    settings: WorldSettings,
    context: C,
    dice: D,
    phase: StreamPhase,
    wave: PathWave,
    factory: SegmentFactory,
    policy: PlacementPolicy,
    /// Newest (largest x) at the front, oldest at the back
    segments: VecDeque<Segment>,
    pickups: Vec<Pickup>,
    events: Vec<WorldEvent>,
    /// x of the most recently created segment
    spawn_cursor: f32,
    /// Segment budget for a single frame
    max_spawn_per_tick: usize,
    time: f32,
    next_id: u32,
}

impl<C: WorldContext> WorldStream<C, SeededDice> {
    /// Stream seeded from system entropy
    pub fn with_entropy(settings: WorldSettings, context: C) -> Result<Self, ConfigError> {
        let dice = SeededDice::from_entropy();
        log::info!("cave seed {}", dice.seed());
        Self::new(settings, context, dice)
    }
}

impl<C: WorldContext, D: Dice> WorldStream<C, D> {
    /// Validate settings and build the starting window
    pub fn new(settings: WorldSettings, context: C, dice: D) -> Result<Self, ConfigError> {
        settings.validate()?;

        let window = settings.window_segments();
        let mut stream = Self {
            wave: PathWave::new(&settings),
            factory: SegmentFactory::new(&settings),
            policy: PlacementPolicy::new(&settings),
            context,
            dice,
            phase: StreamPhase::Filling,
            segments: VecDeque::with_capacity(window + 2),
            pickups: Vec::new(),
            events: Vec::new(),
            spawn_cursor: settings.destroy_x,
            max_spawn_per_tick: window + 2,
            time: 0.0,
            next_id: 1,
            settings,
        };
        stream.fill_initial();
        log::info!(
            "cave stream ready: {} segments in [{}, {}]",
            stream.segments.len(),
            stream.settings.destroy_x,
            stream.settings.spawn_x
        );
        stream.set_phase(StreamPhase::Streaming);
        Ok(stream)
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Host-side access to the context (difficulty clock, player state)
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Live segments, newest (largest x) first
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Segment> + DoubleEndedIterator {
        self.segments.iter()
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn centerline(&self) -> f32 {
        self.wave.current()
    }

    pub fn spawn_cursor(&self) -> f32 {
        self.spawn_cursor
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// External game-over notification. There is no way back.
    pub fn on_game_over(&mut self) {
        if self.phase != StreamPhase::Stopped {
            self.set_phase(StreamPhase::Stopped);
        }
    }

    /// Collision layer reports the player touched pickup `id`.
    ///
    /// Returns true if the pickup was idle and is now flying.
    pub fn on_pickup_collected(&mut self, id: u32) -> bool {
        match self.pickups.iter_mut().find(|p| p.id == id) {
            Some(pickup) => pickup.collect(),
            None => false,
        }
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) {
        if self.phase == StreamPhase::Stopped {
            return;
        }
        if self.context.is_game_over() {
            self.on_game_over();
            return;
        }

        let dt = self.sanitize_dt(dt);
        let speed = self.sanitize_speed(self.context.scroll_speed());
        self.time += dt;

        let centerline = self.wave.advance(dt, &mut self.dice);

        let dx = speed * dt;
        self.shift_and_cull(dx);
        self.stream_in(dx, centerline);
        self.update_pickups(dt);
    }

    fn sanitize_dt(&self, dt: f32) -> f32 {
        if !(dt >= 0.0) {
            log::warn!("ignoring invalid frame dt {dt}");
            0.0
        } else if dt > self.settings.max_frame_dt {
            log::warn!("frame dt {dt:.3}s clamped to {}", self.settings.max_frame_dt);
            self.settings.max_frame_dt
        } else {
            dt
        }
    }

    fn sanitize_speed(&self, speed: f32) -> f32 {
        let max = self.settings.max_scroll_speed;
        if !(speed >= 0.0) {
            log::warn!("scroll speed {speed} clamped to 0");
            0.0
        } else if speed > max {
            log::warn!("scroll speed {speed} clamped to {max}");
            max
        } else {
            speed
        }
    }

    fn shift_and_cull(&mut self, dx: f32) {
        for segment in self.segments.iter_mut() {
            segment.x -= dx;
        }
        // Only the oldest end is ever retired
        while self
            .segments
            .back()
            .is_some_and(|s| s.x < self.settings.destroy_x)
        {
            self.segments.pop_back();
        }

        for pickup in self.pickups.iter_mut() {
            pickup.scroll(dx);
        }
        let destroy_x = self.settings.destroy_x;
        self.pickups
            .retain(|p| !(p.is_idle() && p.anchor.x < destroy_x));
    }

    fn stream_in(&mut self, dx: f32, centerline: f32) {
        self.spawn_cursor -= dx;
        // Everything scrolled out: restart just behind the trailing edge
        if !(self.spawn_cursor >= self.settings.destroy_x) {
            log::warn!(
                "spawn cursor {} fell behind destroy_x, refilling window",
                self.spawn_cursor
            );
            self.spawn_cursor = self.settings.destroy_x - self.settings.segment_width;
        }
        let mut spawned = 0;
        while self.spawn_cursor < self.settings.spawn_x {
            if spawned == self.max_spawn_per_tick {
                log::warn!("spawn cap of {spawned} segments reached this frame");
                break;
            }
            self.spawn_cursor += self.settings.segment_width;
            self.spawn_segment(self.spawn_cursor, centerline, false);
            spawned += 1;
        }
    }

    fn update_pickups(&mut self, dt: f32) {
        let env = PickupEnv {
            magnet_active: self.context.magnet_active(),
            player_position: self.context.player_position(),
            collect_target: self.context.collect_target(),
            time: self.time,
        };
        let tuning = &self.settings.diamond;
        let events = &mut self.events;
        self.pickups.retain_mut(|pickup| match pickup.update(dt, &env, tuning) {
            PickupUpdate::Alive => true,
            PickupUpdate::Banked => {
                events.push(WorldEvent::DiamondBanked {
                    pickup_id: pickup.id,
                });
                false
            }
        });
    }

    /// Cover the whole window with flat, hazard-free cave
    fn fill_initial(&mut self) {
        let count = self.settings.window_segments();
        for i in 0..=count {
            let x = self.settings.destroy_x + i as f32 * self.settings.segment_width;
            self.spawn_segment(x, self.wave.current(), true);
            self.spawn_cursor = x;
        }
    }

    fn spawn_segment(&mut self, x: f32, centerline: f32, is_initial_fill: bool) {
        let id = self.next_entity_id();
        let mut segment = self.factory.create(id, x, centerline);
        let placement = self.policy.decide(x, is_initial_fill, &mut self.dice);

        segment.is_hole = placement.is_hole();
        if let Obstacle::Spikes(cluster) = placement.obstacle {
            segment.hazards = self.factory.spike_cluster(
                &segment,
                cluster.mount,
                cluster.count,
                cluster.width,
                cluster.height,
            );
        }
        if placement.starts_hazard() {
            self.events.push(WorldEvent::HazardPlaced {
                segment_id: id,
                obstacle: placement.obstacle,
            });
        }

        if placement.diamond {
            let pickup_id = self.next_entity_id();
            let phase = self.dice.range_f32(0.0, std::f32::consts::TAU);
            let tuning = &self.settings.diamond;
            let anchor = Vec2::new(x, segment.floor_top_y + tuning.floor_clearance);
            self.pickups.push(Pickup::new(pickup_id, anchor, phase, tuning));
            self.events.push(WorldEvent::DiamondSpawned {
                pickup_id,
                position: anchor,
            });
        }

        self.segments.push_front(segment);
    }

    fn set_phase(&mut self, to: StreamPhase) {
        let from = self.phase;
        self.phase = to;
        log::info!("cave stream {from:?} -> {to:?}");
        self.events.push(WorldEvent::PhaseChanged { from, to });
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
