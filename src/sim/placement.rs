//! Hazard and pickup placement
//!
//! Decides, once per freshly built segment, whether a hole starts, a spike
//! cluster is attached, or a diamond spawns. Spacing is tracked in generated
//! distance so a placement can never follow another closer than the
//! configured gap. Ordering of the checks keeps holes free of spikes and
//! diamonds.

use serde::{Deserialize, Serialize};

use super::dice::Dice;
use super::segment::Mount;
use crate::settings::WorldSettings;

/// Spike cluster size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeSize {
    Small,
    Big,
}

/// A spike cluster to attach to the current segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeCluster {
    pub mount: Mount,
    pub size: SpikeSize,
    pub count: u32,
    pub width: f32,
    pub height: f32,
}

/// Obstacle outcome for a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    None,
    /// This segment's floor is part of a running hole
    HoleContinuation,
    /// A hole of `segments` segments begins after this one
    HoleStart { segments: u32 },
    Spikes(SpikeCluster),
}

/// Full decision for one segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub obstacle: Obstacle,
    pub diamond: bool,
}

impl Placement {
    pub const EMPTY: Placement = Placement {
        obstacle: Obstacle::None,
        diamond: false,
    };

    /// Segment floor is non-solid
    pub fn is_hole(&self) -> bool {
        matches!(self.obstacle, Obstacle::HoleContinuation)
    }

    /// A new hazard event begins at this segment
    pub fn starts_hazard(&self) -> bool {
        matches!(self.obstacle, Obstacle::HoleStart { .. } | Obstacle::Spikes(_))
    }
}

/// Stateful spacing gatekeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementPolicy {
    distance_since_hazard: f32,
    distance_since_pickup: f32,
    hole_segments_remaining: u32,
    segment_width: f32,
    min_hazard_x: f32,
    spike_chance: f32,
    min_spikes_gap: f32,
    min_spike_count: u32,
    max_spike_count: u32,
    small_spike: (f32, f32),
    big_spike: (f32, f32),
    hole_segments: u32,
    diamond_chance: f32,
    min_diamond_gap: f32,
}

impl PlacementPolicy {
    /// Fresh policy; both gaps start satisfied so the first eligible roll may place
    pub fn new(settings: &WorldSettings) -> Self {
        Self {
            distance_since_hazard: settings.min_spikes_gap,
            distance_since_pickup: settings.min_diamond_gap,
            hole_segments_remaining: 0,
            segment_width: settings.segment_width,
            min_hazard_x: settings.min_hazard_x,
            spike_chance: settings.spike_chance,
            min_spikes_gap: settings.min_spikes_gap,
            min_spike_count: settings.min_spike_count,
            max_spike_count: settings.max_spike_count,
            small_spike: (settings.small_spike_width, settings.small_spike_height),
            big_spike: (settings.big_spike_width, settings.big_spike_height),
            hole_segments: (settings.hole_width / settings.segment_width).ceil() as u32,
            diamond_chance: settings.diamond_chance,
            min_diamond_gap: settings.min_diamond_gap,
        }
    }

    pub fn hole_segments_remaining(&self) -> u32 {
        self.hole_segments_remaining
    }

    pub fn hole_in_progress(&self) -> bool {
        self.hole_segments_remaining > 0
    }

    pub fn distance_since_hazard(&self) -> f32 {
        self.distance_since_hazard
    }

    pub fn distance_since_pickup(&self) -> f32 {
        self.distance_since_pickup
    }

    /// Decide what the segment created at `x` carries.
    ///
    /// The initial fill never rolls and never advances spacing state.
    pub fn decide(&mut self, x: f32, is_initial_fill: bool, dice: &mut impl Dice) -> Placement {
        if is_initial_fill {
            return Placement::EMPTY;
        }

        let obstacle = if self.hole_segments_remaining > 0 {
            self.hole_segments_remaining -= 1;
            Obstacle::HoleContinuation
        } else {
            self.roll_obstacle(x, dice)
        };

        // A diamond never sits over a hole, including the segment that opens one
        self.distance_since_pickup += self.segment_width;
        let over_hole = matches!(obstacle, Obstacle::HoleContinuation) || self.hole_segments_remaining > 0;
        let diamond = !over_hole
            && self.distance_since_pickup >= self.min_diamond_gap
            && dice.chance(self.diamond_chance);
        if diamond {
            self.distance_since_pickup = 0.0;
        }

        Placement { obstacle, diamond }
    }

    fn roll_obstacle(&mut self, x: f32, dice: &mut impl Dice) -> Obstacle {
        self.distance_since_hazard += self.segment_width;
        if x <= self.min_hazard_x
            || self.distance_since_hazard < self.min_spikes_gap
            || !dice.chance(self.spike_chance)
        {
            return Obstacle::None;
        }

        self.distance_since_hazard = 0.0;
        match dice.below(3) {
            0 => {
                self.hole_segments_remaining = self.hole_segments;
                log::debug!("hole of {} segments after x={x:.2}", self.hole_segments);
                Obstacle::HoleStart {
                    segments: self.hole_segments,
                }
            }
            kind => {
                let size = if kind == 1 { SpikeSize::Big } else { SpikeSize::Small };
                let (width, height) = match size {
                    SpikeSize::Big => self.big_spike,
                    SpikeSize::Small => self.small_spike,
                };
                let mount = if dice.coin() { Mount::Floor } else { Mount::Ceiling };
                let count = dice.between(self.min_spike_count, self.max_spike_count);
                log::debug!("{count} {size:?} spikes on {mount:?} at x={x:.2}");
                Obstacle::Spikes(SpikeCluster {
                    mount,
                    size,
                    count,
                    width,
                    height,
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sim::dice::SeededDice;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    /// Replays scripted unit draws, then falls back to a constant
    #[derive(Debug, Clone)]
    pub(crate) struct ScriptedDice {
        pub units: VecDeque<f32>,
        pub fallback: f32,
    }

    impl ScriptedDice {
        pub fn constant(value: f32) -> Self {
            Self {
                units: VecDeque::new(),
                fallback: value,
            }
        }

        pub fn script(units: &[f32], fallback: f32) -> Self {
            Self {
                units: units.iter().copied().collect(),
                fallback,
            }
        }
    }

    impl Dice for ScriptedDice {
        fn unit(&mut self) -> f32 {
            self.units.pop_front().unwrap_or(self.fallback)
        }

        fn below(&mut self, n: u32) -> u32 {
            ((self.unit() * n as f32) as u32).min(n - 1)
        }
    }

    fn settings() -> WorldSettings {
        WorldSettings {
            segment_width: 1.0,
            hole_width: 3.0,
            min_spikes_gap: 3.0,
            min_diamond_gap: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_fill_places_nothing() {
        let mut policy = PlacementPolicy::new(&settings());
        let mut dice = ScriptedDice::constant(0.0);
        for i in 0..50 {
            assert_eq!(policy.decide(10.0 + i as f32, true, &mut dice), Placement::EMPTY);
        }
        assert_eq!(policy.distance_since_hazard(), 3.0);
    }

    #[test]
    fn test_no_hazard_before_start_offset() {
        let mut policy = PlacementPolicy::new(&settings());
        // Every roll would pass
        let mut dice = ScriptedDice::constant(0.0);
        let placement = policy.decide(5.0, false, &mut dice);
        assert_eq!(placement.obstacle, Obstacle::None);
    }

    #[test]
    fn test_forced_hole_spans_three_segments_without_diamonds() {
        let mut policy = PlacementPolicy::new(&WorldSettings {
            diamond_chance: 1.0,
            ..settings()
        });
        // spike roll passes (0.0), kind draw selects hole (0.0), diamond roll
        // would succeed on every later segment (0.0)
        let mut dice = ScriptedDice::constant(0.0);

        let first = policy.decide(10.0, false, &mut dice);
        assert_eq!(first.obstacle, Obstacle::HoleStart { segments: 3 });
        assert!(!first.diamond);

        let mut holes = 0;
        for i in 1..=3 {
            let p = policy.decide(10.0 + i as f32, false, &mut dice);
            assert!(p.is_hole());
            assert!(!p.diamond, "diamond over hole at segment {i}");
            holes += 1;
        }
        assert_eq!(holes, 3);
        assert!(!policy.hole_in_progress());

        let after = policy.decide(14.0, false, &mut dice);
        assert!(!after.is_hole());
        assert!(after.diamond);
    }

    #[test]
    fn test_spike_gap_suppresses_close_follow_up() {
        let mut policy = PlacementPolicy::new(&WorldSettings {
            diamond_chance: 0.0,
            ..settings()
        });
        // Spike roll passes, kind draw 0.5 selects big spikes
        let mut first_roll = ScriptedDice::script(&[0.0, 0.5], 0.5);
        let first = policy.decide(10.0, false, &mut first_roll);
        assert!(matches!(
            first.obstacle,
            Obstacle::Spikes(SpikeCluster {
                size: SpikeSize::Big,
                ..
            })
        ));

        // One and two units later: suppressed even though every roll passes
        let mut always = ScriptedDice::constant(0.0);
        assert_eq!(policy.decide(11.0, false, &mut always).obstacle, Obstacle::None);
        assert_eq!(policy.decide(12.0, false, &mut always).obstacle, Obstacle::None);
        assert_eq!(policy.distance_since_hazard(), 2.0);

        // Three units later the gap is met and the next event goes through
        let third = policy.decide(13.0, false, &mut always);
        assert!(third.starts_hazard());
        assert_eq!(policy.distance_since_hazard(), 0.0);
    }

    #[test]
    fn test_spike_cluster_respects_count_range() {
        let s = settings();
        let mut policy = PlacementPolicy::new(&s);
        // pass, kind=Small (0.9 * 3 = 2), coin ceiling (0.1), count draw top (0.99)
        let mut dice = ScriptedDice::script(&[0.0, 0.9, 0.1, 0.99], 1.0);
        match policy.decide(10.0, false, &mut dice).obstacle {
            Obstacle::Spikes(cluster) => {
                assert_eq!(cluster.size, SpikeSize::Small);
                assert_eq!(cluster.mount, Mount::Ceiling);
                assert_eq!(cluster.count, s.max_spike_count);
                assert_eq!(cluster.width, s.small_spike_width);
            }
            other => panic!("expected spikes, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_chances_place_nothing() {
        let mut policy = PlacementPolicy::new(&WorldSettings {
            spike_chance: 0.0,
            diamond_chance: 0.0,
            ..settings()
        });
        let mut dice = SeededDice::new(5);
        for i in 0..500 {
            assert_eq!(policy.decide(6.0 + i as f32, false, &mut dice), Placement::EMPTY);
        }
    }

    proptest! {
        #[test]
        fn prop_spacing_and_exclusion(seed in any::<u64>(), chance in 0.0f32..=1.0, diamond in 0.0f32..=1.0) {
            let s = WorldSettings { spike_chance: chance, diamond_chance: diamond, ..settings() };
            let mut policy = PlacementPolicy::new(&s);
            let mut dice = SeededDice::new(seed);
            let mut last_hazard: Option<f32> = None;
            let mut last_diamond: Option<f32> = None;
            for i in 0..2000 {
                let x = 6.0 + i as f32 * s.segment_width;
                let hole_before = policy.hole_in_progress();
                let p = policy.decide(x, false, &mut dice);
                if p.is_hole() {
                    prop_assert!(hole_before);
                    prop_assert!(!p.diamond);
                    prop_assert!(!p.starts_hazard());
                }
                if p.diamond {
                    prop_assert!(!policy.hole_in_progress());
                    if let Some(prev) = last_diamond {
                        prop_assert!(x - prev >= s.min_diamond_gap - 1e-3);
                    }
                    last_diamond = Some(x);
                }
                if p.starts_hazard() {
                    if let Some(prev) = last_hazard {
                        prop_assert!(x - prev >= s.min_spikes_gap - 1e-3);
                    }
                    last_hazard = Some(x);
                }
            }
        }
    }
}
