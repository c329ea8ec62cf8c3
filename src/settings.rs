//! World generation settings
//!
//! Every tuning constant the generator reads lives here. Settings are
//! validated once, before a stream is built; nothing downstream re-checks them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("`{field}` must be a probability in [0, 1] (got {value})")]
    NotProbability { field: &'static str, value: f32 },
    #[error("`{min_field}` ({min}) must not exceed `{max_field}` ({max})")]
    InvertedRange {
        min_field: &'static str,
        min: f32,
        max_field: &'static str,
        max: f32,
    },
    #[error("spike count range {min}..={max} is invalid (need 1 <= min <= max)")]
    SpikeCount { min: u32, max: u32 },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Collectible diamond behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiamondSettings {
    /// Height above the floor surface where diamonds spawn
    pub floor_clearance: f32,
    /// Base render scale
    pub scale: f32,
    /// Collider radius before scaling
    pub collider_radius: f32,
    pub bob_speed: f32,
    pub bob_height: f32,
    /// Scale pulse frequency
    pub pulse_speed: f32,
    /// Scale pulse amplitude (fraction of base scale)
    pub pulse_amount: f32,
    /// Units per second toward the collect target
    pub fly_speed: f32,
    /// Shrink rate while flying
    pub fly_shrink_speed: f32,
    /// Distance below which a flying diamond counts as banked
    pub collect_epsilon: f32,
    pub magnet_range: f32,
    pub magnet_speed: f32,
}

impl Default for DiamondSettings {
    fn default() -> Self {
        Self {
            floor_clearance: 0.8,
            scale: 1.5,
            collider_radius: 0.4,
            bob_speed: 3.0,
            bob_height: 0.15,
            pulse_speed: 2.0,
            pulse_amount: 0.1,
            fly_speed: 15.0,
            fly_shrink_speed: 3.0,
            collect_epsilon: 0.3,
            magnet_range: 5.0,
            magnet_speed: 8.0,
        }
    }
}

/// Cave, hazard and pickup tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    // === Cave ===
    /// Vertical opening between floor top and ceiling bottom
    pub gap_height: f32,
    pub ceiling_thickness: f32,
    pub floor_thickness: f32,
    /// Panel width as a multiple of segment width (hides seams)
    pub panel_overlap: f32,

    // === Centerline wave ===
    pub min_wave_y: f32,
    pub max_wave_y: f32,
    /// Smoothing time constant (seconds)
    pub wave_smoothing: f32,
    /// Seconds between target changes
    pub target_change_interval: f32,

    // === Streaming ===
    pub segment_width: f32,
    pub spawn_x: f32,
    pub destroy_x: f32,
    /// Largest frame dt accepted before clamping
    pub max_frame_dt: f32,

    // === Movement ===
    pub base_scroll_speed: f32,
    pub max_scroll_speed: f32,

    // === Spikes ===
    pub spike_chance: f32,
    pub small_spike_width: f32,
    pub small_spike_height: f32,
    pub big_spike_width: f32,
    pub big_spike_height: f32,
    /// Minimum generated distance between hazard events
    pub min_spikes_gap: f32,
    pub min_spike_count: u32,
    pub max_spike_count: u32,
    /// No hazards are rolled at or before this x
    pub min_hazard_x: f32,

    // === Holes ===
    pub hole_width: f32,

    // === Diamonds ===
    pub diamond_chance: f32,
    pub min_diamond_gap: f32,
    pub diamond: DiamondSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gap_height: 3.5,
            ceiling_thickness: 8.0,
            floor_thickness: 8.0,
            panel_overlap: 1.5,

            min_wave_y: -2.0,
            max_wave_y: 2.0,
            wave_smoothing: 2.0,
            target_change_interval: 3.0,

            segment_width: 1.0,
            spawn_x: 12.0,
            destroy_x: -12.0,
            max_frame_dt: crate::consts::MAX_FRAME_DT,

            base_scroll_speed: 4.0,
            max_scroll_speed: 8.0,

            spike_chance: 0.15,
            small_spike_width: 0.2,
            small_spike_height: 0.3,
            big_spike_width: 0.4,
            big_spike_height: 0.6,
            min_spikes_gap: 3.0,
            min_spike_count: 1,
            max_spike_count: 4,
            min_hazard_x: 5.0,

            hole_width: 3.0,

            diamond_chance: 0.08,
            min_diamond_gap: 2.0,
            diamond: DiamondSettings::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // NaN fails this comparison too
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotProbability { field, value })
    }
}

fn ordered(
    min_field: &'static str,
    min: f32,
    max_field: &'static str,
    max: f32,
) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            min_field,
            min,
            max_field,
            max,
        })
    }
}

impl WorldSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Vertical range the centerline may occupy
    pub fn wave_range(&self) -> f32 {
        self.max_wave_y - self.min_wave_y
    }

    /// Segments needed to cover the window between the trailing and spawn edges
    pub fn window_segments(&self) -> usize {
        ((self.spawn_x - self.destroy_x) / self.segment_width).floor() as usize
    }

    /// Reject configurations that would produce nonsensical geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gap_height", self.gap_height)?;
        positive("ceiling_thickness", self.ceiling_thickness)?;
        positive("floor_thickness", self.floor_thickness)?;
        positive("panel_overlap", self.panel_overlap)?;

        ordered("min_wave_y", self.min_wave_y, "max_wave_y", self.max_wave_y)?;
        positive("wave_smoothing", self.wave_smoothing)?;
        positive("target_change_interval", self.target_change_interval)?;

        positive("segment_width", self.segment_width)?;
        ordered("destroy_x", self.destroy_x, "spawn_x", self.spawn_x)?;
        positive("spawn_x - destroy_x", self.spawn_x - self.destroy_x)?;
        positive("max_frame_dt", self.max_frame_dt)?;

        non_negative("base_scroll_speed", self.base_scroll_speed)?;
        ordered(
            "base_scroll_speed",
            self.base_scroll_speed,
            "max_scroll_speed",
            self.max_scroll_speed,
        )?;

        probability("spike_chance", self.spike_chance)?;
        positive("small_spike_width", self.small_spike_width)?;
        positive("small_spike_height", self.small_spike_height)?;
        positive("big_spike_width", self.big_spike_width)?;
        positive("big_spike_height", self.big_spike_height)?;
        non_negative("min_spikes_gap", self.min_spikes_gap)?;
        if self.min_spike_count == 0 || self.min_spike_count > self.max_spike_count {
            return Err(ConfigError::SpikeCount {
                min: self.min_spike_count,
                max: self.max_spike_count,
            });
        }
        // Spikes must fit inside the opening
        ordered(
            "big_spike_height",
            self.big_spike_height,
            "gap_height",
            self.gap_height,
        )?;

        non_negative("hole_width", self.hole_width)?;

        probability("diamond_chance", self.diamond_chance)?;
        non_negative("min_diamond_gap", self.min_diamond_gap)?;

        let d = &self.diamond;
        positive("diamond.scale", d.scale)?;
        positive("diamond.collider_radius", d.collider_radius)?;
        // A collected diamond must reach its target to bank
        positive("diamond.fly_speed", d.fly_speed)?;
        non_negative("diamond.fly_shrink_speed", d.fly_shrink_speed)?;
        positive("diamond.collect_epsilon", d.collect_epsilon)?;
        non_negative("diamond.magnet_range", d.magnet_range)?;
        non_negative("diamond.magnet_speed", d.magnet_speed)?;
        Ok(())
    }
}
