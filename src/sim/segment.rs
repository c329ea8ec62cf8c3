//! Cave cross-sections and the spikes they carry

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::settings::WorldSettings;

/// Which surface a spike grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mount {
    /// Points up from the floor
    Floor,
    /// Points down from the ceiling
    Ceiling,
}

/// A spike attached to a segment
///
/// Horizontal position is stored relative to the owning segment so spikes
/// scroll with it for free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub offset_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub mount: Mount,
}

impl Hazard {
    /// World-space bounds given the owning segment's x
    pub fn bounds(&self, segment_x: f32) -> Aabb {
        Aabb::new(
            Vec2::new(segment_x + self.offset_x, self.center_y),
            Vec2::new(self.width, self.height),
        )
    }
}

/// One slice of cave geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub x: f32,
    /// Top surface of the floor panel
    pub floor_top_y: f32,
    /// Bottom surface of the ceiling panel
    pub ceiling_bottom_y: f32,
    pub floor_thickness: f32,
    pub ceiling_thickness: f32,
    /// Horizontal extent of the floor/ceiling panels
    pub panel_width: f32,
    /// Floor is non-solid here
    pub is_hole: bool,
    pub hazards: Vec<Hazard>,
}

impl Segment {
    /// Vertical midpoint of the opening
    pub fn centerline(&self) -> f32 {
        (self.floor_top_y + self.ceiling_bottom_y) * 0.5
    }

    pub fn gap_height(&self) -> f32 {
        self.ceiling_bottom_y - self.floor_top_y
    }

    /// Solid floor panel, `None` over a hole
    pub fn floor_bounds(&self) -> Option<Aabb> {
        if self.is_hole {
            return None;
        }
        Some(self.floor_panel())
    }

    /// Fall-through region of a hole (where the floor panel would be)
    pub fn hole_bounds(&self) -> Option<Aabb> {
        self.is_hole.then(|| self.floor_panel())
    }

    pub fn ceiling_bounds(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.ceiling_bottom_y + self.ceiling_thickness * 0.5),
            Vec2::new(self.panel_width, self.ceiling_thickness),
        )
    }

    /// World-space bounds of every attached spike
    pub fn hazard_bounds(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.hazards.iter().map(|h| h.bounds(self.x))
    }

    fn floor_panel(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.floor_top_y - self.floor_thickness * 0.5),
            Vec2::new(self.panel_width, self.floor_thickness),
        )
    }
}

/// Builds segments from validated settings
#[derive(Debug, Clone)]
pub struct SegmentFactory {
    gap_height: f32,
    floor_thickness: f32,
    ceiling_thickness: f32,
    panel_width: f32,
}

impl SegmentFactory {
    pub fn new(settings: &WorldSettings) -> Self {
        Self {
            gap_height: settings.gap_height,
            floor_thickness: settings.floor_thickness,
            ceiling_thickness: settings.ceiling_thickness,
            panel_width: settings.segment_width * settings.panel_overlap,
        }
    }

    /// Solid segment centered on `centerline` at `x`
    pub fn create(&self, id: u32, x: f32, centerline: f32) -> Segment {
        let half_gap = self.gap_height * 0.5;
        Segment {
            id,
            x,
            floor_top_y: centerline - half_gap,
            ceiling_bottom_y: centerline + half_gap,
            floor_thickness: self.floor_thickness,
            ceiling_thickness: self.ceiling_thickness,
            panel_width: self.panel_width,
            is_hole: false,
            hazards: Vec::new(),
        }
    }

    /// Evenly spaced spikes centered on the segment's x
    pub fn spike_cluster(&self, segment: &Segment, mount: Mount, count: u32, width: f32, height: f32) -> Vec<Hazard> {
        let start = -((count.saturating_sub(1)) as f32) * width * 0.5;
        let center_y = match mount {
            Mount::Floor => segment.floor_top_y + height * 0.5,
            Mount::Ceiling => segment.ceiling_bottom_y - height * 0.5,
        };
        (0..count)
            .map(|i| Hazard {
                offset_x: start + i as f32 * width,
                center_y,
                width,
                height,
                mount,
            })
            .collect()
    }
}
