//! Cave world simulation
//!
//! All generation logic lives here. This module is pure and frame-stepped:
//! - One `tick(dt)` per frame, no I/O, no threads
//! - Randomness only through injected `Dice`
//! - Stable ordering (segments newest first, ids ascending by creation)
//! - No rendering, physics or platform dependencies

pub mod bounds;
pub mod dice;
pub mod pickup;
pub mod placement;
pub mod run;
pub mod segment;
pub mod stream;
pub mod wave;

pub use bounds::Aabb;
pub use dice::{Dice, SeededDice};
pub use pickup::{Pickup, PickupEnv, PickupState, PickupUpdate};
pub use placement::{Obstacle, Placement, PlacementPolicy, SpikeCluster, SpikeSize};
pub use run::RunClock;
pub use segment::{Hazard, Mount, Segment, SegmentFactory};
pub use stream::{StreamPhase, WorldContext, WorldEvent, WorldStream};
pub use wave::{PathWave, smooth_damp};
