mod collision;
mod entity_manager;
mod spatial_index;

pub use collision::{contact, Contact};
pub use entity_manager::{EntityManager, SnapshotMode, TriggerFire};
pub use spatial_index::SpatialIndex;
