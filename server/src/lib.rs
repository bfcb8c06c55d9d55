//! # Outbreak Server
//! The authoritative side of the simulation: owns the live entity set,
//! advances it on a fixed tick, resolves collisions, and broadcasts full or
//! delta snapshots that outbreak-client reconstructs.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod auth;
mod broadcast;
mod world;

pub use auth::{StatsClaim, StatsKey, TokenError};
pub use broadcast::{full_frame, send_events, BroadcastError, Broadcaster, SnapshotSender};
pub use world::{contact, Contact, EntityManager, SnapshotMode, SpatialIndex, TriggerFire};
