//! # Outbreak Client
//! The latency-hiding side of the simulation: predicts the local player
//! with the shared fixed-step movement model, reconciles against
//! authoritative corrections, and mirrors remote entities with delayed
//! interpolation for smooth rendering.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod interpolation;
mod prediction;
mod remote_world;

pub use interpolation::InterpolationBuffer;
pub use prediction::{InputBuffer, InputRecord, Predictor};
pub use remote_world::{RemoteEntity, RemoteWorld};
