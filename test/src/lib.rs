//! Shared fixtures for the cross-crate integration tests: a canonical
//! schema registry, entity factories, and a capturing transport.

pub mod helpers;

pub use helpers::*;
