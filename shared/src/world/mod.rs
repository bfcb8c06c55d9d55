mod entity;
mod error;
mod extension;
pub mod ext;

pub use entity::Entity;
pub use error::WorldError;
pub use extension::{
    Extension, ExtensionKind, ExtensionType, Neighbor, NeighborQuery, UpdateContext, WorldCommand,
};
