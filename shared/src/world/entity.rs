use crate::codec::FieldMap;
use crate::math::Vec2;
use crate::types::{EntityId, EntityTypeId};
use crate::world::error::WorldError;
use crate::world::ext::{Movable, Positionable};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType, UpdateContext};

/// Identity plus an ordered collection of extensions. The entity exclusively
/// owns its extensions; update and serialization both walk them in
/// registration order, which is what makes the simulate phase deterministic.
pub struct Entity {
    id: EntityId,
    type_id: EntityTypeId,
    extensions: Vec<Box<dyn Extension>>,
}

impl Entity {
    pub fn new(id: EntityId, type_id: EntityTypeId) -> Self {
        Self {
            id,
            type_id,
            extensions: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn type_id(&self) -> EntityTypeId {
        self.type_id
    }

    /// Attaches an extension. At most one per kind; a duplicate is a
    /// construction bug surfaced as an error.
    pub fn add_ext(&mut self, ext: Box<dyn Extension>) -> Result<(), WorldError> {
        let kind = ext.kind();
        if self.has_ext(kind) {
            return Err(WorldError::DuplicateExtension { kind });
        }
        self.extensions.push(ext);
        Ok(())
    }

    /// Builder-style attach for factory code.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate kind; factories construct each kind once.
    pub fn with_ext(mut self, ext: Box<dyn Extension>) -> Self {
        self.add_ext(ext)
            .expect("entity factory attached the same extension kind twice");
        self
    }

    pub fn remove_ext(&mut self, kind: ExtensionKind) -> Option<Box<dyn Extension>> {
        let index = self.extensions.iter().position(|e| e.kind() == kind)?;
        Some(self.extensions.remove(index))
    }

    pub fn has_ext(&self, kind: ExtensionKind) -> bool {
        self.extensions.iter().any(|e| e.kind() == kind)
    }

    /// Typed capability lookup. Fails fast when the capability is absent —
    /// callers for whom the extension is optional check `has_ext` first.
    pub fn get_ext<T: ExtensionType>(&self) -> Result<&T, WorldError> {
        self.extensions
            .iter()
            .find(|e| e.kind() == T::KIND)
            .and_then(|e| e.as_any().downcast_ref::<T>())
            .ok_or(WorldError::MissingExtension { kind: T::KIND })
    }

    pub fn get_ext_mut<T: ExtensionType>(&mut self) -> Result<&mut T, WorldError> {
        self.extensions
            .iter_mut()
            .find(|e| e.kind() == T::KIND)
            .and_then(|e| e.as_any_mut().downcast_mut::<T>())
            .ok_or(WorldError::MissingExtension { kind: T::KIND })
    }

    /// The entity's position, when it has one. Most spatial reasoning goes
    /// through this.
    pub fn position(&self) -> Option<Vec2> {
        self.get_ext::<Positionable>().ok().map(|p| p.position())
    }

    /// True if any extension has unsynced changes.
    pub fn is_dirty(&self) -> bool {
        self.extensions.iter().any(|e| e.is_dirty())
    }

    pub fn clear_dirty(&mut self) {
        for ext in &mut self.extensions {
            ext.clear_dirty();
        }
    }

    /// Velocity integration, run before extension behaviors each tick so
    /// physics precedes triggers. A no-op unless the entity is both
    /// positioned and movable.
    pub fn integrate(&mut self, dt: f32) {
        let velocity = match self.get_ext::<Movable>() {
            Ok(movable) => movable.velocity(),
            Err(_) => return,
        };
        if velocity == Vec2::ZERO {
            return;
        }
        if let Ok(pos) = self.get_ext_mut::<Positionable>() {
            let next = pos.position() + velocity * dt;
            pos.set_position(next);
        }
    }

    /// Runs each extension's behavior hook in registration order.
    pub fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        for ext in &mut self.extensions {
            ext.update(ctx);
        }
    }

    /// Concatenates every extension's serialized fields. Identity and type
    /// tag are written by the frame encoder, not here.
    pub fn write_fields(&self, only_dirty: bool) -> FieldMap {
        let mut out = FieldMap::new();
        for ext in &self.extensions {
            if only_dirty && !ext.is_dirty() {
                continue;
            }
            ext.write_fields(only_dirty, &mut out);
        }
        out
    }
}
