use thiserror::Error;

use crate::types::EntityId;
use crate::world::extension::ExtensionKind;

/// Errors from entity/extension bookkeeping. `MissingExtension` is the
/// fail-fast programming-error case — it indicates a construction bug, and
/// callers that treat a capability as required surface it immediately
/// rather than retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("entity is missing required extension {kind:?}")]
    MissingExtension { kind: ExtensionKind },

    #[error("entity already holds an extension of kind {kind:?}")]
    DuplicateExtension { kind: ExtensionKind },

    #[error("no live entity with id {id}")]
    UnknownEntity { id: EntityId },
}
