//! Conflict decisions for destination collisions.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a destination collision is (or is not) resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConflictDecision {
    /// No resolution was made; a collision in this state is fatal.
    #[default]
    Unresolved,
    /// Replace the existing destination entry.
    Overwrite,
    /// Replace this and every remaining collision in the batch.
    OverwriteAll,
    /// Copy under a generated unique name.
    Rename,
    /// Rename this and every remaining collision in the batch.
    RenameAll,
    /// Abort the batch.
    Cancel,
}

impl ConflictDecision {
    /// Whether this decision applies to all remaining collisions in a batch.
    pub fn is_sticky(&self) -> bool {
        matches!(self, Self::OverwriteAll | Self::RenameAll)
    }

    /// Collapse an "all" decision to its single-item equivalent.
    pub fn collapse(&self) -> Self {
        match self {
            Self::OverwriteAll => Self::Overwrite,
            Self::RenameAll => Self::Rename,
            other => *other,
        }
    }
}

/// Callback asked how to resolve a collision between a source item and the
/// entry occupying its destination.
pub type ConflictHandler = Box<dyn Fn(&Path, &Path) -> ConflictDecision + Send + Sync>;

/// Resolve a collision against the batch's sticky state.
///
/// A sticky decision short-circuits without consulting the handler; a newly
/// returned sticky decision is recorded for the rest of the batch. With no
/// handler the collision stays `Unresolved`, which callers must treat as
/// fatal.
pub(crate) fn resolve(
    sticky: &mut ConflictDecision,
    handler: Option<&ConflictHandler>,
    source: &Path,
    destination: &Path,
) -> ConflictDecision {
    if sticky.is_sticky() {
        return *sticky;
    }

    let decision = match handler {
        Some(handler) => handler(source, destination),
        None => ConflictDecision::Unresolved,
    };

    if decision.is_sticky() {
        *sticky = decision;
    }

    decision
}
