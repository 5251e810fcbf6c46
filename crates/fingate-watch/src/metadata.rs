//! Host-side metadata and action hooks for matched slots.
//!
//! The sensor only stores templates; names and actions live with the
//! host. The watch loop looks them up through [`MetadataLookup`] and runs
//! actions through [`ActionExecutor`], so the loop itself stays ignorant
//! of where metadata comes from (a file, a database, a hardcoded map) and
//! what running an action means.

use fingate_core::TemplateSlot;
use std::future::Future;
use std::pin::Pin;

/// Sentinel action meaning "matched, but run nothing".
pub const NO_ACTION: &str = "na";

/// Metadata attached to one template slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerMeta {
    /// Display name for event consumers.
    pub name: Option<String>,

    /// Action to run on a match. [`NO_ACTION`] and the empty string both
    /// suppress execution.
    pub action: Option<String>,
}

/// Resolves a matched slot to its host-side metadata.
pub trait MetadataLookup: Send + Sync {
    /// Metadata for the slot, or `None` when nothing is registered.
    fn lookup(&self, slot: TemplateSlot) -> Option<FingerMeta>;
}

/// Runs the action attached to a matched slot.
///
/// Boxed futures keep this trait object-safe; executions are spawned off
/// the watch loop, so a slow action never stalls verification.
pub trait ActionExecutor: Send + Sync {
    /// Run one action to completion.
    fn run(&self, action: &str) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Whether a metadata action should actually be executed.
#[must_use]
pub fn is_runnable(action: &str) -> bool {
    !action.is_empty() && action != NO_ACTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runnable_actions() {
        assert!(is_runnable("unlock"));
        assert!(!is_runnable(NO_ACTION));
        assert!(!is_runnable(""));
    }
}
