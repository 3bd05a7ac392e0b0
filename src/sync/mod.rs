pub mod controller;
pub mod keyring;
pub mod rest;
pub mod schedule;
pub mod store;

pub use controller::{BoardState, RefreshOutcome, SyncController};
pub use rest::RestStore;
pub use schedule::RefreshHandle;
pub use store::LinkStore;

/// Current sync status displayed in the UI.
///
/// Only foreground refreshes move this to `Syncing` or `Error`; the
/// periodic refresh stays out of the user's way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Error(String),
    LastSynced(String), // formatted timestamp
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::Idle
    }
}
