//! Page controllers and view composition
//!
//! Every page owns its state and talks to the catalog directly. Mutations
//! are always followed by a full refetch of the affected list.

use std::sync::{Arc, Mutex};

use cineapp_catalog::MovieId;

mod admin;
mod client;
mod home;
mod nav;
mod profile;

pub use admin::{AdminPage, FormMode};
pub use client::ClientPage;
pub use home::HomePage;
pub use nav::{Header, HeaderButton, NavLink, Route, Viewer};
pub use profile::{ProfileDetails, ProfileView};

/// Blocking interactions the pages need from the UI
pub trait Prompt: Send + Sync {
    /// Ask the user to confirm a destructive action
    fn confirm(&self, message: &str) -> bool;

    /// Show a message the user has to dismiss
    fn alert(&self, message: &str);
}

/// Where the UI should go after a page operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Redirect(String),
}

/// Result of one mutating control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend accepted the change and the list was refetched
    Applied,
    /// The user declined the confirmation; nothing was sent
    Cancelled,
    /// The form failed validation; nothing was sent
    Rejected,
    /// The request failed; the user was alerted
    Failed,
    /// Another mutation was still pending; nothing was sent
    Busy,
}

/// The movie whose mutation is in flight, shared with the UI.
///
/// Pages hand out clones through `pending_slot()` so a control can be
/// disabled while its request runs. A mutation only starts when the slot
/// is idle.
#[derive(Debug, Clone, Default)]
pub struct PendingSlot(Arc<Mutex<Option<MovieId>>>);

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending movie id, or `None` when idle
    pub fn get(&self) -> Option<MovieId> {
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `id` as pending. Returns `None` if another mutation holds the slot.
    pub fn begin(&self, id: MovieId) -> Option<PendingGuard> {
        let mut slot = self.0.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return None;
        }
        *slot = Some(id);
        Some(PendingGuard(self.clone()))
    }
}

/// Returns the slot to idle when dropped
#[derive(Debug)]
pub struct PendingGuard(PendingSlot);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        *self.0 .0.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
