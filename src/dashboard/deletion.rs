use tracing::{info, warn};

use crate::dashboard::notify::Notification;
use crate::dashboard::repository::VillaRepository;
use crate::models::{Villa, VillaId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionState {
    #[default]
    Idle,
    /// Holds only the id; the record is looked up again on confirm
    AwaitingConfirmation(VillaId),
}

/// Two-step guard in front of `VillaRepository::remove`
#[derive(Debug, Default)]
pub struct DeletionFlow {
    state: DeletionState,
}

impl DeletionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DeletionState {
        self.state
    }

    pub fn pending(&self) -> Option<VillaId> {
        match self.state {
            DeletionState::AwaitingConfirmation(id) => Some(id),
            DeletionState::Idle => None,
        }
    }

    /// Ask for confirmation; replaces any target already pending
    pub fn request(&mut self, villa: &Villa) {
        if let Some(previous) = self.pending() {
            info!("Deletion of villa {} superseded by {}", previous, villa.id);
        }
        self.state = DeletionState::AwaitingConfirmation(villa.id);
    }

    /// Confirmation prompt for the pending target, if it still exists
    pub fn prompt(&self, repo: &VillaRepository) -> Option<String> {
        let villa = repo.get(self.pending()?)?;
        Some(format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            villa.name
        ))
    }

    pub fn cancel(&mut self) {
        self.state = DeletionState::Idle;
    }

    /// Delete the pending target and return to `Idle` whatever the outcome
    ///
    /// Returns `None` when nothing was pending. Failures are reported as an
    /// error notification and never retried.
    pub async fn confirm(&mut self, repo: &VillaRepository) -> Option<Notification> {
        let id = self.pending()?;
        self.state = DeletionState::Idle;

        let Some(villa) = repo.get(id) else {
            warn!("Villa {} vanished before deletion was confirmed", id);
            return Some(Notification::error(format!(
                "Failed to delete villa #{}: it no longer exists.",
                id
            )));
        };

        match repo.remove(id).await {
            Ok(()) => Some(Notification::success(format!(
                "{} deleted successfully.",
                villa.name
            ))),
            Err(err) => {
                warn!("Failed to delete villa {}: {}", id, err);
                Some(Notification::error(format!("Failed to delete {}.", villa.name)))
            }
        }
    }
}
