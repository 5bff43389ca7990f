//! Service wiring: repository and hub mutated as one unit.

use std::sync::{Arc, Mutex};

use crate::hub::{BroadcastHub, HubClosedError, HubConfig, SubscriptionHandle};
use crate::model::{Match, MatchId, MatchPatch};
use crate::repository::{MatchRepository, RepoError};

/// The live score service: the single path to match state.
///
/// Every mutation runs mutate, snapshot, publish under one repository
/// lock. Subscribers therefore observe complete mutations in the order
/// they happened, and a snapshot never reflects half an update. The
/// publish itself never blocks, so holding the lock across it is cheap.
pub struct ScoreBoard {
    repo: Mutex<MatchRepository>,
    hub: Arc<BroadcastHub>,
}

impl ScoreBoard {
    /// Create a board with default hub configuration.
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a board with custom hub configuration.
    pub fn with_config(config: HubConfig) -> Self {
        ScoreBoard {
            repo: Mutex::new(MatchRepository::new()),
            hub: Arc::new(BroadcastHub::with_config(config)),
        }
    }

    /// The broadcast hub, for heartbeat spawning and shutdown wiring.
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// Creates a match and broadcasts the new state.
    pub fn create(&self, team1: &str, team2: &str) -> Result<Match, RepoError> {
        let mut repo = self.repo.lock().unwrap();
        let created = repo.create(team1, team2)?;
        self.hub.publish(repo.snapshot());
        tracing::info!(
            id = %created.id,
            team1 = %created.team1,
            team2 = %created.team2,
            "Created match"
        );
        Ok(created)
    }

    /// Applies a patch to a match and broadcasts the new state.
    pub fn update(&self, id: MatchId, patch: MatchPatch) -> Result<Match, RepoError> {
        let mut repo = self.repo.lock().unwrap();
        let updated = repo.update(id, patch)?;
        self.hub.publish(repo.snapshot());
        tracing::info!(id = %id, score = %updated.score, "Updated match");
        Ok(updated)
    }

    /// Deletes a match and broadcasts the new state.
    pub fn delete(&self, id: MatchId) -> Result<(), RepoError> {
        let mut repo = self.repo.lock().unwrap();
        repo.delete(id)?;
        self.hub.publish(repo.snapshot());
        tracing::info!(id = %id, "Deleted match");
        Ok(())
    }

    /// All matches in creation order.
    pub fn list(&self) -> Vec<Match> {
        self.repo.lock().unwrap().list().to_vec()
    }

    /// Attaches a snapshot subscriber; it immediately receives the
    /// current state.
    pub fn subscribe(&self) -> Result<SubscriptionHandle, HubClosedError> {
        self.hub.subscribe()
    }

    /// Closes the hub: live event streams end, new subscriptions are
    /// refused. Repository reads and writes keep working.
    pub fn shutdown(&self) {
        self.hub.shutdown();
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
