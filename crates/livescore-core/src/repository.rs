//! In-memory match repository.

use std::sync::Arc;

use thiserror::Error;

use crate::model::{
    validate_score, validate_team, Match, MatchId, MatchPatch, Snapshot, ValidationError,
};

/// Errors returned by repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("match {0} not found")]
    NotFound(MatchId),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The authoritative, ordered collection of match records.
///
/// Ids come from a strictly increasing counter and are never reused, not
/// even after deletes. Records keep creation order; [`list`](Self::list)
/// and [`snapshot`](Self::snapshot) expose exactly that order. The
/// repository itself is plain data; callers serialize access (see
/// [`ScoreBoard`](crate::ScoreBoard)).
#[derive(Debug, Default)]
pub struct MatchRepository {
    matches: Vec<Match>,
    next_id: u64,
}

impl MatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a match with the next id and an unset score.
    pub fn create(&mut self, team1: &str, team2: &str) -> Result<Match, RepoError> {
        let team1 = validate_team("team1", team1)?;
        let team2 = validate_team("team2", team2)?;

        self.next_id += 1;
        let record = Match {
            id: MatchId::new(self.next_id),
            team1,
            team2,
            score: String::new(),
        };
        self.matches.push(record.clone());
        Ok(record)
    }

    /// Applies `patch` to the match with `id` and returns the result.
    ///
    /// Every supplied field is validated before any is applied, so a
    /// rejected update leaves the record untouched. A missing id wins
    /// over a malformed patch.
    pub fn update(&mut self, id: MatchId, patch: MatchPatch) -> Result<Match, RepoError> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(RepoError::NotFound(id))?;

        let team1 = patch
            .team1
            .as_deref()
            .map(|t| validate_team("team1", t))
            .transpose()?;
        let team2 = patch
            .team2
            .as_deref()
            .map(|t| validate_team("team2", t))
            .transpose()?;
        if let Some(score) = patch.score.as_deref() {
            validate_score(score)?;
        }

        let record = &mut self.matches[idx];
        if let Some(team1) = team1 {
            record.team1 = team1;
        }
        if let Some(team2) = team2 {
            record.team2 = team2;
        }
        if let Some(score) = patch.score {
            record.score = score;
        }
        Ok(record.clone())
    }

    /// Removes the match with `id`; remaining ids are not renumbered.
    pub fn delete(&mut self, id: MatchId) -> Result<(), RepoError> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(RepoError::NotFound(id))?;
        self.matches.remove(idx);
        Ok(())
    }

    /// All matches in creation order.
    pub fn list(&self) -> &[Match] {
        &self.matches
    }

    /// An immutable copy of the current state, for broadcasting.
    pub fn snapshot(&self) -> Snapshot {
        Arc::new(self.matches.to_vec())
    }
}
