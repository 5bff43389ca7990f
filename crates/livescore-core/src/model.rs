//! Match records and field validation.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An immutable, fully-materialized copy of the match list at one point
/// in time. Shared by reference between the hub and every subscriber.
pub type Snapshot = Arc<Vec<Match>>;

/// Errors for rejected match input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyTeam(&'static str),

    #[error("invalid score '{0}': expected \"<digits> : <digits>\" or empty")]
    InvalidScore(String),
}

/// Repository-assigned match identifier.
///
/// Strictly increasing per repository; never reused, not even after the
/// match it belonged to is deleted. Serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u64);

impl MatchId {
    pub const fn new(id: u64) -> Self {
        MatchId(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Unique match identifier.
    pub id: MatchId,
    /// Home team label.
    pub team1: String,
    /// Away team label.
    pub team2: String,
    /// Current score, or empty string when not yet set.
    pub score: String,
}

/// Partial update for a match; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchPatch {
    /// New home team label.
    pub team1: Option<String>,
    /// New away team label.
    pub team2: Option<String>,
    /// New score text.
    pub score: Option<String>,
}

/// Checks a team label, returning the trimmed form that gets stored.
///
/// `field` names the offending field in the error message.
pub(crate) fn validate_team(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTeam(field));
    }
    Ok(trimmed.to_string())
}

/// Checks a proposed score against the canonical pattern.
///
/// Valid scores are the empty string ("not yet set") or two digit runs
/// separated by a single colon, with whitespace permitted around the
/// colon only: `"0:0"`, `"2 : 1"`. Anything else is rejected.
pub(crate) fn validate_score(score: &str) -> Result<(), ValidationError> {
    if score.is_empty() {
        return Ok(());
    }

    let invalid = || ValidationError::InvalidScore(score.to_string());
    let (home, away) = score.split_once(':').ok_or_else(invalid)?;

    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if digits(home.trim_end()) && digits(away.trim_start()) {
        Ok(())
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_score_is_valid() {
        assert_eq!(validate_score(""), Ok(()));
    }

    #[test]
    fn test_score_accepts_canonical_forms() {
        for score in ["0:0", "2 : 1", "10:3", "2  :  1", "123:456"] {
            assert_eq!(validate_score(score), Ok(()), "rejected {score:?}");
        }
    }

    #[test]
    fn test_score_rejects_malformed_forms() {
        for score in [
            "abc", "1:", ":1", ":", "1:2:3", "-1:0", "1.5:2", " 1:2", "1:2 ", "one:two", "1-2",
        ] {
            assert!(validate_score(score).is_err(), "accepted {score:?}");
        }
    }

    #[test]
    fn test_team_is_stored_trimmed() {
        assert_eq!(validate_team("team1", "  Arsenal  "), Ok("Arsenal".to_string()));
    }

    #[test]
    fn test_team_rejects_whitespace_only() {
        assert_eq!(
            validate_team("team2", "   "),
            Err(ValidationError::EmptyTeam("team2"))
        );
        assert_eq!(
            validate_team("team2", ""),
            Err(ValidationError::EmptyTeam("team2"))
        );
    }

    #[test]
    fn test_match_wire_shape() {
        let m = Match {
            id: MatchId::new(7),
            team1: "A".to_string(),
            team2: "B".to_string(),
            score: "1 : 0".to_string(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "team1": "A", "team2": "B", "score": "1 : 0"})
        );
    }

    #[test]
    fn test_patch_deserializes_partial_bodies() {
        let patch: MatchPatch = serde_json::from_str(r#"{"score": "1 : 0"}"#).unwrap();
        assert_eq!(patch.score.as_deref(), Some("1 : 0"));
        assert!(patch.team1.is_none());
        assert!(patch.team2.is_none());
    }

    proptest! {
        #[test]
        fn score_accepts_any_digit_pair(home in 0u32..10_000, away in 0u32..10_000, pad in "[ \t]{0,3}") {
            let score = format!("{home}{pad}:{pad}{away}");
            prop_assert!(validate_score(&score).is_ok());
        }

        #[test]
        fn score_rejects_text_without_digits(s in "[A-Za-z !?*-]{1,12}") {
            prop_assert!(validate_score(&s).is_err());
        }
    }
}
