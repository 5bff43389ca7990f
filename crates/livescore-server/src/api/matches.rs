//! Match CRUD endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use livescore_core::{Match, MatchId, MatchPatch};
use serde::Deserialize;

use crate::auth::RequireAdmin;
use crate::error::ApiError;
use crate::AppState;

/// Request body for creating a match.
#[derive(Debug, Deserialize)]
pub struct CreateMatch {
    /// First team name.
    pub team1: String,
    /// Second team name.
    pub team2: String,
}

/// List all matches.
///
/// # Endpoint
///
/// `GET /matches`
///
/// # Response
///
/// - `200 OK`: JSON array of all matches in creation order
pub async fn list_matches(State(state): State<AppState>) -> Json<Vec<Match>> {
    Json(state.board.list())
}

/// Create a new match.
///
/// The match starts with an empty score until an update sets one.
///
/// # Endpoint
///
/// `POST /matches` (admin)
///
/// # Response
///
/// - `201 Created`: the created match, including its assigned id
/// - `400 Bad Request`: a team name is empty
/// - `401 Unauthorized`: missing or invalid admin token
pub async fn create_match(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateMatch>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let created = state.board.create(&body.team1, &body.team2)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing match.
///
/// The body may carry any subset of `team1`, `team2` and `score`;
/// omitted fields keep their current value.
///
/// # Endpoint
///
/// `PUT /matches/:id` (admin)
///
/// # Response
///
/// - `200 OK`: the updated match
/// - `400 Bad Request`: an empty team name or a malformed score
/// - `401 Unauthorized`: missing or invalid admin token
/// - `404 Not Found`: no match with the given id
pub async fn update_match(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<MatchPatch>,
) -> Result<Json<Match>, ApiError> {
    let updated = state.board.update(MatchId::new(id), patch)?;
    Ok(Json(updated))
}

/// Delete a match.
///
/// # Endpoint
///
/// `DELETE /matches/:id` (admin)
///
/// # Response
///
/// - `204 No Content`: the match was removed
/// - `401 Unauthorized`: missing or invalid admin token
/// - `404 Not Found`: no match with the given id
pub async fn delete_match(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.board.delete(MatchId::new(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::response::IntoResponse;
    use livescore_core::{AdminGate, RepoError, ScoreBoard};

    use super::*;

    fn test_state() -> AppState {
        AppState {
            board: Arc::new(ScoreBoard::new()),
            gate: Arc::new(AdminGate::new("test-secret")),
        }
    }

    #[tokio::test]
    async fn test_list_matches_empty() {
        let state = test_state();

        let Json(matches) = list_matches(State(state)).await;
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_create_match_assigns_id_and_empty_score() {
        let state = test_state();

        let body = CreateMatch {
            team1: "Arsenal".to_string(),
            team2: "Chelsea".to_string(),
        };
        let (status, Json(created)) =
            create_match(RequireAdmin, State(state.clone()), Json(body))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.id, MatchId::new(1));
        assert_eq!(created.team1, "Arsenal");
        assert_eq!(created.score, "");

        let Json(matches) = list_matches(State(state)).await;
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn test_create_match_rejects_empty_team() {
        let state = test_state();

        let body = CreateMatch {
            team1: "  ".to_string(),
            team2: "Chelsea".to_string(),
        };
        let result = create_match(RequireAdmin, State(state), Json(body)).await;

        let error = result.err().unwrap();
        assert!(matches!(
            error,
            ApiError::Repo(RepoError::Validation(_))
        ));
        assert_eq!(
            error.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_update_match_sets_score() {
        let state = test_state();
        state.board.create("Arsenal", "Chelsea").unwrap();

        let patch = MatchPatch {
            score: Some("2 : 1".to_string()),
            ..MatchPatch::default()
        };
        let Json(updated) = update_match(RequireAdmin, State(state), Path(1), Json(patch))
            .await
            .unwrap();

        assert_eq!(updated.score, "2 : 1");
        assert_eq!(updated.team1, "Arsenal");
    }

    #[tokio::test]
    async fn test_update_match_unknown_id() {
        let state = test_state();

        let result = update_match(
            RequireAdmin,
            State(state),
            Path(99),
            Json(MatchPatch::default()),
        )
        .await;

        assert!(matches!(
            result,
            Err(ApiError::Repo(RepoError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_match_then_gone() {
        let state = test_state();
        state.board.create("Arsenal", "Chelsea").unwrap();

        let status = delete_match(RequireAdmin, State(state.clone()), Path(1))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = delete_match(RequireAdmin, State(state), Path(1)).await;
        assert!(matches!(
            result,
            Err(ApiError::Repo(RepoError::NotFound(_)))
        ));
    }
}
