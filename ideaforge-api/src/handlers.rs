use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ideaforge_db::{Idea, IdeaDraft, RepositoryError};

use crate::SharedRepository;
use crate::error::{ApiError, IDEA_NOT_FOUND};
use crate::payload::{IdeaPayload, Message};

pub async fn list_ideas(
    State(repository): State<SharedRepository>,
) -> Result<Json<Vec<Idea>>, ApiError> {
    let ideas = repository.list().await.map_err(ApiError::from_read)?;
    Ok(Json(ideas))
}

pub async fn create_idea(
    State(repository): State<SharedRepository>,
    payload: Result<Json<IdeaPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Idea>), ApiError> {
    let Json(payload) = payload?;
    let idea = repository
        .create(IdeaDraft::from(payload))
        .await
        .map_err(ApiError::from_write)?;
    tracing::info!(id = %idea.id, "idea created");
    Ok((StatusCode::CREATED, Json(idea)))
}

pub async fn update_idea(
    State(repository): State<SharedRepository>,
    Path(id): Path<String>,
    payload: Result<Json<IdeaPayload>, JsonRejection>,
) -> Result<Json<Idea>, ApiError> {
    let Json(payload) = payload?;
    repository
        .update(&id, IdeaDraft::from(payload))
        .await
        .map_err(ApiError::from_write)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(IDEA_NOT_FOUND))
}

pub async fn delete_idea(
    State(repository): State<SharedRepository>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    match repository.delete(&id).await {
        Ok(Some(idea)) => {
            tracing::info!(id = %idea.id, "idea deleted");
            Ok(Json(Message::new("Idea deleted successfully")))
        }
        // No record can carry a malformed id.
        Ok(None) | Err(RepositoryError::InvalidId(_)) => Err(ApiError::not_found(IDEA_NOT_FOUND)),
        Err(e) => Err(ApiError::from_read(e)),
    }
}

pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Not found")
}
