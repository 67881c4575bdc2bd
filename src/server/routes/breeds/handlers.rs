use super::extract::{BreedId, BreedPayload};
use crate::db::DogBreed;
use crate::error::DogApiError;
use crate::server::router::DogApiState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /api/dogbreeds
pub(super) async fn list_breeds(
    State(state): State<DogApiState>,
) -> Result<Json<Vec<DogBreed>>, DogApiError> {
    Ok(Json(state.db.list().await?))
}

/// GET /api/dogbreeds/{id}
pub(super) async fn get_breed(
    State(state): State<DogApiState>,
    BreedId(id): BreedId,
) -> Result<Json<DogBreed>, DogApiError> {
    Ok(Json(state.db.get_by_id(id).await?))
}

/// POST /api/dogbreeds
///
/// Always 201; a duplicate request gets the record that already exists.
pub(super) async fn create_breed(
    State(state): State<DogApiState>,
    BreedPayload(identity): BreedPayload,
) -> Result<(StatusCode, Json<DogBreed>), DogApiError> {
    let record = state.db.create(identity).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/dogbreeds/{id}
pub(super) async fn update_breed(
    State(state): State<DogApiState>,
    BreedId(id): BreedId,
    BreedPayload(identity): BreedPayload,
) -> Result<Json<DogBreed>, DogApiError> {
    Ok(Json(state.db.update(id, identity).await?))
}

/// DELETE /api/dogbreeds/{id}
pub(super) async fn delete_breed(
    State(state): State<DogApiState>,
    BreedId(id): BreedId,
) -> Result<StatusCode, DogApiError> {
    state.db.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
