use crate::db::BreedIdentity;
use crate::error::DogApiError;
use crate::utils::logging::pretty_json_if_debug;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use dogapi_schema::DogBreedRequest;
use tracing::debug;

/// Validated and normalized breed payload.
pub(crate) struct BreedPayload(pub(crate) BreedIdentity);

impl<S> FromRequest<S> for BreedPayload
where
    S: Send + Sync,
{
    type Rejection = DogApiError;

    /// Extract a `DogBreedRequest` body and turn it into a `BreedIdentity`.
    ///
    /// - JSON syntax/shape errors from `axum::Json` become `DogApiError::BadRequest` (400).
    /// - Field errors are collected into `DogApiError::Validation` (400).
    /// - On success, breed and sub-breed are trimmed and lowercased.
    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<DogBreedRequest>::from_request(req, &()).await?;

        if let Some(pretty_body) = pretty_json_if_debug(&body) {
            debug!(body = %pretty_body, "[DogBreeds] Extracted request body");
        }

        let normalized = body.validate().map_err(DogApiError::Validation)?;
        Ok(Self(normalized.into()))
    }
}

/// Numeric `{id}` path segment.
pub(crate) struct BreedId(pub(crate) i64);

impl<S> FromRequestParts<S> for BreedId
where
    S: Send + Sync,
{
    type Rejection = DogApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
