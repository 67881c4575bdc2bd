//! Breed record lifecycle: the rules that keep `(breed, sub_breed)` unique.
//!
//! Every function takes the store it should run against. Callers that mutate are expected to
//! pass a transaction so the checks and the write commit (or roll back) together.

use tracing::{debug, info, warn};

use crate::db::models::{BreedIdentity, DogBreed};
use crate::db::store::BreedStore;
use crate::error::DogApiError;

pub async fn list<S>(store: &mut S) -> Result<Vec<DogBreed>, DogApiError>
where
    S: BreedStore + ?Sized,
{
    store.find_all().await
}

pub async fn get_by_id<S>(store: &mut S, id: i64) -> Result<DogBreed, DogApiError>
where
    S: BreedStore + ?Sized,
{
    store
        .find_by_id(id)
        .await?
        .ok_or(DogApiError::NotFound(id))
}

/// Insert `identity` unless a record with the same pair already exists, in which case that
/// record is returned untouched. Never fails with a duplicate error.
pub async fn create<S>(store: &mut S, identity: &BreedIdentity) -> Result<DogBreed, DogApiError>
where
    S: BreedStore + ?Sized,
{
    ensure(store, identity).await.map(Created::into_record)
}

/// Outcome of [`ensure`]: whether the record was written by this call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    Inserted(DogBreed),
    Existing(DogBreed),
}

impl Created {
    pub fn into_record(self) -> DogBreed {
        match self {
            Created::Inserted(record) | Created::Existing(record) => record,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, Created::Inserted(_))
    }
}

/// [`create`], reporting whether a new row was inserted.
pub async fn ensure<S>(store: &mut S, identity: &BreedIdentity) -> Result<Created, DogApiError>
where
    S: BreedStore + ?Sized,
{
    if let Some(existing) = find_by_identity(store, identity).await? {
        debug!(id = existing.id, breed = %existing.breed, sub_breed = ?existing.sub_breed, "create absorbed by existing record");
        return Ok(Created::Existing(existing));
    }

    match store.insert(identity).await {
        Ok(created) => {
            info!(id = created.id, breed = %created.breed, sub_breed = ?created.sub_breed, "dog breed created");
            Ok(Created::Inserted(created))
        }
        Err(err) if err.is_unique_violation() => {
            // Another writer inserted the same pair between our lookup and our insert.
            warn!(breed = %identity.breed, sub_breed = ?identity.sub_breed, error = %err, "create raced with a concurrent insert; returning existing record");
            find_by_identity(store, identity)
                .await?
                .map(Created::Existing)
                .ok_or_else(|| {
                    DogApiError::UnexpectedError(format!(
                        "unique violation on insert but no row for breed={} sub_breed={:?}",
                        identity.breed, identity.sub_breed
                    ))
                })
        }
        Err(err) => Err(err),
    }
}

/// Replace the identity of record `id`.
///
/// Guards run in a fixed order: existence, no-op, conflict, write. The no-op check has to come
/// before the conflict check, otherwise a record would conflict with itself.
pub async fn update<S>(
    store: &mut S,
    id: i64,
    identity: &BreedIdentity,
) -> Result<DogBreed, DogApiError>
where
    S: BreedStore + ?Sized,
{
    let Some(mut existing) = store.find_by_id(id).await? else {
        return Err(DogApiError::NotFound(id));
    };

    if existing.has_identity(identity) {
        debug!(id, "update is a no-op; nothing written");
        return Ok(existing);
    }

    if let Some(other) = find_by_identity(store, identity)
        .await?
        .filter(|other| other.id != id)
    {
        debug!(id, conflicting_id = other.id, "update rejected: identity held by another record");
        return Err(conflict(identity));
    }

    existing.breed.clone_from(&identity.breed);
    existing.sub_breed.clone_from(&identity.sub_breed);

    match store.update(&existing).await {
        Ok(updated) => {
            info!(id, breed = %updated.breed, sub_breed = ?updated.sub_breed, "dog breed updated");
            Ok(updated)
        }
        Err(err) if err.is_unique_violation() => Err(conflict(identity)),
        Err(err) => Err(err),
    }
}

/// Remove record `id`. Deleting an absent id is a successful no-op.
pub async fn delete<S>(store: &mut S, id: i64) -> Result<(), DogApiError>
where
    S: BreedStore + ?Sized,
{
    if !store.exists_by_id(id).await? {
        debug!(id, "delete of absent record ignored");
        return Ok(());
    }
    store.delete_by_id(id).await?;
    info!(id, "dog breed deleted");
    Ok(())
}

async fn find_by_identity<S>(
    store: &mut S,
    identity: &BreedIdentity,
) -> Result<Option<DogBreed>, DogApiError>
where
    S: BreedStore + ?Sized,
{
    store
        .find_by_breed_and_sub_breed(&identity.breed, identity.sub_breed.as_deref())
        .await
}

fn conflict(identity: &BreedIdentity) -> DogApiError {
    DogApiError::Conflict {
        breed: identity.breed.clone(),
        sub_breed: identity.sub_breed.clone(),
    }
}
