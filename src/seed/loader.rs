use tracing::{error, info};

use super::dataset::{DatasetSource, ReferenceDataset};
use crate::db::DbActorHandle;
use crate::db::store::BreedStore;
use crate::error::DogApiError;
use crate::service::lifecycle;

/// Metadata key whose presence marks the catalog as seeded.
pub const SEED_FLAG_KEY: &str = "dog_breeds_loaded";
const SEED_FLAG_VALUE: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedState {
    NotSeeded,
    Seeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The flag was already set; nothing was written.
    AlreadySeeded,
    /// The dataset was loaded and the flag set. `records` counts rows this run inserted;
    /// entries that already had a row are not included.
    Seeded { records: usize },
}

pub async fn seed_state<S>(store: &mut S) -> Result<SeedState, DogApiError>
where
    S: BreedStore + ?Sized,
{
    if store.exists_by_metadata_key(SEED_FLAG_KEY).await? {
        Ok(SeedState::Seeded)
    } else {
        Ok(SeedState::NotSeeded)
    }
}

/// Insert every dataset record and then set the flag.
///
/// Must run inside a single transaction: the flag is only meaningful if it commits together
/// with the rows. Records go through [`lifecycle::ensure`], so rows that already exist are
/// reused instead of failing the run.
pub async fn apply<S>(store: &mut S, dataset: &ReferenceDataset) -> Result<SeedOutcome, DogApiError>
where
    S: BreedStore + ?Sized,
{
    if seed_state(store).await? == SeedState::Seeded {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut records = 0;
    for identity in dataset.identities() {
        if lifecycle::ensure(store, &identity).await?.is_inserted() {
            records += 1;
        }
    }

    store.save_metadata(SEED_FLAG_KEY, SEED_FLAG_VALUE).await?;
    Ok(SeedOutcome::Seeded { records })
}

/// Startup entry point: seed the catalog once, loading the dataset only when needed.
///
/// Any failure comes back as [`DogApiError::SeedFailure`] and leaves the flag unset; the caller
/// must not start serving.
pub async fn run(db: &DbActorHandle, source: &DatasetSource) -> Result<SeedOutcome, DogApiError> {
    seed_once(db, source).await.map_err(|err| {
        error!(error = %err, source = ?source, "Failed to load dog breeds");
        DogApiError::seed_failure(err)
    })
}

async fn seed_once(db: &DbActorHandle, source: &DatasetSource) -> Result<SeedOutcome, DogApiError> {
    if db.seed_state().await? == SeedState::Seeded {
        info!("Dog breeds already loaded, skipping dataset import.");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let dataset = source.load()?;
    let outcome = db.seed(dataset).await?;
    match outcome {
        SeedOutcome::Seeded { records } => {
            info!(records, "Dog breeds loaded into database successfully.");
        }
        SeedOutcome::AlreadySeeded => {
            info!("Dog breeds were loaded concurrently by another instance.");
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::BreedIdentity;
    use crate::service::memory_store::MemoryStore;

    fn sample() -> ReferenceDataset {
        ReferenceDataset::from_slice(br#"{"bulldog": ["french", "boston"], "akita": []}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn seeds_records_then_sets_flag() {
        let mut store = MemoryStore::default();
        let outcome = apply(&mut store, &sample()).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Seeded { records: 3 });
        assert_eq!(store.len(), 3);
        assert_eq!(store.metadata(SEED_FLAG_KEY), Some("true"));
        assert_eq!(seed_state(&mut store).await.unwrap(), SeedState::Seeded);
    }

    #[tokio::test]
    async fn second_run_inserts_nothing() {
        let mut store = MemoryStore::default();
        apply(&mut store, &sample()).await.unwrap();
        let writes = store.writes;

        let outcome = apply(&mut store, &sample()).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadySeeded);
        assert_eq!(store.len(), 3);
        assert_eq!(store.writes, writes);
    }

    #[tokio::test]
    async fn store_fault_mid_load_leaves_flag_unset() {
        let mut store = MemoryStore::failing_after(1);
        let err = apply(&mut store, &sample()).await.unwrap_err();

        assert!(matches!(err, DogApiError::UnexpectedError(_)));
        assert_eq!(store.metadata(SEED_FLAG_KEY), None);
        assert_eq!(seed_state(&mut store).await.unwrap(), SeedState::NotSeeded);
    }

    #[tokio::test]
    async fn preexisting_rows_are_reused() {
        let mut store = MemoryStore::default();
        let existing = lifecycle::create(&mut store, &BreedIdentity::bare("akita"))
            .await
            .unwrap();

        let outcome = apply(&mut store, &sample()).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Seeded { records: 2 });
        assert_eq!(store.len(), 3);
        assert_eq!(
            lifecycle::get_by_id(&mut store, existing.id).await.unwrap(),
            existing
        );
    }

    #[tokio::test]
    async fn repeated_entries_count_once() {
        let mut store = MemoryStore::default();
        let dataset =
            ReferenceDataset::from_slice(br#"{"hound": ["afghan", "afghan"]}"#).unwrap();

        let outcome = apply(&mut store, &dataset).await.unwrap();
        assert_eq!(outcome, SeedOutcome::Seeded { records: 1 });
        assert_eq!(store.len(), 1);
    }
}
