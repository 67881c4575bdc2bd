//! In-memory `BreedStore` for unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

use crate::db::models::{BreedIdentity, DogBreed};
use crate::db::store::BreedStore;
use crate::error::DogApiError;

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    rows: BTreeMap<i64, DogBreed>,
    metadata: HashMap<String, String>,
    last_id: i64,
    inserts: usize,
    /// Successful inserts, updates, deletes and metadata writes.
    pub(crate) writes: usize,
    /// Make the next identity lookup miss once.
    pub(crate) hide_next_lookup: bool,
    /// Fail every insert once this many inserts have succeeded.
    pub(crate) fail_inserts_after: Option<usize>,
}

impl MemoryStore {
    /// A store whose inserts start failing after `n` successful ones.
    pub(crate) fn failing_after(n: usize) -> Self {
        Self {
            fail_inserts_after: Some(n),
            ..Self::default()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    fn holder_of(&self, breed: &str, sub_breed: Option<&str>) -> Option<&DogBreed> {
        self.rows
            .values()
            .find(|r| r.breed == breed && r.sub_breed.as_deref() == sub_breed)
    }
}

#[async_trait]
impl BreedStore for MemoryStore {
    async fn find_all(&mut self) -> Result<Vec<DogBreed>, DogApiError> {
        Ok(self.rows.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<DogBreed>, DogApiError> {
        Ok(self.rows.get(&id).cloned())
    }

    async fn find_by_breed_and_sub_breed(
        &mut self,
        breed: &str,
        sub_breed: Option<&str>,
    ) -> Result<Option<DogBreed>, DogApiError> {
        if std::mem::take(&mut self.hide_next_lookup) {
            return Ok(None);
        }
        Ok(self.holder_of(breed, sub_breed).cloned())
    }

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, DogApiError> {
        Ok(self.rows.contains_key(&id))
    }

    async fn insert(&mut self, identity: &BreedIdentity) -> Result<DogBreed, DogApiError> {
        if self.fail_inserts_after.is_some_and(|n| self.inserts >= n) {
            return Err(DogApiError::UnexpectedError("injected store fault".to_string()));
        }
        if self
            .holder_of(&identity.breed, identity.sub_breed.as_deref())
            .is_some()
        {
            return Err(DogApiError::UniqueViolation(
                "dog_breeds.breed, dog_breeds.sub_breed".to_string(),
            ));
        }
        self.last_id += 1;
        let now = Utc::now();
        let row = DogBreed {
            id: self.last_id,
            breed: identity.breed.clone(),
            sub_breed: identity.sub_breed.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(row.id, row.clone());
        self.inserts += 1;
        self.writes += 1;
        Ok(row)
    }

    async fn update(&mut self, record: &DogBreed) -> Result<DogBreed, DogApiError> {
        if self
            .holder_of(&record.breed, record.sub_breed.as_deref())
            .is_some_and(|holder| holder.id != record.id)
        {
            return Err(DogApiError::UniqueViolation(
                "dog_breeds.breed, dog_breeds.sub_breed".to_string(),
            ));
        }
        let Some(row) = self.rows.get_mut(&record.id) else {
            return Err(DogApiError::NotFound(record.id));
        };
        row.breed.clone_from(&record.breed);
        row.sub_breed.clone_from(&record.sub_breed);
        row.updated_at = Utc::now();
        self.writes += 1;
        Ok(row.clone())
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<(), DogApiError> {
        if self.rows.remove(&id).is_some() {
            self.writes += 1;
        }
        Ok(())
    }

    async fn exists_by_metadata_key(&mut self, key: &str) -> Result<bool, DogApiError> {
        Ok(self.metadata.contains_key(key))
    }

    async fn save_metadata(&mut self, key: &str, value: &str) -> Result<(), DogApiError> {
        self.metadata
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
        self.writes += 1;
        Ok(())
    }
}
