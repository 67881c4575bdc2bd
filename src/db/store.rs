//! Record store contract and its SQLite implementation.
//!
//! The store does no invariant checking of its own beyond the schema constraints; the
//! lifecycle rules live in `crate::service::lifecycle` and run on top of this trait inside a
//! transaction owned by the caller.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::db::models::{BreedIdentity, DogBreed};
use crate::error::DogApiError;

/// Primitive persistence operations consumed by the lifecycle service and the seed loader.
#[async_trait]
pub trait BreedStore: Send {
    async fn find_all(&mut self) -> Result<Vec<DogBreed>, DogApiError>;

    async fn find_by_id(&mut self, id: i64) -> Result<Option<DogBreed>, DogApiError>;

    async fn find_by_breed_and_sub_breed(
        &mut self,
        breed: &str,
        sub_breed: Option<&str>,
    ) -> Result<Option<DogBreed>, DogApiError>;

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, DogApiError>;

    /// Insert a new row. A clash on `(breed, sub_breed)` is reported as
    /// [`DogApiError::UniqueViolation`].
    async fn insert(&mut self, identity: &BreedIdentity) -> Result<DogBreed, DogApiError>;

    /// Persist `breed`/`sub_breed` of an existing row and bump `updated_at`.
    async fn update(&mut self, record: &DogBreed) -> Result<DogBreed, DogApiError>;

    async fn delete_by_id(&mut self, id: i64) -> Result<(), DogApiError>;

    async fn exists_by_metadata_key(&mut self, key: &str) -> Result<bool, DogApiError>;

    /// Write a metadata entry. Writing an existing key leaves the stored value untouched.
    async fn save_metadata(&mut self, key: &str, value: &str) -> Result<(), DogApiError>;
}

const SELECT_COLUMNS: &str = "id, breed, sub_breed, created_at, updated_at";

fn map_write_err(err: sqlx::Error) -> DogApiError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DogApiError::UniqueViolation(db.message().to_string())
        }
        _ => DogApiError::DatabaseError(err),
    }
}

#[async_trait]
impl BreedStore for SqliteConnection {
    async fn find_all(&mut self) -> Result<Vec<DogBreed>, DogApiError> {
        let rows = sqlx::query_as::<_, DogBreed>(&format!(
            "SELECT {SELECT_COLUMNS} FROM dog_breeds ORDER BY id"
        ))
        .fetch_all(&mut *self)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<DogBreed>, DogApiError> {
        let row = sqlx::query_as::<_, DogBreed>(&format!(
            "SELECT {SELECT_COLUMNS} FROM dog_breeds WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self)
        .await?;

        Ok(row)
    }

    async fn find_by_breed_and_sub_breed(
        &mut self,
        breed: &str,
        sub_breed: Option<&str>,
    ) -> Result<Option<DogBreed>, DogApiError> {
        // `IS` compares NULL to NULL as equal, which `=` does not.
        let row = sqlx::query_as::<_, DogBreed>(&format!(
            "SELECT {SELECT_COLUMNS} FROM dog_breeds WHERE breed = ? AND sub_breed IS ?"
        ))
        .bind(breed)
        .bind(sub_breed)
        .fetch_optional(&mut *self)
        .await?;

        Ok(row)
    }

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, DogApiError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM dog_breeds WHERE id = ?)")
                .bind(id)
                .fetch_one(&mut *self)
                .await?;

        Ok(exists)
    }

    async fn insert(&mut self, identity: &BreedIdentity) -> Result<DogBreed, DogApiError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, DogBreed>(&format!(
            r#"
            INSERT INTO dog_breeds (breed, sub_breed, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&identity.breed)
        .bind(identity.sub_breed.as_deref())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *self)
        .await
        .map_err(map_write_err)?;

        debug!(id = row.id, breed = %row.breed, sub_breed = ?row.sub_breed, "dog breed inserted");
        Ok(row)
    }

    async fn update(&mut self, record: &DogBreed) -> Result<DogBreed, DogApiError> {
        let updated_at = Utc::now();
        let row = sqlx::query_as::<_, DogBreed>(&format!(
            r#"
            UPDATE dog_breeds
            SET breed = ?, sub_breed = ?, updated_at = ?
            WHERE id = ?
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&record.breed)
        .bind(record.sub_breed.as_deref())
        .bind(updated_at)
        .bind(record.id)
        .fetch_optional(&mut *self)
        .await
        .map_err(map_write_err)?;

        let Some(row) = row else {
            return Err(DogApiError::NotFound(record.id));
        };
        debug!(id = row.id, breed = %row.breed, sub_breed = ?row.sub_breed, "dog breed updated");
        Ok(row)
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<(), DogApiError> {
        let res = sqlx::query("DELETE FROM dog_breeds WHERE id = ?")
            .bind(id)
            .execute(&mut *self)
            .await?;

        debug!(id, affected = res.rows_affected(), "dog breed delete applied");
        Ok(())
    }

    async fn exists_by_metadata_key(&mut self, key: &str) -> Result<bool, DogApiError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM metadata WHERE meta_key = ?)")
                .bind(key)
                .fetch_one(&mut *self)
                .await?;

        Ok(exists)
    }

    async fn save_metadata(&mut self, key: &str, value: &str) -> Result<(), DogApiError> {
        sqlx::query("INSERT OR IGNORE INTO metadata (meta_key, meta_value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&mut *self)
            .await?;

        Ok(())
    }
}
