use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `dog_breeds`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DogBreed {
    pub id: i64,
    pub breed: String,
    /// `None` is "no sub-breed", which is its own identity class.
    pub sub_breed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The `(breed, sub_breed)` pair that identifies a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreedIdentity {
    pub breed: String,
    pub sub_breed: Option<String>,
}

impl BreedIdentity {
    pub fn new(breed: impl Into<String>, sub_breed: Option<impl Into<String>>) -> Self {
        Self {
            breed: breed.into(),
            sub_breed: sub_breed.map(Into::into),
        }
    }

    /// Identity without a sub-breed.
    pub fn bare(breed: impl Into<String>) -> Self {
        Self {
            breed: breed.into(),
            sub_breed: None,
        }
    }
}

impl DogBreed {
    pub fn has_identity(&self, identity: &BreedIdentity) -> bool {
        self.breed == identity.breed && self.sub_breed == identity.sub_breed
    }
}

impl From<dogapi_schema::NormalizedBreed> for BreedIdentity {
    fn from(n: dogapi_schema::NormalizedBreed) -> Self {
        Self {
            breed: n.breed,
            sub_breed: n.sub_breed,
        }
    }
}
