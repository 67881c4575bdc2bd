//! Inbound payload for `POST /api/dogbreeds` and `PUT /api/dogbreeds/{id}`.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Raw request body as sent by clients.
///
/// Both fields are optional at the serde level so that missing fields surface as
/// field-level validation errors instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogBreedRequest {
    #[serde(default)]
    pub breed: Option<String>,

    #[serde(default, alias = "sub_breed")]
    pub sub_breed: Option<String>,
}

/// A request that passed validation, lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBreed {
    pub breed: String,
    pub sub_breed: Option<String>,
}

impl DogBreedRequest {
    /// Validate and normalize the payload.
    ///
    /// Every failing field is reported; the caller gets the whole list at once.
    pub fn validate(&self) -> Result<NormalizedBreed, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let breed = match self.breed.as_deref() {
            None => {
                errors.push(ValidationError::new("breed", "Breed must not be blank"));
                None
            }
            Some(word) if word.trim().is_empty() => {
                errors.push(ValidationError::new("breed", "Breed must not be blank"));
                None
            }
            Some(word) if !is_single_word(word) => {
                errors.push(ValidationError::new(
                    "breed",
                    "Breed must be a single word containing only letters.",
                ));
                None
            }
            Some(word) => Some(normalize(word)),
        };

        // `null` means "no sub-breed"; an empty string is not the same thing and is rejected.
        let sub_breed = match self.sub_breed.as_deref() {
            None => None,
            Some(word) if !is_single_word(word) => {
                errors.push(ValidationError::new(
                    "subBreed",
                    "SubBreed must be a single word containing only letters.",
                ));
                None
            }
            Some(word) => Some(normalize(word)),
        };

        match breed {
            Some(breed) if errors.is_empty() => Ok(NormalizedBreed { breed, sub_breed }),
            _ => Err(errors),
        }
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_ascii_lowercase()
}

/// Checked on the raw value: surrounding whitespace is not a letter.
fn is_single_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}
