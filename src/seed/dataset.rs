use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use tracing::debug;

use crate::db::models::BreedIdentity;
use crate::error::DogApiError;

/// Reference dataset compiled into the binary (dog.ceo breed list).
pub const BUNDLED_DATASET: &str = include_str!("../../assets/dogs.json");

/// Breed name -> sub-breed names, as shipped in the reference JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDataset {
    breeds: BTreeMap<String, Vec<String>>,
}

impl ReferenceDataset {
    /// Build a dataset, rejecting blank breed or sub-breed names.
    pub fn new(breeds: BTreeMap<String, Vec<String>>) -> Result<Self, DogApiError> {
        for (breed, sub_breeds) in &breeds {
            if breed.trim().is_empty() {
                return Err(DogApiError::InvalidDataset(
                    "breed name must not be blank".to_string(),
                ));
            }
            if sub_breeds.iter().any(|s| s.trim().is_empty()) {
                return Err(DogApiError::InvalidDataset(format!(
                    "blank sub-breed listed under {breed}"
                )));
            }
        }
        Ok(Self { breeds })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DogApiError> {
        let breeds: BTreeMap<String, Vec<String>> = serde_json::from_reader(reader)?;
        Self::new(breeds)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DogApiError> {
        let breeds: BTreeMap<String, Vec<String>> = serde_json::from_slice(bytes)?;
        Self::new(breeds)
    }

    pub fn bundled() -> Result<Self, DogApiError> {
        Self::from_slice(BUNDLED_DATASET.as_bytes())
    }

    pub fn breed_count(&self) -> usize {
        self.breeds.len()
    }

    /// Number of records a seed run produces.
    pub fn record_count(&self) -> usize {
        self.breeds.values().map(|subs| subs.len().max(1)).sum()
    }

    /// One identity per sub-breed, or a single bare identity for breeds without any.
    pub fn identities(&self) -> impl Iterator<Item = BreedIdentity> + '_ {
        self.breeds.iter().flat_map(|(breed, sub_breeds)| {
            if sub_breeds.is_empty() {
                vec![BreedIdentity::bare(breed.as_str())]
            } else {
                sub_breeds
                    .iter()
                    .map(|sub| BreedIdentity::new(breed.as_str(), Some(sub.as_str())))
                    .collect()
            }
        })
    }
}

/// Where the seed loader reads its dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Bundled,
    File(PathBuf),
}

impl DatasetSource {
    pub fn load(&self) -> Result<ReferenceDataset, DogApiError> {
        let dataset = match self {
            DatasetSource::Bundled => ReferenceDataset::bundled()?,
            DatasetSource::File(path) => {
                let file = File::open(path)?;
                ReferenceDataset::from_reader(BufReader::new(file))?
            }
        };
        debug!(
            source = ?self,
            breeds = dataset.breed_count(),
            records = dataset.record_count(),
            "reference dataset loaded"
        );
        Ok(dataset)
    }
}
