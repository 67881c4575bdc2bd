//! One-shot startup seeding of the breed catalog from the reference dataset.

mod dataset;
mod loader;

pub use dataset::{BUNDLED_DATASET, DatasetSource, ReferenceDataset};
pub use loader::{SEED_FLAG_KEY, SeedOutcome, SeedState, apply, run, seed_state};
