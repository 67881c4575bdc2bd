pub mod breed;
pub mod validation;

pub use breed::{DogBreedRequest, NormalizedBreed};
pub use validation::ValidationError;
