mod dogapi;

pub use dogapi::{ApiErrorBody, ApiErrorObject, DogApiError};
