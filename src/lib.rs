pub mod config;
pub mod db;
pub mod error;
pub mod seed;
pub mod server;
pub mod service;
pub(crate) mod utils;

pub use db::{BreedIdentity, DbActorHandle, DogBreed};
pub use error::DogApiError;
