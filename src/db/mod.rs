//! Database module: models, schema and the actor that owns the SQLite pool.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `store.rs`: primitive record-store operations (`BreedStore`)
//! - `actor.rs`: single actor serializing all access; runs lifecycle rules in transactions

pub mod actor;
pub mod models;
pub mod schema;
pub mod store;

pub use models::{BreedIdentity, DogBreed};
pub use schema::SQLITE_INIT;
pub use store::BreedStore;

pub use actor::{DbActorHandle, spawn};
