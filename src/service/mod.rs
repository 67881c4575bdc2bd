//! Domain services sitting between the HTTP layer and the record store.

pub mod lifecycle;

#[cfg(test)]
pub(crate) mod memory_store;
