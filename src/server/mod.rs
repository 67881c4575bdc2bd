pub mod router;
pub mod routes;

pub use router::{DogApiState, dogapi_router};
