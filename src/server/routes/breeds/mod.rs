use crate::server::router::DogApiState;
use axum::{Router, routing::get};

pub mod extract;
pub mod handlers;

pub fn router() -> Router<DogApiState> {
    Router::new()
        .route(
            "/api/dogbreeds",
            get(handlers::list_breeds).post(handlers::create_breed),
        )
        .route(
            "/api/dogbreeds/{id}",
            get(handlers::get_breed)
                .put(handlers::update_breed)
                .delete(handlers::delete_breed),
        )
}
