pub mod graphql;
pub mod rest;
pub mod state;

pub use rest::routes::router;
pub use state::AppState;
