//! API layer for the Closet domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ClosetState;
pub use routes::routes;
