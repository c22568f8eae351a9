pub mod access;
pub mod routes;

pub use routes::routes;
