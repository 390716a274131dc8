pub mod migrations;
pub mod models;
pub mod queries;

pub use migrations::create_database_pool;
