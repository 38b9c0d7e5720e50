//! Database models and store operations

pub mod init;
pub mod models;
pub mod products;
pub mod reference;
pub mod seed;

pub use init::init_database;
pub use models::{Batch, Location, Order, Product};
pub use seed::{SeedDocument, SeedReport};
