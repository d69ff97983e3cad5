pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;
pub mod repository;

pub use manager::{ConnectionManager, DatabaseError};
pub use memory::InMemoryCarStore;
pub use models::Car;
pub use postgres::PgCarRepository;
pub use record::{CarInput, RecordError};
pub use repository::CarStore;
