use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Car;

/// Persistence operations over the `cars` table.
///
/// Mutations report the number of rows affected; zero means no row matched
/// and is not an error.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Assign `car` a fresh id, reset `is_classic` to the storage default
    /// (false) and persist it. Returns the number of rows inserted.
    async fn insert(&self, car: &mut Car) -> Result<u64, DatabaseError>;

    /// Every row, fully materialised.
    async fn list_all(&self) -> Result<Vec<Car>, DatabaseError>;

    /// Replace all mutable fields of the row with `id`.
    async fn update_by_id(&self, id: Uuid, car: &Car) -> Result<u64, DatabaseError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, DatabaseError>;

    /// Mark as classic every non-classic row whose `year` is an integer
    /// strictly below `threshold_year`. Rows with non-numeric years are
    /// skipped. Returns the number of rows changed.
    async fn bulk_mark_classic(&self, threshold_year: i32) -> Result<u64, DatabaseError>;
}
