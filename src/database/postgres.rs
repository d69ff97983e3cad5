use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::{ConnectionManager, DatabaseError};
use crate::database::models::Car;
use crate::database::repository::CarStore;

const INSERT_SQL: &str = r#"
    INSERT INTO cars (id, manufacture, year, model, color)
    VALUES ($1, $2, $3, $4, $5)"#;

const SELECT_ALL_SQL: &str = r#"
    SELECT id, manufacture, year, model, color, COALESCE(is_classic, FALSE) AS is_classic
    FROM cars"#;

const UPDATE_SQL: &str = r#"
    UPDATE cars
    SET manufacture = $2,
        year = $3,
        model = $4,
        color = $5,
        is_classic = $6
    WHERE id = $1"#;

const DELETE_SQL: &str = "DELETE FROM cars WHERE id = $1";

// The regex guard keeps the cast from ever raising on free-text years; rows
// whose year is not an integer fall out of the comparison as NULL.
const MARK_CLASSIC_SQL: &str = r#"
    UPDATE cars
    SET is_classic = TRUE
    WHERE (CASE
               WHEN year ~ '^[[:space:]]*[+-]?[0-9]{1,9}[[:space:]]*$'
               THEN CAST(year AS integer)
           END) < $1
      AND (is_classic = FALSE OR is_classic IS NULL)"#;

/// Postgres-backed store. Every operation opens its own connection and
/// closes it before returning.
#[derive(Clone)]
pub struct PgCarRepository {
    manager: ConnectionManager,
}

impl PgCarRepository {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl CarStore for PgCarRepository {
    async fn insert(&self, car: &mut Car) -> Result<u64, DatabaseError> {
        car.id = Uuid::new_v4();
        car.is_classic = false;

        let mut conn = self.manager.open().await?;
        let outcome = sqlx::query(INSERT_SQL)
            .bind(car.id)
            .bind(&car.manufacture)
            .bind(&car.year)
            .bind(&car.model)
            .bind(&car.color)
            .execute(&mut conn)
            .await;
        self.manager.release(conn).await;

        let rows = outcome?.rows_affected();
        debug!(id = %car.id, rows, "INSERT executed");
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<Car>, DatabaseError> {
        let mut conn = self.manager.open().await?;
        let outcome = sqlx::query_as::<_, Car>(SELECT_ALL_SQL)
            .fetch_all(&mut conn)
            .await;
        self.manager.release(conn).await;

        Ok(outcome?)
    }

    async fn update_by_id(&self, id: Uuid, car: &Car) -> Result<u64, DatabaseError> {
        let mut conn = self.manager.open().await?;
        let outcome = sqlx::query(UPDATE_SQL)
            .bind(id)
            .bind(&car.manufacture)
            .bind(&car.year)
            .bind(&car.model)
            .bind(&car.color)
            .bind(car.is_classic)
            .execute(&mut conn)
            .await;
        self.manager.release(conn).await;

        Ok(outcome?.rows_affected())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut conn = self.manager.open().await?;
        let outcome = sqlx::query(DELETE_SQL).bind(id).execute(&mut conn).await;
        self.manager.release(conn).await;

        Ok(outcome?.rows_affected())
    }

    async fn bulk_mark_classic(&self, threshold_year: i32) -> Result<u64, DatabaseError> {
        let mut conn = self.manager.open().await?;
        let outcome = sqlx::query(MARK_CLASSIC_SQL)
            .bind(threshold_year)
            .execute(&mut conn)
            .await;
        self.manager.release(conn).await;

        Ok(outcome?.rows_affected())
    }
}
