use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::classic;
use crate::database::manager::DatabaseError;
use crate::database::models::Car;
use crate::database::repository::CarStore;

/// Process-local store with the same semantics as the Postgres table.
/// Rows are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCarStore {
    rows: RwLock<Vec<Car>>,
}

impl InMemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows verbatim, bypassing id assignment. Useful for fixtures that
    /// need a specific `is_classic` state.
    pub async fn seed(&self, cars: impl IntoIterator<Item = Car>) {
        self.rows.write().await.extend(cars);
    }
}

#[async_trait]
impl CarStore for InMemoryCarStore {
    async fn insert(&self, car: &mut Car) -> Result<u64, DatabaseError> {
        let mut rows = self.rows.write().await;

        let mut id = Uuid::new_v4();
        while rows.iter().any(|row| row.id == id) {
            id = Uuid::new_v4();
        }
        car.id = id;
        car.is_classic = false;

        rows.push(car.clone());
        Ok(1)
    }

    async fn list_all(&self) -> Result<Vec<Car>, DatabaseError> {
        Ok(self.rows.read().await.clone())
    }

    async fn update_by_id(&self, id: Uuid, car: &Car) -> Result<u64, DatabaseError> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(0);
        };

        row.manufacture = car.manufacture.clone();
        row.year = car.year.clone();
        row.model = car.model.clone();
        row.color = car.color.clone();
        row.is_classic = car.is_classic;
        Ok(1)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn bulk_mark_classic(&self, threshold_year: i32) -> Result<u64, DatabaseError> {
        let mut rows = self.rows.write().await;
        let mut changed = 0;
        for row in rows
            .iter_mut()
            .filter(|row| classic::qualifies(&row.year, row.is_classic, threshold_year))
        {
            row.is_classic = true;
            changed += 1;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(year: &str, is_classic: bool) -> Car {
        Car {
            id: Uuid::new_v4(),
            manufacture: "Ford".into(),
            year: year.into(),
            model: "Model T".into(),
            color: "Black".into(),
            is_classic,
        }
    }

    #[tokio::test]
    async fn insert_assigns_fresh_id_and_default_classic_flag() {
        let store = InMemoryCarStore::new();
        let supplied = Uuid::new_v4();
        let mut new_car = car("1990", true);
        new_car.id = supplied;

        assert_eq!(store.insert(&mut new_car).await.unwrap(), 1);
        assert_ne!(new_car.id, supplied);
        assert!(!new_car.is_classic);

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows, vec![new_car]);
    }

    #[tokio::test]
    async fn update_and_delete_report_rows_affected() {
        let store = InMemoryCarStore::new();
        let mut existing = car("1990", false);
        store.insert(&mut existing).await.unwrap();

        let replacement = Car {
            color: "Blue".into(),
            is_classic: true,
            ..existing.clone()
        };
        assert_eq!(store.update_by_id(Uuid::new_v4(), &replacement).await.unwrap(), 0);
        assert_eq!(store.update_by_id(existing.id, &replacement).await.unwrap(), 1);

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows[0].color, "Blue");
        assert!(rows[0].is_classic);

        assert_eq!(store.delete_by_id(existing.id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(existing.id).await.unwrap(), 0);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bulk_mark_classic_is_selective_and_idempotent() {
        let store = InMemoryCarStore::new();
        let old = car("1990", false);
        let text = car("abc", false);
        let already = car("1980", true);
        let boundary = car("2025", false);
        let recent = car("2030", false);
        store
            .seed(vec![
                old.clone(),
                text.clone(),
                already.clone(),
                boundary.clone(),
                recent.clone(),
            ])
            .await;

        assert_eq!(store.bulk_mark_classic(2025).await.unwrap(), 1);
        assert_eq!(store.bulk_mark_classic(2025).await.unwrap(), 0);

        let rows = store.list_all().await.unwrap();
        let flag = |id: Uuid| rows.iter().find(|r| r.id == id).unwrap().is_classic;
        assert!(flag(old.id));
        assert!(!flag(text.id));
        assert!(flag(already.id));
        assert!(!flag(boundary.id));
        assert!(!flag(recent.id));
    }
}
