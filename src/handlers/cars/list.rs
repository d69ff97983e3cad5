// handlers/cars/list.rs - GET /cars handler

use axum::extract::State;
use tracing::{error, info};

use crate::app::AppState;
use crate::database::Car;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /cars - List every car
pub async fn get(State(state): State<AppState>) -> ApiResult<Vec<Car>> {
    info!(operation = "GetCars", "GetCars endpoint called");

    let cars = state.store.list_all().await.map_err(|e| {
        error!(operation = "GetCars", error = %e, "GetCars database error");
        ApiError::from(e)
    })?;

    info!(operation = "GetCars", count = cars.len(), "GetCars returning cars");
    Ok(ApiResponse::success(cars))
}
