// handlers/cars/delete.rs - DELETE /cars/:id handler

use axum::extract::{Path, State};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::utils::parse_car_id;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// DELETE /cars/:id - Permanently remove a car
pub async fn delete(State(state): State<AppState>, Path(raw_id): Path<String>) -> ApiResult<Value> {
    info!(operation = "DeleteCar", id = %raw_id, "DeleteCar triggered");

    let id = parse_car_id(&raw_id)?;

    let rows = state.store.delete_by_id(id).await.map_err(|e| {
        error!(operation = "DeleteCar", %id, error = %e, "DeleteCar database error");
        ApiError::from(e)
    })?;
    info!(operation = "DeleteCar", %id, rows, "DeleteCar DELETE executed");

    if rows == 0 {
        warn!(operation = "DeleteCar", %id, "DeleteCar found no record");
        return Err(ApiError::NotFound);
    }

    info!(operation = "DeleteCar", %id, "DeleteCar successfully deleted");
    Ok(ApiResponse::success(json!({ "message": "Deleted" })))
}
