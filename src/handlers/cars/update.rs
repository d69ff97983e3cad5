// handlers/cars/update.rs - PUT /cars/:id handler

use axum::{
    body::Bytes,
    extract::{Path, State},
};
use tracing::{error, info, warn};

use super::utils::parse_car_id;
use crate::app::AppState;
use crate::database::{Car, CarInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

/// PUT /cars/:id - Replace every mutable field of a car
///
/// The id always comes from the path; an id in the body is ignored.
/// `isClassic` is taken from the body (absent means false).
pub async fn put(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Car> {
    info!(operation = "UpdateCar", id = %raw_id, "UpdateCar triggered");

    let id = parse_car_id(&raw_id)?;

    let input = CarInput::from_slice(&body).map_err(|e| {
        warn!(operation = "UpdateCar", %id, error = %e, "UpdateCar received invalid JSON");
        ApiError::from(e)
    })?;

    if let Err(e) = validate(input.as_ref()) {
        warn!(operation = "UpdateCar", %id, reason = %e, "UpdateCar validation failed");
        return Err(e.into());
    }

    let car = input.unwrap_or_default().into_car(id);

    let rows = state.store.update_by_id(id, &car).await.map_err(|e| {
        error!(operation = "UpdateCar", %id, error = %e, "UpdateCar database error");
        ApiError::from(e)
    })?;
    info!(operation = "UpdateCar", %id, rows, "UpdateCar UPDATE executed");

    if rows == 0 {
        warn!(operation = "UpdateCar", %id, "UpdateCar found no record");
        return Err(ApiError::NotFound);
    }

    info!(operation = "UpdateCar", %id, "UpdateCar successfully updated");
    Ok(ApiResponse::success(car))
}
