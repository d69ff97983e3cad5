// handlers/cars/create.rs - POST /cars handler

use axum::{body::Bytes, extract::State};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::{Car, CarInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

/// POST /cars - Create a car
///
/// Any `id` or `isClassic` in the body is ignored: the store assigns a fresh
/// id and new cars are never classic. Responds 201 with the created car and
/// a `Location` header.
pub async fn post(State(state): State<AppState>, body: Bytes) -> ApiResult<Car> {
    info!(operation = "CreateCar", "CreateCar triggered");

    let input = CarInput::from_slice(&body).map_err(|e| {
        warn!(operation = "CreateCar", error = %e, "CreateCar received invalid JSON");
        ApiError::from(e)
    })?;

    if let Err(e) = validate(input.as_ref()) {
        warn!(operation = "CreateCar", reason = %e, "CreateCar validation failed");
        return Err(e.into());
    }

    let mut car = input.unwrap_or_default().into_car(Uuid::nil());

    let rows = state.store.insert(&mut car).await.map_err(|e| {
        error!(operation = "CreateCar", error = %e, "CreateCar database error");
        ApiError::from(e)
    })?;

    if rows != 1 {
        error!(operation = "CreateCar", id = %car.id, rows, "CreateCar inserted unexpected row count");
        return Err(ApiError::InternalServerError);
    }

    info!(operation = "CreateCar", id = %car.id, "CreateCar completed");
    let location = format!("{}/cars/{}", state.route_prefix, car.id);
    Ok(ApiResponse::created(car, location))
}
