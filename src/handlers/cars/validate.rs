// handlers/cars/validate.rs - PATCH /cars/validate handler

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::app::AppState;
use crate::classic;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResult {
    pub updated_count: u64,
    pub timestamp: String,
}

/// PATCH /cars/validate - Mark old cars as classics
///
/// The threshold is recomputed from the clock on every call. Cars already
/// marked classic and cars whose year is not a number are left alone, so a
/// second run straight after the first reports zero updates.
pub async fn patch(State(state): State<AppState>) -> ApiResult<ValidateResult> {
    info!(operation = "ValidateCars", "ValidateCars triggered");

    let threshold = classic::threshold_year(Utc::now());
    info!(operation = "ValidateCars", threshold, "ValidateCars using threshold year");

    let updated_count = state.store.bulk_mark_classic(threshold).await.map_err(|e| {
        error!(operation = "ValidateCars", threshold, error = %e, "ValidateCars database error");
        ApiError::from(e)
    })?;

    let result = ValidateResult {
        updated_count,
        timestamp: classic::format_timestamp(Utc::now()),
    };

    info!(
        operation = "ValidateCars",
        timestamp = %result.timestamp,
        count = updated_count,
        "ValidateCars completed"
    );
    Ok(ApiResponse::success(result))
}
