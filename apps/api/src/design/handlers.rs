//! Axum route handlers for the Design API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::design::models::{DesignRequest, DesignResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /generate
///
/// Generates a loyalty program design (narrative + structured data) for a company.
/// Refines a prior output instead when both existing_generated_output and
/// user_feedback are supplied.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<DesignRequest>, JsonRejection>,
) -> Result<Json<DesignResponse>, AppError> {
    let Json(request) = payload?;

    let response = state.design_generator().generate(request).await?;

    Ok(Json(response))
}
