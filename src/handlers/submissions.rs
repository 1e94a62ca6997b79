use axum::{extract::State, response::IntoResponse, Json};

use crate::error::AppError;
use crate::models::submission::SubmissionsResponse;
use crate::AppState;

/// GET /submissions — the full audit trail in insertion order.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!(handler = "list_submissions", "Handler: GET /submissions");

    let data = state.ledger.list_all().await?;

    tracing::info!(
        handler = "list_submissions",
        count = data.len(),
        status = 200,
        "Responding: submissions listed"
    );
    Ok(Json(SubmissionsResponse {
        count: data.len(),
        data,
    }))
}
