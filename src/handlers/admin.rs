use axum::{extract::State, response::IntoResponse, Json};

use crate::error::AppError;
use crate::models::submission::{RemoveRequest, RemoveResponse};
use crate::AppState;

/// POST /admin/remove — bulk-delete every record for an identifier.
/// Idempotent; removing an unknown identifier reports 0.
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(
        handler = "admin_remove",
        identifier = %body.identifier,
        "Handler: POST /admin/remove"
    );

    let removed = state.ledger.remove_by_identifier(&body.identifier).await?;

    tracing::info!(
        handler = "admin_remove",
        identifier = %body.identifier,
        removed,
        status = 200,
        "Responding: records removed"
    );
    Ok(Json(RemoveResponse { removed }))
}
