use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::error::AppError;
use crate::models::submission::{SubmissionRecord, VerifyRequest, VerifyResponse};
use crate::phone::is_valid_phone_number;
use crate::util::token_prefix;
use crate::verifier::md5_hex;
use crate::AppState;

/// POST /verify — validate a coin token (or register a free pairing) and
/// record the attempt in the ledger.
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(
        handler = "verify",
        identifier = %body.phone_number,
        free = body.free,
        "Handler: POST /verify"
    );

    // Shape-check the identifier before it becomes a rate-limit key, so
    // garbage identifiers can't populate the bucket map.
    if !is_valid_phone_number(&body.phone_number) {
        tracing::warn!(handler = "verify", "Validation failed: invalid phone number format");
        return Err(AppError::BadRequest("Invalid phone number format".into()));
    }

    if !state.rate_limiter.check(&body.phone_number).await {
        return Err(AppError::TooManyRequests("Rate limit exceeded".into()));
    }

    tracing::debug!(handler = "verify", "Dispatching to ledger.exists_with_identifier");
    if state.ledger.exists_with_identifier(&body.phone_number).await? {
        return Err(AppError::Duplicate(format!(
            "A submission already exists for {}",
            body.phone_number
        )));
    }

    if body.free {
        return free_submission(&state, body.phone_number).await;
    }

    let value = body
        .value
        .ok_or_else(|| AppError::BadRequest("Missing required field 'value'".into()))?;
    let token = body
        .hash
        .ok_or_else(|| AppError::BadRequest("Missing required field 'hash'".into()))?;
    let amount: i64 = value
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid numeric value for 'value'".into()))?;

    tracing::info!(
        handler = "verify",
        amount,
        token = %token_prefix(&token),
        "Dispatching to verifier (blocking pool)"
    );

    // The suffix search is CPU-bound for up to ~12M hashes; keep it off the
    // I/O dispatcher.
    let verifier = state.verifier.clone();
    let search_token = token.clone();
    let outcome = tokio::task::spawn_blocking(move || verifier.verify(&search_token, amount))
        .await
        .map_err(|e| AppError::Internal(format!("verifier task failed: {e}")))?;

    tracing::info!(
        handler = "verify",
        ok = outcome.ok,
        reason = outcome.reason.as_deref().unwrap_or("-"),
        elapsed_seconds = outcome.elapsed_seconds.unwrap_or(0.0),
        "Verifier returned"
    );

    let record = SubmissionRecord::paid(
        body.phone_number,
        token.clone(),
        md5_hex(&token),
        &outcome,
    );
    tracing::debug!(handler = "verify", "Dispatching to ledger.append");
    state.ledger.append(record).await?;

    if outcome.ok {
        tracing::info!(handler = "verify", amount, status = 200, "Responding: verified");
        Ok((
            StatusCode::OK,
            Json(VerifyResponse {
                ok: true,
                message: "Verification succeeded".to_string(),
                pairing_code: Some(state.pairing_code.clone()),
                amount: Some(outcome.amount),
                reason: None,
                time_seconds: outcome.elapsed_seconds,
            }),
        ))
    } else {
        tracing::info!(handler = "verify", amount, status = 400, "Responding: verification failed");
        Ok((
            StatusCode::BAD_REQUEST,
            Json(VerifyResponse {
                ok: false,
                message: "Verification failed".to_string(),
                pairing_code: None,
                amount: None,
                reason: outcome.reason,
                time_seconds: outcome.elapsed_seconds,
            }),
        ))
    }
}

/// Free mode: record the pairing without invoking the verifier.
async fn free_submission(
    state: &AppState,
    phone_number: String,
) -> Result<(StatusCode, Json<VerifyResponse>), AppError> {
    tracing::debug!(handler = "verify", "Dispatching to ledger.append (free mode)");
    state
        .ledger
        .append(SubmissionRecord::free(phone_number))
        .await?;

    tracing::info!(handler = "verify", status = 200, "Responding: free submission recorded");
    Ok((
        StatusCode::OK,
        Json(VerifyResponse {
            ok: true,
            message: "Free submission recorded".to_string(),
            pairing_code: Some(state.pairing_code.clone()),
            amount: None,
            reason: None,
            time_seconds: None,
        }),
    ))
}
