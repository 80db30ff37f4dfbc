//! # REST API for Transactions
//!
//! Endpoints for listing, creating, updating and deleting transactions, and
//! for the total of all amounts.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use shared::coerce::number_value;
use shared::{DeleteResponse, Transaction, TransactionFields};
use tracing::info;

use crate::io::rest::error::{body_or_default, ApiError};
use crate::AppState;

const NOT_FOUND: &str = "Transaction not found";

/// Create the transaction API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/totalBalance", get(total_amount))
        .route(
            "/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    info!("GET /api/transactions");

    let transactions = state
        .transaction_service
        .list_transactions()
        .await
        .map_err(|e| ApiError::internal("Error retrieving transactions", e))?;
    Ok(Json(transactions))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Transaction>, ApiError> {
    const FAILED: &str = "Error creating transaction";
    let fields: TransactionFields = body_or_default(&headers, &body, FAILED)?;
    info!("POST /api/transactions - fields: {:?}", fields);

    let transaction = state
        .transaction_service
        .create_transaction(fields)
        .await
        .map_err(|e| ApiError::internal(FAILED, e))?;
    Ok(Json(transaction))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    info!("GET /api/transactions/{}", id);

    state
        .transaction_service
        .get_transaction(&id)
        .await
        .map_err(|e| ApiError::internal("Error retrieving transaction", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Transaction>, ApiError> {
    const FAILED: &str = "Error updating transaction";
    let fields: TransactionFields = body_or_default(&headers, &body, FAILED)?;
    info!("PUT /api/transactions/{} - fields: {:?}", id, fields);

    state
        .transaction_service
        .update_transaction(&id, fields)
        .await
        .map_err(|e| ApiError::internal(FAILED, e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    info!("DELETE /api/transactions/{}", id);

    let deleted = state
        .transaction_service
        .delete_transaction(&id)
        .await
        .map_err(|e| ApiError::internal("Error deleting transaction", e))?;

    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(DeleteResponse {
        message: "Transaction deleted".to_string(),
    }))
}

/// Sum of all transaction amounts
pub async fn total_amount(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    info!("GET /api/transactions/totalBalance");

    let total = state
        .transaction_service
        .total_amount()
        .await
        .map_err(|e| ApiError::internal("Error calculating total balance", e))?;
    Ok(Json(number_value(total)))
}
