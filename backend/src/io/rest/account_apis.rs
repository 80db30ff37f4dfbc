//! # REST API for Accounts
//!
//! CRUD endpoints for account records plus the balance total.

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
use shared::{Account, AccountFields, DeleteResponse};
use tracing::info;

use crate::io::rest::error::{body_or_default, ApiError};
use crate::AppState;

const NOT_FOUND: &str = "Account not found";

/// Create the account API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/totalBalance", get(total_balance))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
}

/// List every account
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    info!("GET /api/accounts");

    let accounts = state
        .account_service
        .list_accounts()
        .await
        .map_err(|e| ApiError::internal("Error retrieving accounts", e))?;
    Ok(Json(accounts))
}

/// Create an account from whatever fields the body carries
pub async fn create_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Account>, ApiError> {
    const FAILED: &str = "Error creating account";
    let fields: AccountFields = body_or_default(&headers, &body, FAILED)?;
    info!("POST /api/accounts - fields: {:?}", fields);

    let account = state
        .account_service
        .create_account(fields)
        .await
        .map_err(|e| ApiError::internal(FAILED, e))?;
    Ok(Json(account))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    info!("GET /api/accounts/{}", id);

    state
        .account_service
        .get_account(&id)
        .await
        .map_err(|e| ApiError::internal("Error retrieving account", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

/// Apply a partial update and return the account as it is afterwards
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Account>, ApiError> {
    const FAILED: &str = "Error updating account";
    let fields: AccountFields = body_or_default(&headers, &body, FAILED)?;
    info!("PUT /api/accounts/{} - fields: {:?}", id, fields);

    state
        .account_service
        .update_account(&id, fields)
        .await
        .map_err(|e| ApiError::internal(FAILED, e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    info!("DELETE /api/accounts/{}", id);

    let deleted = state
        .account_service
        .delete_account(&id)
        .await
        .map_err(|e| ApiError::internal("Error deleting account", e))?;

    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(DeleteResponse {
        message: "Account deleted".to_string(),
    }))
}

/// Sum of all account balances
pub async fn total_balance(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    info!("GET /api/accounts/totalBalance");

    let total = state
        .account_service
        .total_balance()
        .await
        .map_err(|e| ApiError::internal("Error calculating total balance", e))?;
    Ok(Json(number_value(total)))
}
