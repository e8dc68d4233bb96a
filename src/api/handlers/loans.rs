use crate::application::loan::{
    create_loan as execute_create_loan, delete_loan as execute_delete_loan,
    get_loan as execute_get_loan, list_loans as execute_list_loans,
};
use crate::domain::validation::{validate_create_loan, validate_loan_query};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::LoansState;
use crate::api::{
    error::ApiError,
    extract::JsonObject,
    types::{LoanCreatedResponse, LoanResponse, SuccessResponse},
};

// ============================================================================
// Command handlers
// ============================================================================

/// POST /loans - 新しい貸出を作成
///
/// 強制されるビジネスルール:
/// - ISBNに対応する書籍が書籍サービスに存在すること
/// - 同じISBNの貸出中レコードがないこと
/// - 会員の貸出数が上限（2冊）に達していないこと
pub async fn create_loan(
    State(state): State<Arc<LoansState>>,
    JsonObject(payload): JsonObject,
) -> Result<(StatusCode, Json<LoanCreatedResponse>), ApiError> {
    let cmd = validate_create_loan(&payload)?;

    let loan_id = execute_create_loan(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanCreatedResponse {
            loan_id: loan_id.value(),
        }),
    ))
}

/// DELETE /loans/:id - 貸出を削除（返却）
pub async fn delete_loan(
    State(state): State<Arc<LoansState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    execute_delete_loan(&state.service_deps, &id).await?;

    Ok(Json(SuccessResponse::new(format!(
        "Loan with ID={} has been successfully deleted",
        id
    ))))
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /loans/:id
pub async fn get_loan(
    State(state): State<Arc<LoansState>>,
    Path(id): Path<String>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = execute_get_loan(&state.service_deps, &id).await?;
    Ok(Json(LoanResponse::from(loan)))
}

/// GET /loans - 条件に一致する貸出の一覧
pub async fn list_loans(
    State(state): State<Arc<LoansState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let criteria = validate_loan_query(&params)?;

    let loans = execute_list_loans(&state.service_deps, &criteria).await?;

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}
