use crate::domain::{
    self, LoanId,
    commands::CreateLoan,
    loan::{Loan, LoanEligibility},
    query::FilterCriteria,
};
use crate::ports::{BookCatalog, LoanRepository};
use std::sync::Arc;

use super::errors::{LoanApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_repository: Arc<dyn LoanRepository>,
    pub book_catalog: Arc<dyn BookCatalog>,
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - ISBNに対応する書籍がカタログに存在すること
/// - 同じISBNの貸出中レコードがないこと
/// - 会員の貸出中の冊数が2冊未満であること
///
/// # 一貫性保証
///
/// カタログ照会は書籍サービスへの同期HTTP呼び出し。
/// 2つ目と3つ目のルールは挿入と同じ原子的な書き込みの中でストアが判定するため、
/// 同時リクエストが両方とも条件を満たしたと誤認することはない。
///
/// title / book_id はこの時点の書籍のスナップショットで、以後は更新されない。
///
/// # 戻り値
/// 成功時は作成された貸出のID
pub async fn create_loan(deps: &ServiceDependencies, cmd: CreateLoan) -> Result<LoanId> {
    // 1. カタログで書籍を解決
    let book = deps
        .book_catalog
        .find_by_isbn(&cmd.isbn)
        .await
        .map_err(LoanApplicationError::BookServiceError)?
        .ok_or(LoanApplicationError::BookNotFound)?;

    // 2. ドメイン層の純粋関数を呼び出し
    let loan = domain::loan::loan_book(cmd, book);

    // 3. 貸出可否の判定と挿入（原子的）
    let eligibility = deps
        .loan_repository
        .insert_if_eligible(&loan)
        .await
        .map_err(LoanApplicationError::LoanStoreError)?;

    match eligibility {
        LoanEligibility::Eligible => {
            tracing::info!(
                loan_id = %loan.id,
                isbn = %loan.isbn,
                member = %loan.member_name,
                "loan created"
            );
            Ok(loan.id)
        }
        LoanEligibility::IsbnAlreadyOnLoan => Err(LoanApplicationError::BookAlreadyOnLoan),
        LoanEligibility::MemberLimitReached => Err(LoanApplicationError::LoanLimitExceeded),
    }
}

/// 貸出を削除する（返却）
///
/// 書籍側の状態には触れない。ISBNを参照する貸出がなくなれば再び貸出可能になる。
pub async fn delete_loan(deps: &ServiceDependencies, id: &str) -> Result<()> {
    let loan_id =
        LoanId::parse(id).ok_or_else(|| LoanApplicationError::LoanNotFound(id.to_string()))?;

    let deleted = deps
        .loan_repository
        .delete(loan_id)
        .await
        .map_err(LoanApplicationError::LoanStoreError)?;

    if !deleted {
        return Err(LoanApplicationError::LoanNotFound(id.to_string()));
    }

    tracing::info!(loan_id = %loan_id, "loan deleted");
    Ok(())
}

/// IDで貸出を取得する
pub async fn get_loan(deps: &ServiceDependencies, id: &str) -> Result<Loan> {
    let loan_id =
        LoanId::parse(id).ok_or_else(|| LoanApplicationError::LoanNotFound(id.to_string()))?;

    deps.loan_repository
        .find_by_id(loan_id)
        .await
        .map_err(LoanApplicationError::LoanStoreError)?
        .ok_or_else(|| LoanApplicationError::LoanNotFound(id.to_string()))
}

/// 条件に一致する貸出を取得する
pub async fn list_loans(deps: &ServiceDependencies, criteria: &FilterCriteria) -> Result<Vec<Loan>> {
    let loans = deps
        .loan_repository
        .list()
        .await
        .map_err(LoanApplicationError::LoanStoreError)?;

    Ok(criteria.apply(loans))
}
