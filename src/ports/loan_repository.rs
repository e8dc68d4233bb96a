use crate::domain::{
    LoanId,
    loan::{Loan, LoanEligibility},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出ストアポート
#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>>;

    /// 全貸出を登録順に取得する
    async fn list(&self) -> Result<Vec<Loan>>;

    /// 貸出可否を判定し、可能なら挿入する
    ///
    /// ISBNの重複チェック、会員の貸出数チェック、挿入を1つの原子的な
    /// 書き込みとして実行する。判定には `domain::loan::check_eligibility` を使う。
    /// 挿入した場合は `LoanEligibility::Eligible` を返す。
    async fn insert_if_eligible(&self, loan: &Loan) -> Result<LoanEligibility>;

    /// 貸出を削除する。削除した場合はtrue。
    async fn delete(&self, id: LoanId) -> Result<bool>;
}
