use crate::domain::{
    BookId, Isbn, LoanId,
    loan::{self, Loan, LoanEligibility},
};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::is_unique_violation;

/// PostgreSQLの行データをLoanに変換する
fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    let isbn: String = row.get("isbn");

    Ok(Loan {
        id: LoanId::from_uuid(row.get("id")),
        member_name: row.get("member_name"),
        isbn: Isbn::try_from(isbn)?,
        loan_date: row.get("loan_date"),
        title: row.get("title"),
        book_id: BookId::from_uuid(row.get("book_id")),
    })
}

/// LoanRepositoryのPostgreSQL実装
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT id, member_name, isbn, loan_date, title, book_id
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn list(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, member_name, isbn, loan_date, title, book_id
            FROM loans
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    /// 貸出可否を判定し、可能なら挿入する
    ///
    /// # 一貫性保証
    ///
    /// 1つのトランザクションの中で以下を実行する：
    /// 1. 会員名のアドバイザリロックを取得（同じ会員の判定を直列化）
    /// 2. ISBNの貸出有無と会員の貸出数を数える
    /// 3. 判定が通れば挿入
    ///
    /// 別の会員が同じISBNを同時に借りようとした場合は `loans_isbn_unique` 制約で弾かれ、
    /// `IsbnAlreadyOnLoan` として返る。
    async fn insert_if_eligible(&self, new_loan: &Loan) -> Result<LoanEligibility> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&new_loan.member_name)
            .execute(&mut *tx)
            .await?;

        let isbn_on_loan: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM loans WHERE isbn = $1)")
                .bind(new_loan.isbn.as_str())
                .fetch_one(&mut *tx)
                .await?;

        let member_open_loans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE member_name = $1")
                .bind(&new_loan.member_name)
                .fetch_one(&mut *tx)
                .await?;

        let eligibility =
            loan::check_eligibility(isbn_on_loan, usize::try_from(member_open_loans)?);
        if eligibility != LoanEligibility::Eligible {
            tx.rollback().await?;
            return Ok(eligibility);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO loans (id, member_name, isbn, loan_date, title, book_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(new_loan.id.value())
        .bind(&new_loan.member_name)
        .bind(new_loan.isbn.as_str())
        .bind(new_loan.loan_date)
        .bind(&new_loan.title)
        .bind(new_loan.book_id.value())
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                return Ok(LoanEligibility::IsbnAlreadyOnLoan);
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        tracing::debug!(loan_id = %new_loan.id, "loan row inserted");
        Ok(LoanEligibility::Eligible)
    }

    async fn delete(&self, id: LoanId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
