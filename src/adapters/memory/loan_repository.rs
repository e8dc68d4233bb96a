use crate::domain::{
    LoanId,
    loan::{self, Loan, LoanEligibility},
};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// LoanRepositoryのインメモリ実装
///
/// 貸出可否の判定と挿入は同じロックの中で行う。
#[derive(Default)]
pub struct LoanRepository {
    loans: Mutex<Vec<Loan>>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        let loans = lock(&self.loans, "loans")?;
        Ok(loans.iter().find(|l| l.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Loan>> {
        Ok(lock(&self.loans, "loans")?.clone())
    }

    async fn insert_if_eligible(&self, new_loan: &Loan) -> Result<LoanEligibility> {
        let mut loans = lock(&self.loans, "loans")?;

        let isbn_on_loan = loans.iter().any(|l| l.isbn == new_loan.isbn);
        let member_open_loans = loans
            .iter()
            .filter(|l| l.member_name == new_loan.member_name)
            .count();

        let eligibility = loan::check_eligibility(isbn_on_loan, member_open_loans);
        if eligibility == LoanEligibility::Eligible {
            loans.push(new_loan.clone());
        }
        Ok(eligibility)
    }

    async fn delete(&self, id: LoanId) -> Result<bool> {
        let mut loans = lock(&self.loans, "loans")?;
        let before = loans.len();
        loans.retain(|l| l.id != id);
        Ok(loans.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookId, loan::BookRef, commands::CreateLoan};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn sample_loan(member: &str, isbn: &str) -> Loan {
        let cmd = CreateLoan {
            member_name: member.to_string(),
            isbn: isbn.parse().unwrap(),
            loan_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        let book = BookRef {
            id: BookId::new(),
            title: "Title".to_string(),
        };
        loan::loan_book(cmd, book)
    }

    #[tokio::test]
    async fn test_rejects_isbn_already_on_loan() {
        let repo = LoanRepository::new();

        let first = repo.insert_if_eligible(&sample_loan("alice", "1111111111111")).await;
        let second = repo.insert_if_eligible(&sample_loan("bob", "1111111111111")).await;

        assert_eq!(first.unwrap(), LoanEligibility::Eligible);
        assert_eq!(second.unwrap(), LoanEligibility::IsbnAlreadyOnLoan);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_third_loan_for_member() {
        let repo = LoanRepository::new();
        repo.insert_if_eligible(&sample_loan("alice", "1111111111111")).await.unwrap();
        repo.insert_if_eligible(&sample_loan("alice", "2222222222222")).await.unwrap();

        let third = repo
            .insert_if_eligible(&sample_loan("alice", "3333333333333"))
            .await
            .unwrap();

        assert_eq!(third, LoanEligibility::MemberLimitReached);
    }

    #[tokio::test]
    async fn test_concurrent_requests_for_same_isbn_admit_one() {
        let repo = Arc::new(LoanRepository::new());

        let handles: Vec<_> = ["alice", "bob", "carol", "dave"]
            .into_iter()
            .map(|member| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert_if_eligible(&sample_loan(member, "1111111111111")).await
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == LoanEligibility::Eligible {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn test_delete_frees_isbn() {
        let repo = LoanRepository::new();
        let first = sample_loan("alice", "1111111111111");
        repo.insert_if_eligible(&first).await.unwrap();

        assert!(repo.delete(first.id).await.unwrap());
        assert_eq!(
            repo.insert_if_eligible(&sample_loan("bob", "1111111111111"))
                .await
                .unwrap(),
            LoanEligibility::Eligible
        );
    }
}
