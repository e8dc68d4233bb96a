use chrono::NaiveDate;
use rusty_library_services::adapters::mock::BookCatalog;
use rusty_library_services::application::loan::{
    LoanApplicationError, ServiceDependencies, create_loan, delete_loan, get_loan, list_loans,
};
use rusty_library_services::domain::commands::*;
use rusty_library_services::domain::query::FilterCriteria;
use std::sync::Arc;

mod common;

// ============================================================================
// テスト用ヘルパー
// ============================================================================

fn loan_cmd(member: &str, isbn: &str) -> CreateLoan {
    CreateLoan {
        member_name: member.to_string(),
        isbn: isbn.parse().unwrap(),
        loan_date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
    }
}

fn setup() -> (Arc<BookCatalog>, ServiceDependencies) {
    let catalog = Arc::new(BookCatalog::new());
    for (isbn, title) in [
        ("1111111111111", "One"),
        ("2222222222222", "Two"),
        ("3333333333333", "Three"),
    ] {
        catalog.add_book(isbn, title);
    }
    let deps = common::loan_deps(catalog.clone());
    (catalog, deps)
}

// ============================================================================
// 貸出の作成
// ============================================================================

#[tokio::test]
async fn test_create_loan_snapshots_book() {
    // Arrange
    let catalog = Arc::new(BookCatalog::new());
    let book_id = catalog.add_book("9780441013593", "Dune");
    let deps = common::loan_deps(catalog);

    // Act
    let loan_id = create_loan(&deps, loan_cmd("alice", "9780441013593"))
        .await
        .unwrap();

    // Assert
    let loan = get_loan(&deps, &loan_id.to_string()).await.unwrap();
    assert_eq!(loan.book_id, book_id);
    assert_eq!(loan.title, "Dune");
    assert_eq!(loan.member_name, "alice");
    assert_eq!(loan.loan_date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
}

#[tokio::test]
async fn test_create_loan_for_unknown_book() {
    let (_, deps) = setup();

    let result = create_loan(&deps, loan_cmd("alice", "9999999999999")).await;

    assert!(matches!(result, Err(LoanApplicationError::BookNotFound)));
}

#[tokio::test]
async fn test_create_loan_rejects_isbn_already_on_loan() {
    let (_, deps) = setup();
    create_loan(&deps, loan_cmd("alice", "1111111111111"))
        .await
        .unwrap();

    let result = create_loan(&deps, loan_cmd("bob", "1111111111111")).await;

    assert!(matches!(result, Err(LoanApplicationError::BookAlreadyOnLoan)));
}

#[tokio::test]
async fn test_create_loan_rejects_third_loan_for_member() {
    let (_, deps) = setup();
    create_loan(&deps, loan_cmd("alice", "1111111111111"))
        .await
        .unwrap();
    create_loan(&deps, loan_cmd("alice", "2222222222222"))
        .await
        .unwrap();

    let result = create_loan(&deps, loan_cmd("alice", "3333333333333")).await;

    assert!(matches!(result, Err(LoanApplicationError::LoanLimitExceeded)));
    // 他の会員は影響を受けない
    assert!(create_loan(&deps, loan_cmd("bob", "3333333333333")).await.is_ok());
}

#[tokio::test]
async fn test_create_loan_when_books_service_is_down() {
    let (catalog, deps) = setup();
    catalog.set_unavailable(true);

    let result = create_loan(&deps, loan_cmd("alice", "1111111111111")).await;

    assert!(matches!(result, Err(LoanApplicationError::BookServiceError(_))));
    assert!(list_loans(&deps, &FilterCriteria::default()).await.unwrap().is_empty());
}

// ============================================================================
// 貸出の削除・取得
// ============================================================================

#[tokio::test]
async fn test_delete_loan_makes_book_available_again() {
    let (_, deps) = setup();
    let loan_id = create_loan(&deps, loan_cmd("alice", "1111111111111"))
        .await
        .unwrap()
        .to_string();

    delete_loan(&deps, &loan_id).await.unwrap();

    assert!(matches!(
        get_loan(&deps, &loan_id).await,
        Err(LoanApplicationError::LoanNotFound(_))
    ));
    assert!(create_loan(&deps, loan_cmd("bob", "1111111111111")).await.is_ok());
}

#[tokio::test]
async fn test_delete_unknown_loan_is_not_found() {
    let (_, deps) = setup();

    assert!(matches!(
        delete_loan(&deps, "nope").await,
        Err(LoanApplicationError::LoanNotFound(ref id)) if id == "nope"
    ));
}

#[tokio::test]
async fn test_list_loans_filters_by_member_and_date() {
    // Arrange
    let (_, deps) = setup();
    create_loan(&deps, loan_cmd("alice", "1111111111111"))
        .await
        .unwrap();
    create_loan(&deps, loan_cmd("bob", "2222222222222"))
        .await
        .unwrap();

    // Act
    let criteria = FilterCriteria::from_pairs(&[
        ("memberName".to_string(), "bob".to_string()),
        ("loanDate".to_string(), "2024-05-20".to_string()),
    ]);
    let loans = list_loans(&deps, &criteria).await.unwrap();

    // Assert
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].title, "Two");
}

#[tokio::test]
async fn test_concurrent_loans_respect_member_cap() {
    // Arrange
    let (catalog, _) = setup();
    catalog.add_book("4444444444444", "Four");
    catalog.add_book("5555555555555", "Five");
    let deps = Arc::new(common::loan_deps(catalog));

    // Act
    let handles: Vec<_> = [
        "1111111111111",
        "2222222222222",
        "3333333333333",
        "4444444444444",
        "5555555555555",
    ]
    .into_iter()
    .map(|isbn| {
        let deps = deps.clone();
        tokio::spawn(async move { create_loan(&deps, loan_cmd("alice", isbn)).await })
    })
    .collect();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }

    // Assert
    assert_eq!(created, 2);
    assert_eq!(
        list_loans(&deps, &FilterCriteria::default()).await.unwrap().len(),
        2
    );
}
