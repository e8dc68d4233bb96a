use crate::domain::{
    self, Book, BookId, Isbn,
    commands::{CreateBook, UpdateBook},
    loan::BookRef,
    query::FilterCriteria,
};
use crate::ports::{BookRepository, BookWrite, MetadataLookup, MetadataLookupResult, RatingRepository};
use std::sync::Arc;

use super::errors::{BookApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 書籍ストアと評価ストアは別々のアダプタとして注入される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
    pub rating_repository: Arc<dyn RatingRepository>,
    pub metadata_lookup: Arc<dyn MetadataLookup>,
}

/// IDで書籍を取得するヘルパー関数
///
/// UUIDとして解釈できないIDも「見つからない」として扱う。
async fn load_book(deps: &ServiceDependencies, id: &str) -> Result<Book> {
    let book_id =
        BookId::parse(id).ok_or_else(|| BookApplicationError::BookNotFound(id.to_string()))?;

    deps.book_repository
        .find_by_id(book_id)
        .await
        .map_err(BookApplicationError::BookStoreError)?
        .ok_or_else(|| BookApplicationError::BookNotFound(id.to_string()))
}

/// 書籍を登録する
///
/// ビジネスルール：
/// - 同じISBNの書籍が存在しないこと
/// - 書誌メタデータが取得できること（該当なしは400、到達不能は500）
/// - 書籍と同じIDの評価（values=[]、average=0）を必ず作成する
///
/// # 一貫性保証
///
/// ISBNの事前チェックは外部呼び出しを省くためのもので、一意性そのものは
/// ストアの挿入時に強制される。競合した場合も `DuplicateIsbn` になる。
///
/// 書籍と評価は別ストアのため、評価の挿入に失敗した場合は書籍の削除で補償する。
/// 補償にも失敗した場合は評価を持たない書籍が残り、ログに記録される。
///
/// # 戻り値
/// 成功時は作成された書籍のID
pub async fn create_book(deps: &ServiceDependencies, cmd: CreateBook) -> Result<BookId> {
    // 1. ISBNの重複確認
    let existing = deps
        .book_repository
        .find_by_isbn(&cmd.isbn)
        .await
        .map_err(BookApplicationError::BookStoreError)?;

    if existing.is_some() {
        return Err(BookApplicationError::DuplicateIsbn);
    }

    // 2. 書誌メタデータの取得
    let metadata = match deps.metadata_lookup.lookup(&cmd.isbn).await {
        MetadataLookupResult::Found(metadata) => metadata,
        MetadataLookupResult::NotFound => return Err(BookApplicationError::MetadataNotFound),
        MetadataLookupResult::Unreachable(reason) => {
            tracing::error!(isbn = %cmd.isbn, %reason, "metadata lookup failed");
            return Err(BookApplicationError::MetadataUnreachable(reason));
        }
    };

    // 3. ドメイン層の純粋関数を呼び出し
    let (book, rating) = domain::register_book(cmd, metadata);

    // 4. 書籍を保存
    let written = deps
        .book_repository
        .insert(&book)
        .await
        .map_err(BookApplicationError::BookStoreError)?;

    if written == BookWrite::DuplicateIsbn {
        return Err(BookApplicationError::DuplicateIsbn);
    }

    // 5. 対になる評価を保存（失敗したら書籍を削除して補償）
    if let Err(e) = deps.rating_repository.insert(&rating).await {
        tracing::warn!(book_id = %book.id, error = %e, "rating insert failed, removing book");
        if let Err(compensation) = deps.book_repository.delete(book.id).await {
            tracing::error!(
                book_id = %book.id,
                error = %compensation,
                "compensating delete failed, book has no rating"
            );
        }
        return Err(BookApplicationError::RatingStoreError(e));
    }

    tracing::info!(book_id = %book.id, isbn = %book.isbn, "book created");
    Ok(book.id)
}

/// 書籍を全項目で置き換える（PUT）
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 変更後のISBNが他の書籍と重複しないこと
/// - タイトルが変わった場合は評価のタイトルも同期する
///
/// 貸出側に保存されたタイトルは同期しない（貸出時点のスナップショット）。
pub async fn update_book(deps: &ServiceDependencies, id: &str, cmd: UpdateBook) -> Result<()> {
    // 1. 既存の書籍を取得
    let existing = load_book(deps, id).await?;

    // 2. ISBNが変わる場合は重複確認
    if existing.isbn != cmd.isbn {
        let other = deps
            .book_repository
            .find_by_isbn(&cmd.isbn)
            .await
            .map_err(BookApplicationError::BookStoreError)?;

        if other.is_some_and(|other| other.id != existing.id) {
            return Err(BookApplicationError::DuplicateIsbn);
        }
    }

    // 3. ドメイン層の純粋関数を呼び出し
    let (book, title_changed) = domain::replace_book(&existing, cmd);

    // 4. 書籍を保存
    let written = deps
        .book_repository
        .update(&book)
        .await
        .map_err(BookApplicationError::BookStoreError)?;

    match written {
        BookWrite::Written => {}
        BookWrite::DuplicateIsbn => return Err(BookApplicationError::DuplicateIsbn),
        BookWrite::NotFound => return Err(BookApplicationError::BookNotFound(id.to_string())),
    }

    // 5. 評価のタイトルを同期（titleだけを上書きし、並行する評価値の追加を妨げない）
    if title_changed {
        let retitled = deps
            .rating_repository
            .retitle(book.id, &book.title)
            .await
            .map_err(BookApplicationError::RatingStoreError)?;

        if !retitled {
            tracing::warn!(book_id = %book.id, "book has no rating to retitle");
        }
    }

    tracing::info!(book_id = %book.id, title_changed, "book updated");
    Ok(())
}

/// 書籍を削除する
///
/// 書籍を削除した後、同じIDの評価を削除する（存在しなくても成功）。
pub async fn delete_book(deps: &ServiceDependencies, id: &str) -> Result<()> {
    let book = load_book(deps, id).await?;

    deps.book_repository
        .delete(book.id)
        .await
        .map_err(BookApplicationError::BookStoreError)?;

    let rating_deleted = deps
        .rating_repository
        .delete(book.id)
        .await
        .map_err(BookApplicationError::RatingStoreError)?;

    tracing::info!(book_id = %book.id, rating_deleted, "book deleted");
    Ok(())
}

/// IDで書籍を取得する
pub async fn get_book(deps: &ServiceDependencies, id: &str) -> Result<Book> {
    load_book(deps, id).await
}

/// 条件に一致する書籍を取得する
pub async fn list_books(deps: &ServiceDependencies, criteria: &FilterCriteria) -> Result<Vec<Book>> {
    let books = deps
        .book_repository
        .list()
        .await
        .map_err(BookApplicationError::BookStoreError)?;

    Ok(criteria.apply(books))
}

/// ISBNで書籍のIDとタイトルを解決する（貸出サービス向け内部ルックアップ）
///
/// ISBNの形式を満たさない値は該当なしとして扱う。
pub async fn lookup_by_isbn(deps: &ServiceDependencies, isbn: &str) -> Result<Option<BookRef>> {
    let Ok(isbn) = isbn.parse::<Isbn>() else {
        return Ok(None);
    };

    let book = deps
        .book_repository
        .find_by_isbn(&isbn)
        .await
        .map_err(BookApplicationError::BookStoreError)?;

    Ok(book.map(|book| BookRef {
        id: book.id,
        title: book.title,
    }))
}
