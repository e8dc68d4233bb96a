use crate::domain::{Book, BookId, Genre, Isbn};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, BookWrite, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, is_unique_violation};

/// PostgreSQLの行データをBookに変換する
///
/// ISBNとジャンルは値オブジェクトの検証を通して復元する。
fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let isbn: String = row.get("isbn");
    let isbn = Isbn::try_from(isbn)?;

    let genre: &str = row.get("genre");
    let genre: Genre = genre.parse().map_err(invalid_data)?;

    Ok(Book {
        id: BookId::from_uuid(row.get("id")),
        title: row.get("title"),
        isbn,
        genre,
        authors: row.get("authors"),
        publisher: row.get("publisher"),
        published_date: row.get("published_date"),
    })
}

/// BookRepositoryのPostgreSQL実装
///
/// ISBNの一意性は `books_isbn_unique` 制約で強制される。
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから新しいBookRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, isbn, genre, authors, publisher, published_date
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, isbn, genre, authors, publisher, published_date
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    /// 全書籍を登録順に取得する
    async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, isbn, genre, authors, publisher, published_date
            FROM books
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    /// 書籍を挿入する
    ///
    /// 一意制約違反は `BookWrite::DuplicateIsbn` として返す。
    async fn insert(&self, book: &Book) -> Result<BookWrite> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (id, title, isbn, genre, authors, publisher, published_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(book.id.value())
        .bind(&book.title)
        .bind(book.isbn.as_str())
        .bind(book.genre.as_str())
        .bind(&book.authors)
        .bind(&book.publisher)
        .bind(&book.published_date)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(book_id = %book.id, "book row inserted");
                Ok(BookWrite::Written)
            }
            Err(e) if is_unique_violation(&e) => Ok(BookWrite::DuplicateIsbn),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, book: &Book) -> Result<BookWrite> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2,
                isbn = $3,
                genre = $4,
                authors = $5,
                publisher = $6,
                published_date = $7
            WHERE id = $1
            "#,
        )
        .bind(book.id.value())
        .bind(&book.title)
        .bind(book.isbn.as_str())
        .bind(book.genre.as_str())
        .bind(&book.authors)
        .bind(&book.publisher)
        .bind(&book.published_date)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(BookWrite::NotFound),
            Ok(_) => Ok(BookWrite::Written),
            Err(e) if is_unique_violation(&e) => Ok(BookWrite::DuplicateIsbn),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
