use crate::domain::{Book, BookId, Isbn};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, BookWrite, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// BookRepositoryのインメモリ実装
///
/// 登録順を保つためVecで保持する。ISBNの一意性はロック内で確認する。
#[derive(Default)]
pub struct BookRepository {
    books: Mutex<Vec<Book>>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let books = lock(&self.books, "books")?;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let books = lock(&self.books, "books")?;
        Ok(books.iter().find(|b| &b.isbn == isbn).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>> {
        Ok(lock(&self.books, "books")?.clone())
    }

    async fn insert(&self, book: &Book) -> Result<BookWrite> {
        let mut books = lock(&self.books, "books")?;
        if books.iter().any(|b| b.isbn == book.isbn) {
            return Ok(BookWrite::DuplicateIsbn);
        }
        books.push(book.clone());
        tracing::debug!(book_id = %book.id, "book inserted");
        Ok(BookWrite::Written)
    }

    async fn update(&self, book: &Book) -> Result<BookWrite> {
        let mut books = lock(&self.books, "books")?;
        if books.iter().any(|b| b.isbn == book.isbn && b.id != book.id) {
            return Ok(BookWrite::DuplicateIsbn);
        }
        match books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => {
                *existing = book.clone();
                Ok(BookWrite::Written)
            }
            None => Ok(BookWrite::NotFound),
        }
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let mut books = lock(&self.books, "books")?;
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok(books.len() != before)
    }
}
