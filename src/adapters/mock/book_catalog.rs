use crate::domain::{BookId, Isbn, loan::BookRef};
use crate::ports::book_catalog::{BookCatalog as BookCatalogTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// BookCatalogのモック実装
///
/// 書籍を登録することで状態を持ったテストをサポート。
/// 書籍サービスの障害も再現できる。
pub struct BookCatalog {
    books: Mutex<HashMap<Isbn, BookRef>>,
    unavailable: AtomicBool,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// テスト用にカタログへ書籍を登録し、そのIDを返す
    pub fn add_book(&self, isbn: &str, title: &str) -> BookId {
        let id = BookId::new();
        let isbn: Isbn = isbn.parse().unwrap();
        self.books.lock().unwrap().insert(
            isbn,
            BookRef {
                id,
                title: title.to_string(),
            },
        );
        id
    }

    /// 以後の呼び出しを失敗させる
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookCatalogTrait for BookCatalog {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<BookRef>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err("books service unavailable".into());
        }
        Ok(self.books.lock().unwrap().get(isbn).cloned())
    }
}
