use crate::domain::{BookId, Rating, RatingValue};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 評価ストアポート
///
/// 評価のIDは対応する書籍のIDと同じ値。
/// レコード全体を書き戻す操作は持たない。values は追記のみ、title は単独で上書きする。
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Rating>>;

    /// 全評価を登録順に取得する
    async fn list(&self) -> Result<Vec<Rating>>;

    async fn insert(&self, rating: &Rating) -> Result<()>;

    /// title だけを上書きする。評価が存在しなければ `false`。
    async fn retitle(&self, id: BookId, title: &str) -> Result<bool>;

    /// 評価値を末尾に追加し、平均を再計算する
    ///
    /// # 一貫性保証
    /// 読み取り・追加・書き込みは1つの原子的な区間で行われ、並行する追加は失われない。
    ///
    /// # 戻り値
    /// 更新後の評価。存在しなければ `None`。
    async fn append_value(&self, id: BookId, value: RatingValue) -> Result<Option<Rating>>;

    /// 評価を削除する。存在しなくてもエラーにはならない。
    async fn delete(&self, id: BookId) -> Result<bool>;
}
