use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, Isbn, LoanId, commands::CreateLoan, query::Filterable};

/// 会員1人あたりの最大貸出冊数
pub const MAX_OPEN_LOANS_PER_MEMBER: usize = 2;

/// 貸出の表示用日付フォーマット
pub const LOAN_DATE_FORMAT: &str = "%Y-%m-%d";

/// カタログ側から解決された書籍の参照
///
/// 内部ルックアップ（GET /books/isbn/{isbn}）の応答から組み立てる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRef {
    pub id: BookId,
    pub title: String,
}

/// Loan集約 - 1冊の書籍の1回の貸出
///
/// title / book_id は貸出作成時点のスナップショットであり、
/// 書籍側が更新されても追従しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub member_name: String,
    pub isbn: Isbn,
    pub loan_date: NaiveDate,
    pub title: String,
    pub book_id: BookId,
}

impl Filterable for Loan {
    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "loanID" => Some(self.id.to_string()),
            "memberName" => Some(self.member_name.clone()),
            "ISBN" => Some(self.isbn.to_string()),
            "loanDate" => Some(self.loan_date.format(LOAN_DATE_FORMAT).to_string()),
            "title" => Some(self.title.clone()),
            "bookID" => Some(self.book_id.to_string()),
            _ => None,
        }
    }
}

/// 貸出可否の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanEligibility {
    Eligible,
    /// 同じISBNの貸出が既に存在する
    IsbnAlreadyOnLoan,
    /// 会員の貸出数が上限に達している
    MemberLimitReached,
}

/// 純粋関数：貸出可否を判定する
///
/// ビジネスルール（判定順）：
/// 1. 同じISBNの貸出中レコードがないこと
/// 2. 会員の貸出中の冊数が上限未満であること
///
/// ストアアダプタはこの関数を書き込みと同じ原子的な区間の中で呼ぶ。
pub fn check_eligibility(isbn_on_loan: bool, member_open_loans: usize) -> LoanEligibility {
    if isbn_on_loan {
        return LoanEligibility::IsbnAlreadyOnLoan;
    }
    if member_open_loans >= MAX_OPEN_LOANS_PER_MEMBER {
        return LoanEligibility::MemberLimitReached;
    }
    LoanEligibility::Eligible
}

/// 純粋関数：書籍を貸し出す
///
/// 副作用なし。新しいLoanを返す。
pub fn loan_book(cmd: CreateLoan, book: BookRef) -> Loan {
    Loan {
        id: LoanId::new(),
        member_name: cmd.member_name,
        isbn: cmd.isbn,
        loan_date: cmd.loan_date,
        title: book.title,
        book_id: book.id,
    }
}
