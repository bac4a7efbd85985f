use thiserror::Error;

/// 日付・時刻文字列のパースに失敗した時のエラー。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid time of day (expected HH:MM): {0:?}")]
    InvalidTime(String),

    #[error("invalid date (expected DD.MM.YYYY or YYYY-MM-DD): {0:?}")]
    InvalidDate(String),
}
