use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// 時刻の入力フォーマット。
const TIME_FORMAT: &str = "%H:%M";
/// `DD.MM.YYYY`形式の日付フォーマット。
const DOTTED_DATE_FORMAT: &str = "%d.%m.%Y";
/// ISO形式の日付フォーマット。
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// テスト時に利用するモック時間を取得する。
#[cfg(test)]
pub mod mock_datetime {
    use std::cell::RefCell;

    use super::DateTime;
    use super::Utc;

    thread_local! {
        static MOCK_TIME: RefCell<Option<DateTime<Utc>>> = RefCell::new(None);
    }

    /// モック時間を取得する。
    pub fn now() -> DateTime<Utc> {
        MOCK_TIME.with(|cell| cell.borrow().as_ref().cloned().unwrap_or_else(Utc::now))
    }

    /// モック時間を設定する。
    pub fn set_mock_time(time: DateTime<Utc>) {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = Some(time));
    }

    // 設定したモック時間をクリアする。
    pub fn clear_mock_time() {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = None);
    }
}

#[cfg(test)]
pub use mock_datetime::now;

/// Localタイムゾーンでの今日の日付を取得する。
pub fn today() -> NaiveDate {
    now().with_timezone(&Local).date_naive()
}

/// 日付の表示形式。
///
/// 内部では常に`NaiveDate`で保持し、表示する時にのみ文字列へ変換する。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `DD.MM.YYYY`
    #[default]
    Dotted,
    /// `YYYY-MM-DD`
    Iso,
}

impl DateFormat {
    /// 日付を表示用の文字列に変換する。
    pub fn format(&self, date: NaiveDate) -> String {
        let pattern = match self {
            DateFormat::Dotted => DOTTED_DATE_FORMAT,
            DateFormat::Iso => ISO_DATE_FORMAT,
        };
        date.format(pattern).to_string()
    }
}

/// `HH:MM`(24時間表記)の時刻をパースする。
///
/// # Arguments
///
/// * `s` - パースする文字列
pub fn parse_time(s: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| ParseError::InvalidTime(s.to_string()))
}

/// 日付をパースする。
///
/// `DD.MM.YYYY`と`YYYY-MM-DD`のどちらの形式も受け付ける。
///
/// # Arguments
///
/// * `s` - パースする文字列
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, DOTTED_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| ParseError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, Utc};
    use rstest::rstest;

    use super::{mock_datetime, parse_date, parse_time, today, DateFormat};
    use crate::error::ParseError;

    /// 何も設定しない場合は、現在時間が取得できることを確認する。
    ///
    ///  - 現在時刻での比較を行なっているため、ミリ秒単位まで比較するとテストが失敗する可能性があり、秒単位で比較している。
    #[test]
    fn test_now() {
        assert_eq!(
            mock_datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    /// モック時間を設定した時に、その時間が取得できることを確認する。
    #[test]
    fn test_now_specific_datetime() {
        let datetime = String::from("2024-01-01T00:00:00+00:00");
        mock_datetime::set_mock_time(
            DateTime::parse_from_rfc3339(datetime.as_str())
                .unwrap()
                .to_utc(),
        );

        assert_eq!(mock_datetime::now().to_rfc3339(), datetime);
        mock_datetime::clear_mock_time();
    }

    /// 今日の日付がモック時間のLocal日付になることを確認する。
    #[test]
    fn test_today_follows_mock_time() {
        let mock = DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00")
            .unwrap()
            .to_utc();
        mock_datetime::set_mock_time(mock);

        assert_eq!(today(), mock.with_timezone(&Local).date_naive());
        mock_datetime::clear_mock_time();
    }

    #[rstest]
    #[case::padded("09:00", 9, 0)]
    #[case::afternoon("15:30", 15, 30)]
    #[case::midnight("00:00", 0, 0)]
    #[case::last_minute("23:59", 23, 59)]
    #[case::surrounding_spaces(" 10:15 ", 10, 15)]
    fn test_parse_time(#[case] input: &str, #[case] hour: u32, #[case] minute: u32) {
        assert_eq!(
            parse_time(input).unwrap(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
        );
    }

    /// 不正な時刻は`InvalidTime`になる。
    #[rstest]
    #[case::garbage("9:5x")]
    #[case::hour_out_of_range("25:00")]
    #[case::minute_out_of_range("10:60")]
    #[case::empty("")]
    #[case::no_separator("0900")]
    fn test_parse_time_invalid(#[case] input: &str) {
        assert_eq!(
            parse_time(input),
            Err(ParseError::InvalidTime(input.to_string()))
        );
    }

    #[rstest]
    #[case::dotted("01.03.2024")]
    #[case::iso("2024-03-01")]
    fn test_parse_date_both_formats(#[case] input: &str) {
        assert_eq!(
            parse_date(input).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[rstest]
    #[case::bad_month("2024-13-01")]
    #[case::bad_day("32.01.2024")]
    #[case::slashes("01/03/2024")]
    #[case::empty("")]
    fn test_parse_date_invalid(#[case] input: &str) {
        assert_eq!(
            parse_date(input),
            Err(ParseError::InvalidDate(input.to_string()))
        );
    }

    #[rstest]
    #[case::dotted(DateFormat::Dotted, "05.11.2023")]
    #[case::iso(DateFormat::Iso, "2023-11-05")]
    fn test_date_format(#[case] format: DateFormat, #[case] expected: &str) {
        let date = NaiveDate::from_ymd_opt(2023, 11, 5).unwrap();
        assert_eq!(format.format(date), expected);
    }
}
