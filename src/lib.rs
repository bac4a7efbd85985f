//! 1つのタスク(またはプロジェクト)の作業時間の記録を管理し、実績時間と進捗率を計算する。
//!
//! # Examples
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//! use timeledger::ledger::{IdStrategy, TimeLedger};
//! use timeledger::time_record::NewTimeRecord;
//!
//! let mut ledger = TimeLedger::new(vec![], IdStrategy::Max);
//! ledger.add(NewTimeRecord {
//!     date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//!     end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
//!     description: "Vertrag".to_string(),
//!     billable: true,
//! });
//!
//! assert_eq!(ledger.aggregates(8.0).completion_percentage, 75);
//! ```

pub mod config;
pub mod console;
pub mod daily_command;
pub mod datetime;
pub mod error;
pub mod ledger;
pub mod log_command;
pub mod logging;
pub mod report_command;
pub mod settings_command;
pub mod source;
pub mod time_record;

pub use error::ParseError;
pub use ledger::{Aggregates, IdStrategy, TimeLedger};
pub use time_record::{NewTimeRecord, TimeRecord};
