use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::config::Settings;
use crate::console::ConsolePresenter;
use crate::source::RecordSource;

pub struct DailyCommand<'a, T: RecordSource> {
    source: &'a T,
    settings: Settings,
}

impl<'a, T: RecordSource> DailyCommand<'a, T> {
    /// 新しい`DailyCommand`を返す。
    ///
    /// # Arguments
    /// * `source` - ledgerの初期状態を読み込むためのsource
    /// * `settings` - アプリケーションの設定
    pub fn new(source: &'a T, settings: Settings) -> Self {
        Self { source, settings }
    }

    /// `daily`サブコマンドの処理を行う。
    ///
    /// 日付ごとの合計時間を日付の昇順で表示し、請求可否ごとの時間数を続けて表示する。
    pub fn run(&self, presenter: &mut dyn ConsolePresenter) -> Result<Vec<(NaiveDate, f64)>> {
        let (ledger, _) = self
            .source
            .read_ledger()
            .context("Failed to read time records")?
            .into_ledger(self.settings.id_strategy);

        let totals = ledger.daily_totals();
        info!("Summarized {} days", totals.len());
        presenter.show_daily_totals(&totals, &ledger.billable_breakdown())?;

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::DailyCommand;
    use crate::config::Settings;
    use crate::console::ConsoleMarkdownList;
    use crate::datetime::DateFormat;
    use crate::source::{LedgerInput, MockRecordSource};
    use crate::time_record::TimeRecord;

    #[test]
    fn test_daily_command() {
        let mut source = MockRecordSource::new();
        source.expect_read_ledger().times(1).returning(|| {
            let record = |id: u64, day: u32, hours: u32, billable: bool| TimeRecord {
                id,
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(8 + hours, 0, 0).unwrap(),
                duration: hours as f64,
                description: String::new(),
                billable,
            };
            Ok(LedgerInput {
                estimated_hours: 0.0,
                records: vec![
                    record(3, 2, 1, false),
                    record(2, 1, 2, true),
                    record(1, 2, 3, true),
                ],
            })
        });
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer, DateFormat::Iso);

        let command = DailyCommand::new(&source, Settings::default());
        let totals = command.run(&mut presenter).unwrap();

        assert_eq!(
            totals,
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 2.0),
                (NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), 4.0),
            ]
        );
        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "- 2024-03-01: 2.00\n- 2024-03-02: 4.00\nbillable: 5.00 / non-billable: 1.00\n"
        );
    }

    #[test]
    fn test_daily_command_empty() {
        let mut source = MockRecordSource::new();
        source.expect_read_ledger().times(1).returning(|| {
            Ok(LedgerInput {
                estimated_hours: 0.0,
                records: vec![],
            })
        });
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer, DateFormat::Dotted);

        let command = DailyCommand::new(&source, Settings::default());
        let totals = command.run(&mut presenter).unwrap();

        assert!(totals.is_empty());
        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "billable: 0.00 / non-billable: 0.00\n"
        );
    }
}
