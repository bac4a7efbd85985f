use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::config::Settings;
use crate::console::ConsolePresenter;
use crate::datetime::parse_date;
use crate::ledger::Aggregates;
use crate::source::RecordSource;
use crate::time_record::TimeRecord;

/// 記録の一覧と集計値を出力するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct ReportArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Only list records of this date (DD.MM.YYYY or YYYY-MM-DD)",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,
}

pub struct ReportCommand<'a, T: RecordSource> {
    source: &'a T,
    settings: Settings,
}

impl<'a, T: RecordSource> ReportCommand<'a, T> {
    /// 新しい`ReportCommand`を返す。
    ///
    /// # Arguments
    /// * `source` - ledgerの初期状態を読み込むためのsource
    /// * `settings` - アプリケーションの設定
    pub fn new(source: &'a T, settings: Settings) -> Self {
        Self { source, settings }
    }

    /// `report`サブコマンドの処理を行う。
    ///
    /// 記録を新しい順に表示し、続けてタスク全体の集計値を表示する。
    /// 日付が指定された場合は一覧をその日付の記録に絞るが、集計値は常にタスク全体で計算する。
    ///
    /// # Arguments
    ///
    /// * `report` - `report`サブコマンドの引数
    /// * `presenter` - 表示先
    pub fn run(
        &self,
        report: ReportArgs,
        presenter: &mut dyn ConsolePresenter,
    ) -> Result<Aggregates> {
        let (ledger, estimated_hours) = self
            .source
            .read_ledger()
            .context("Failed to read time records")?
            .into_ledger(self.settings.id_strategy);

        let records: Vec<TimeRecord> = match report.date {
            Some(date) => ledger
                .records()
                .iter()
                .filter(|record| record.date == date)
                .cloned()
                .collect(),
            None => ledger.records().to_vec(),
        };
        info!("Report {} of {} time records", records.len(), ledger.len());

        let aggregates = ledger.aggregates(estimated_hours);
        presenter.show_records(&records)?;
        presenter.show_aggregates(&aggregates, estimated_hours)?;

        Ok(aggregates)
    }
}
