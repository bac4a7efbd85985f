use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use log::info;

use crate::config::Settings;
use crate::console::ConsolePresenter;
use crate::datetime::{parse_date, parse_time, today};
use crate::source::RecordSource;
use crate::time_record::{NewTimeRecord, TimeRecord};

/// 記録を追加した結果を確認するためのサブコマンド。
///
/// 入力ファイルへの書き戻しは行わない。
#[derive(Debug, clap::Args)]
pub struct LogArgs {
    #[clap(
        short = 's',
        long = "start",
        help = "Start time in the format HH:MM",
        parse(try_from_str = parse_time),
    )]
    start: NaiveTime,

    #[clap(
        short = 'e',
        long = "end",
        help = "End time in the format HH:MM",
        parse(try_from_str = parse_time),
    )]
    end: NaiveTime,

    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom date (DD.MM.YYYY or YYYY-MM-DD), defaults to today",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,

    #[clap(short = 'm', long = "description", default_value = "")]
    description: String,

    #[clap(long = "billable", help = "Marks the record as billable")]
    billable: bool,
}

pub struct LogCommand<'a, T: RecordSource> {
    source: &'a T,
    settings: Settings,
}

impl<'a, T: RecordSource> LogCommand<'a, T> {
    /// 新しい`LogCommand`を返す。
    ///
    /// # Arguments
    /// * `source` - ledgerの初期状態を読み込むためのsource
    /// * `settings` - アプリケーションの設定
    pub fn new(source: &'a T, settings: Settings) -> Self {
        Self { source, settings }
    }

    /// `log`サブコマンドの処理を行う。
    ///
    /// ledgerに記録を追加し、追加した記録と更新後の集計値を表示する。
    /// 日付が指定されていない場合は、Localタイムゾーンで今日の日付を利用する。
    ///
    /// # Arguments
    ///
    /// * `args` - `log`サブコマンドの引数
    /// * `presenter` - 表示先
    pub fn run(&self, args: LogArgs, presenter: &mut dyn ConsolePresenter) -> Result<TimeRecord> {
        let (mut ledger, estimated_hours) = self
            .source
            .read_ledger()
            .context("Failed to read time records")?
            .into_ledger(self.settings.id_strategy);

        let entry = NewTimeRecord {
            date: args.date.unwrap_or_else(today),
            start_time: args.start,
            end_time: args.end,
            description: args.description,
            billable: args.billable,
        };
        let record = ledger.add(entry).clone();
        info!("Previewed time record {} on {}", record.id, record.date);

        presenter.show_records(std::slice::from_ref(&record))?;
        presenter.show_aggregates(&ledger.aggregates(estimated_hours), estimated_hours)?;

        Ok(record)
    }
}
