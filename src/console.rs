use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::json;

use crate::datetime::DateFormat;
use crate::ledger::{Aggregates, BillableBreakdown};
use crate::time_record::TimeRecord;

/// Consoleにledgerの内容を表示するためのtrait。
pub trait ConsolePresenter {
    /// 記録をledgerの並び順(新しい順)で表示する。
    ///
    /// # Arguments
    ///
    /// * `records` - 表示する記録
    fn show_records(&mut self, records: &[TimeRecord]) -> Result<()>;

    /// 実績時間と進捗率を表示する。
    fn show_aggregates(&mut self, aggregates: &Aggregates, estimated_hours: f64) -> Result<()>;

    /// 日付ごとの合計時間と請求可否ごとの時間数を表示する。
    fn show_daily_totals(
        &mut self,
        totals: &[(NaiveDate, f64)],
        breakdown: &BillableBreakdown,
    ) -> Result<()>;
}

/// ledgerの内容をMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
    date_format: DateFormat,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W, date_format: DateFormat) -> Self {
        Self {
            writer,
            date_format,
        }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // 記録をlist形式で表示する。
    fn show_records(&mut self, records: &[TimeRecord]) -> Result<()> {
        for record in records {
            let billable = if record.billable { ", billable" } else { "" };
            writeln!(
                self.writer,
                "- #{} {} {} ~ {} ({:.2}h{}): {}",
                record.id,
                self.date_format.format(record.date),
                record.start_time.format("%H:%M"),
                record.end_time.format("%H:%M"),
                record.duration,
                billable,
                record.description
            )
            .with_context(|| format!("Failed to write time record: {:?}", record))?;
        }

        Ok(())
    }

    fn show_aggregates(&mut self, aggregates: &Aggregates, estimated_hours: f64) -> Result<()> {
        writeln!(
            self.writer,
            "actual: {:.2}h / estimated: {:.2}h ({}%)",
            aggregates.actual_hours, estimated_hours, aggregates.completion_percentage
        )
        .context("Failed to write aggregates")?;

        Ok(())
    }

    fn show_daily_totals(
        &mut self,
        totals: &[(NaiveDate, f64)],
        breakdown: &BillableBreakdown,
    ) -> Result<()> {
        for (date, hours) in totals {
            writeln!(
                self.writer,
                "- {}: {:.2}",
                self.date_format.format(*date),
                hours
            )
            .with_context(|| format!("Failed to write daily total for {}", date))?;
        }
        writeln!(
            self.writer,
            "billable: {:.2} / non-billable: {:.2}",
            breakdown.billable_hours, breakdown.non_billable_hours
        )
        .context("Failed to write billable breakdown")?;

        Ok(())
    }
}

/// ledgerの内容をJSONで表示する。
///
/// 日付は表示形式の設定によらずISO形式で出力する。
pub struct ConsoleJson<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleJson<'a, W> {
    /// 新しい`ConsoleJson`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    fn write_value(&mut self, value: &serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut *self.writer, value).context("Failed to write JSON")?;
        writeln!(self.writer).context("Failed to write newline")?;
        Ok(())
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleJson<'a, W> {
    fn show_records(&mut self, records: &[TimeRecord]) -> Result<()> {
        let value = serde_json::to_value(records).context("Failed to serialize records")?;
        self.write_value(&value)
    }

    fn show_aggregates(&mut self, aggregates: &Aggregates, estimated_hours: f64) -> Result<()> {
        let mut value = serde_json::to_value(aggregates).context("Failed to serialize aggregates")?;
        value["estimatedHours"] = json!(estimated_hours);
        self.write_value(&value)
    }

    fn show_daily_totals(
        &mut self,
        totals: &[(NaiveDate, f64)],
        breakdown: &BillableBreakdown,
    ) -> Result<()> {
        let days: Vec<_> = totals
            .iter()
            .map(|(date, hours)| json!({ "date": date, "hours": hours }))
            .collect();
        let mut value = serde_json::to_value(breakdown).context("Failed to serialize breakdown")?;
        value["days"] = json!(days);
        self.write_value(&value)
    }
}
