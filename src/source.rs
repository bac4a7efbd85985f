use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;

use crate::datetime::{parse_date, parse_time};
use crate::ledger::{IdStrategy, TimeLedger};
use crate::time_record::TimeRecord;

/// 入力ファイルの記録をデシリアライズするための構造体。
///
/// `duration`は読み込まず、開始・終了時刻から計算し直す。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeRecord {
    id: u64,
    date: String,
    start_time: String,
    end_time: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    billable: bool,
}

/// 入力ファイル全体をデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLedgerFile {
    #[serde(default)]
    estimated_hours: f64,
    #[serde(default)]
    records: Vec<RawTimeRecord>,
}

/// ledgerの初期状態。
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerInput {
    /// タスクの見積もり時間
    pub estimated_hours: f64,
    /// 新しい順に並んだ記録
    pub records: Vec<TimeRecord>,
}

impl LedgerInput {
    /// 読み込んだ記録から`TimeLedger`を作る。
    pub fn into_ledger(self, id_strategy: IdStrategy) -> (TimeLedger, f64) {
        (
            TimeLedger::new(self.records, id_strategy),
            self.estimated_hours,
        )
    }
}

/// ledgerの初期状態を読み込むためのtrait。
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
    /// 見積もり時間と記録を読み込む。
    fn read_ledger(&self) -> Result<LedgerInput>;
}

/// JSONファイルからledgerの初期状態を読み込む。
///
/// # Examples
///
/// ```no_run
/// use timeledger::source::{JsonFileSource, RecordSource};
///
/// let source = JsonFileSource::new("task.json");
/// let input = source.read_ledger().unwrap();
/// ```
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// 新しい`JsonFileSource`を返す。
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonFileSource {
    fn read_ledger(&self) -> Result<LedgerInput> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger file: {}", self.path.display()))?;
        let input = parse_ledger_json(&raw)
            .with_context(|| format!("Failed to load ledger file: {}", self.path.display()))?;
        info!(
            "Loaded {} time records from {}",
            input.records.len(),
            self.path.display()
        );

        Ok(input)
    }
}

/// JSON文字列をパースしてledgerの初期状態を作る。
///
/// 日付・時刻はここで一度だけパースし、不正な値はエラーとする。
/// idは重複を許さず、次のidを採番できない`u64::MAX`も受け付けない。
fn parse_ledger_json(raw: &str) -> Result<LedgerInput> {
    let file: RawLedgerFile = serde_json::from_str(raw).context("Failed to deserialize ledger")?;

    let mut seen = HashSet::new();
    for entry in &file.records {
        if entry.id == u64::MAX {
            bail!("Record id {} leaves no room for new ids", entry.id);
        }
        if !seen.insert(entry.id) {
            bail!("Duplicate record id {}", entry.id);
        }
    }

    let records = file
        .records
        .into_iter()
        .map(|entry| {
            let date = parse_date(&entry.date)
                .with_context(|| format!("Invalid date in record {}", entry.id))?;
            let start_time = parse_time(&entry.start_time)
                .with_context(|| format!("Invalid start time in record {}", entry.id))?;
            let end_time = parse_time(&entry.end_time)
                .with_context(|| format!("Invalid end time in record {}", entry.id))?;

            let mut record = TimeRecord {
                id: entry.id,
                date,
                start_time,
                end_time,
                duration: 0.0,
                description: entry.description,
                billable: entry.billable,
            };
            record.recompute_duration();
            Ok(record)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LedgerInput {
        estimated_hours: file.estimated_hours,
        records,
    })
}
