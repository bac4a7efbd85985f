use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::time_record::{NewTimeRecord, TimeRecord};

/// 新しい記録にidを割り当てる方法。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// 既存の最大id + 1。
    #[default]
    Max,
    /// 末尾(最も古い)記録のid + 1。
    ///
    /// 新しい順に並んだリストの末尾から採番するため、
    /// 途中の記録が削除されているとidが重複しうる。
    Tail,
}

/// ledgerの集計値。
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub actual_hours: f64,
    pub completion_percentage: i64,
}

/// 請求可否ごとの時間数。表示専用で進捗率には影響しない。
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillableBreakdown {
    pub billable_hours: f64,
    pub non_billable_hours: f64,
}

/// 1つのタスク(またはプロジェクト)に紐づく作業時間の記録の集まり。
///
/// 記録は追加順の新しい順に並ぶ。集計値は保持せず、呼び出すたびに全件から計算する。
#[derive(Clone, Debug, Default)]
pub struct TimeLedger {
    records: Vec<TimeRecord>,
    id_strategy: IdStrategy,
}

impl TimeLedger {
    /// 新しい`TimeLedger`を返す。
    ///
    /// # Arguments
    ///
    /// * `records` - 初期の記録。新しい順に並んでいるものとして扱う
    /// * `id_strategy` - 採番方法
    pub fn new(records: Vec<TimeRecord>, id_strategy: IdStrategy) -> Self {
        Self {
            records,
            id_strategy,
        }
    }

    /// 現在の記録を新しい順で返す。
    pub fn records(&self) -> &[TimeRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&TimeRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 記録を追加する。
    ///
    /// durationを計算し、idを割り当てて先頭に挿入する。
    ///
    /// # Arguments
    ///
    /// * `entry` - 追加する記録
    pub fn add(&mut self, entry: NewTimeRecord) -> &TimeRecord {
        let id = self.next_id();
        let record = TimeRecord::from_new(id, entry);
        info!("Add time record {} ({:.2}h)", record.id, record.duration);
        self.records.insert(0, record);
        &self.records[0]
    }

    /// 同じidの記録を置き換える。位置は変えない。
    ///
    /// durationは開始・終了時刻から必ず再計算する。
    /// 該当する記録がない場合は何もせず`None`を返す。
    ///
    /// # Arguments
    ///
    /// * `record` - 更新後の記録
    pub fn update(&mut self, mut record: TimeRecord) -> Option<&TimeRecord> {
        let Some(position) = self.position(record.id) else {
            debug!("Time record {} not found, skip update", record.id);
            return None;
        };
        record.recompute_duration();
        info!("Update time record {} ({:.2}h)", record.id, record.duration);
        self.records[position] = record;
        Some(&self.records[position])
    }

    /// 指定したidの記録を削除する。該当する記録がない場合は何もしない。
    pub fn delete(&mut self, id: u64) -> Option<TimeRecord> {
        let Some(position) = self.position(id) else {
            debug!("Time record {} not found, skip delete", id);
            return None;
        };
        info!("Delete time record {}", id);
        Some(self.records.remove(position))
    }

    /// 実績時間と進捗率を計算する。
    ///
    /// 進捗率は`estimated_hours`が0以下の場合は0とし、100%を超えても丸めない。
    ///
    /// # Arguments
    ///
    /// * `estimated_hours` - タスクの見積もり時間
    pub fn aggregates(&self, estimated_hours: f64) -> Aggregates {
        let actual_hours: f64 = self.records.iter().map(|record| record.duration).sum();
        // 極端に小さい見積もりでは`as`変換によりi64::MAXで頭打ちになる
        let completion_percentage = if estimated_hours > 0.0 {
            (actual_hours / estimated_hours * 100.0).round() as i64
        } else {
            0
        };

        Aggregates {
            actual_hours,
            completion_percentage,
        }
    }

    pub fn billable_breakdown(&self) -> BillableBreakdown {
        self.records
            .iter()
            .fold(BillableBreakdown::default(), |mut acc, record| {
                if record.billable {
                    acc.billable_hours += record.duration;
                } else {
                    acc.non_billable_hours += record.duration;
                }
                acc
            })
    }

    /// 日付ごとの合計時間を日付の昇順で返す。
    pub fn daily_totals(&self) -> Vec<(NaiveDate, f64)> {
        let totals: BTreeMap<NaiveDate, f64> =
            self.records.iter().fold(BTreeMap::new(), |mut acc, record| {
                *acc.entry(record.date).or_insert(0.0) += record.duration;
                acc
            });
        totals.into_iter().collect()
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn next_id(&self) -> u64 {
        let base = match self.id_strategy {
            IdStrategy::Max => self.records.iter().map(|record| record.id).max(),
            IdStrategy::Tail => self.records.last().map(|record| record.id),
        };
        // u64::MAXは入力時に弾くが、直接渡された場合に備えて桁あふれさせない
        base.map_or(1, |id| id.saturating_add(1))
    }
}
