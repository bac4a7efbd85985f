use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};

/// 1回分の作業時間の記録。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    pub id: u64,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_time")]
    pub end_time: NaiveTime,
    /// 時間単位の作業時間。`start_time`と`end_time`から算出する。
    pub duration: f64,
    pub description: String,
    pub billable: bool,
}

/// 新規に追加する記録。idとdurationはledger側で決める。
#[derive(Clone, Debug, PartialEq)]
pub struct NewTimeRecord {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub description: String,
    pub billable: bool,
}

impl TimeRecord {
    /// `NewTimeRecord`にidを割り当てて`TimeRecord`を作る。
    pub fn from_new(id: u64, entry: NewTimeRecord) -> Self {
        Self {
            id,
            date: entry.date,
            start_time: entry.start_time,
            end_time: entry.end_time,
            duration: duration_hours(entry.start_time, entry.end_time),
            description: entry.description,
            billable: entry.billable,
        }
    }

    /// 開始・終了時刻から`duration`を再計算する。
    pub fn recompute_duration(&mut self) {
        self.duration = duration_hours(self.start_time, self.end_time);
    }
}

/// 開始時刻から終了時刻までの時間数を返す。
///
/// 分単位で差を取り、小数第2位で丸める。
/// 終了が開始より前の場合は0とし、日付を跨いだとはみなさない。
///
/// # Arguments
///
/// * `start` - 開始時刻
/// * `end` - 終了時刻
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let minutes = (end - start).num_minutes().max(0);
    round2(minutes as f64 / 60.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 時刻を入力と同じ`HH:MM`形式で出力する。
fn serialize_time<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rstest::rstest;

    use super::{duration_hours, NewTimeRecord, TimeRecord};

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[rstest]
    #[case::whole_hours(time(9, 0), time(15, 0), 6.0)]
    #[case::half_hour(time(10, 0), time(12, 30), 2.5)]
    #[case::one_third(time(9, 0), time(9, 20), 0.33)]
    #[case::two_thirds(time(9, 0), time(9, 40), 0.67)]
    #[case::same_time(time(9, 0), time(9, 0), 0.0)]
    #[case::reversed(time(15, 0), time(9, 0), 0.0)]
    #[case::no_wraparound(time(23, 0), time(1, 0), 0.0)]
    fn test_duration_hours(#[case] start: NaiveTime, #[case] end: NaiveTime, #[case] expected: f64) {
        assert_eq!(duration_hours(start, end), expected);
    }

    #[test]
    fn test_from_new_computes_duration() {
        let entry = NewTimeRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start_time: time(9, 0),
            end_time: time(15, 0),
            description: "Vertragsentwurf".to_string(),
            billable: true,
        };

        let record = TimeRecord::from_new(7, entry.clone());

        assert_eq!(record.id, 7);
        assert_eq!(record.duration, 6.0);
        assert_eq!(record.date, entry.date);
        assert_eq!(record.description, entry.description);
        assert!(record.billable);
    }

    /// JSONではcamelCaseのキーと文字列の日付・時刻で出力される。
    #[test]
    fn test_serialize_camel_case() {
        let record = TimeRecord {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start_time: time(9, 0),
            end_time: time(10, 30),
            duration: 1.5,
            description: "review".to_string(),
            billable: false,
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "10:30");
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["duration"], 1.5);
    }
}
