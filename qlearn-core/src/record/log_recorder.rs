use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::info;

/// Writes records through the `log` facade at `info` level.
///
/// Scalars, strings and timestamps are printed in key order.
#[derive(Default)]
pub struct LogRecorder {
    storage: RecordStorage,
}

impl LogRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self {
            storage: RecordStorage::new(),
        }
    }

    fn format(record: &Record) -> String {
        let mut items = record
            .iter()
            .filter_map(|(k, v)| match v {
                RecordValue::Scalar(v) => Some(format!("{}: {:.4}", k, v)),
                RecordValue::String(s) => Some(format!("{}: {}", k, s)),
                RecordValue::DateTime(t) => {
                    Some(format!("{}: {}", k, t.format("%Y-%m-%d %H:%M:%S")))
                }
            })
            .collect::<Vec<_>>();
        items.sort();
        items.join(", ")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", Self::format(&record));
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let record = self.storage.aggregate();
        info!("[{}] {}", step, Self::format(&record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_format_sorted_by_key() {
        let t = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let record = Record::from_slice(&[
            ("loss", RecordValue::Scalar(0.5)),
            ("datetime", RecordValue::DateTime(t)),
            ("env", RecordValue::String("cartpole".into())),
        ]);
        assert_eq!(
            LogRecorder::format(&record),
            "datetime: 2024-05-01 12:30:00, env: cartpole, loss: 0.5000"
        );
    }
}
