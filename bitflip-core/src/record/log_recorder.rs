use super::{AggregateRecorder, Record, RecordStorage, RecordValue};
use log::info;

/// A recorder that writes records through the [`log`] facade.
///
/// Stored records are aggregated with [`RecordStorage`] and written on
/// [`AggregateRecorder::flush`], one line per flush with keys in sorted order.
#[derive(Default)]
pub struct LogRecorder {
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

fn format_record(record: &Record) -> String {
    let mut entries: Vec<_> = record.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .map(|(k, v)| match v {
            RecordValue::Scalar(v) => format!("{}: {:.4}", k, v),
            RecordValue::DateTime(v) => format!("{}: {}", k, v),
        })
        .collect::<Vec<_>>()
        .join(", ")
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
        info!("[{}] {}", step, format_record(&record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_format_record_is_sorted() {
        let record = Record::from_slice(&[
            ("loss", RecordValue::Scalar(0.5)),
            ("episode", RecordValue::Scalar(2.0)),
        ]);
        assert_eq!(format_record(&record), "episode: 2.0000, loss: 0.5000");
    }

    #[test]
    fn test_format_record_prints_datetime() {
        let now = Local::now();
        let record = Record::from_slice(&[
            ("datetime", RecordValue::DateTime(now)),
            ("episode", RecordValue::Scalar(100.0)),
        ]);
        assert_eq!(
            format_record(&record),
            format!("datetime: {}, episode: 100.0000", now)
        );
    }
}
