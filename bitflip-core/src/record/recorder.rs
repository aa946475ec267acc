use super::Record;

/// A recorder that stores records and writes their aggregation on flush.
pub trait AggregateRecorder {
    /// Store the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    ///
    /// `step` is the x-axis of the written values, e.g. the number of episodes.
    fn flush(&mut self, step: i64);
}
