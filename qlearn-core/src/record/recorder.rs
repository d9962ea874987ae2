use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}

/// Stores records and writes values aggregated over them on flush.
///
/// The [`Trainer`](crate::Trainer) stores a record per optimization step and
/// per episode, and flushes at a configured interval of episodes.
pub trait AggregateRecorder {
    /// Store the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    ///
    /// `step` is the x-axis of the written values, e.g., the episode count.
    fn flush(&mut self, step: i64);
}
