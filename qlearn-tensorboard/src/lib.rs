//! Writes records of qlearn as TensorBoard event files.
use log::{debug, warn};
use qlearn_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
///
/// Only scalars are written. Timestamps and strings are skipped.
///
/// Event files are written by a background thread of [`SummaryWriter`] and
/// are complete once the recorder is dropped.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
    storage: RecordStorage,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "episode".to_string(),
            storage: RecordStorage::new(),
        }
    }

    /// Sets the key of the record used as the x-axis in [`Recorder::write`].
    pub fn step_key(mut self, key: impl Into<String>) -> Self {
        self.step_key = key.into();
        self
    }

    fn write_with_step(&mut self, record: &Record, step: usize) {
        for (k, v) in record.iter() {
            if *k == self.step_key {
                continue;
            }
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                RecordValue::DateTime(_) => {} // discard value
                RecordValue::String(_) => debug!("Skip unsupported value of {}", k),
            };
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// The step is taken from the value of the step key, `"episode"` by default.
    /// Records without it are skipped.
    fn write(&mut self, record: Record) {
        let step = match record.get_scalar(&self.step_key) {
            Ok(v) => v as usize,
            Err(e) => {
                warn!("Skip a record without step: {}", e);
                return;
            }
        };
        self.write_with_step(&record, step);
    }
}

impl AggregateRecorder for TensorboardRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    /// Writes aggregated values of the stored records at `step`.
    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let record = self.storage.aggregate();
        self.write_with_step(&record, step.max(0) as usize);
        self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempdir::TempDir;

    /// Total size of the files in `dir`.
    fn logdir_size(dir: &Path) -> Result<u64> {
        let mut size = 0;
        for entry in std::fs::read_dir(dir)? {
            size += entry?.metadata()?.len();
        }
        Ok(size)
    }

    #[test]
    fn test_flush_writes_event_file() -> Result<()> {
        let dir = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new(dir.path());
        recorder.store(Record::from_scalar("loss", 1.0));
        recorder.store(Record::from_scalar("loss", 2.0));
        recorder.flush(1);
        drop(recorder);

        assert!(std::fs::read_dir(dir.path())?.count() > 0);
        assert!(logdir_size(dir.path())? > 0);
        Ok(())
    }

    #[test]
    fn test_write_without_step_is_skipped() -> Result<()> {
        let dir_skipped = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new(dir_skipped.path()).step_key("opt_steps");
        recorder.write(Record::from_scalar("loss", 1.0));
        drop(recorder);

        let dir_written = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new(dir_written.path()).step_key("opt_steps");
        recorder.write(Record::from_slice(&[
            ("opt_steps", RecordValue::Scalar(10.0)),
            ("loss", RecordValue::Scalar(0.5)),
        ]));
        drop(recorder);

        // only the file header is written for the record without step
        assert!(logdir_size(dir_written.path())? > logdir_size(dir_skipped.path())?);
        Ok(())
    }
}
