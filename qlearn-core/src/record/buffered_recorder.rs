use super::{AggregateRecorder, Record, Recorder};

/// Buffered recorder.
///
/// Keeps every written or stored record in memory, in order. Flushing does
/// nothing. Useful for inspecting what the trainer recorded.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self {
            buf: Vec::default(),
        }
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Returns the records containing the given key.
    pub fn with_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.buf.iter().filter(move |r| r.get(key).is_some())
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn flush(&mut self, _step: i64) {}
}
