//! Types and traits for recording training metrics.
//!
//! * [`Record`] - A container of key-value pairs of [`RecordValue`]s
//! * [`Recorder`] - Writes a record immediately
//! * [`AggregateRecorder`] - Stores records and writes aggregated values on flush
//! * [`RecordStorage`] - Aggregation of stored records (min, max, mean, median)
//! * [`BufferedRecorder`] - Keeps records in memory, mainly for tests
//! * [`LogRecorder`] - Writes aggregated records through the `log` facade
//! * [`NullRecorder`] - Discards all records
//!
//! # Basic Usage
//!
//! ```rust
//! use qlearn_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let episode = 1;
//! let episode_return = 21f32;
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(episode as f32));
//! record.insert("episode_return", RecordValue::Scalar(episode_return));
//! assert_eq!(record.get_scalar("episode_return").unwrap(), 21.0);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
