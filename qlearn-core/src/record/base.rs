//! Base implementation of records for logging.
use crate::error::QlearnError;
use chrono::prelude::{DateTime, Local};
use std::{
    collections::{
        hash_map::{Iter, Keys},
        HashMap,
    },
    convert::Into,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like loss or return.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use qlearn_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss", 0.5);
/// record.insert("epsilon", RecordValue::Scalar(0.9));
///
/// let loss = record.get_scalar("loss").unwrap();
/// assert_eq!(loss, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, QlearnError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(QlearnError::RecordValueTypeError("Scalar".to_string())),
            None => Err(QlearnError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a timestamp from the record.
    pub fn get_datetime(&self, k: &str) -> Result<DateTime<Local>, QlearnError> {
        match self.0.get(k) {
            Some(RecordValue::DateTime(v)) => Ok(*v),
            Some(_) => Err(QlearnError::RecordValueTypeError("DateTime".to_string())),
            None => Err(QlearnError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, QlearnError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(QlearnError::RecordValueTypeError("String".to_string())),
            None => Err(QlearnError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
