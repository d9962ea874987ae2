//! Record storage and aggregation.
use super::{Record, RecordValue};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// A storage of records with aggregation.
///
/// Scalars stored under the same key are aggregated into `{key}_min`,
/// `{key}_max`, `{key}_mean` and `{key}_median`, unless there is only one of
/// them, in which case it is kept as `{key}`. For other value types, the most
/// recent value is kept.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::INFINITY, f32::min)
}

fn max(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

fn mean(vs: &[f32]) -> f32 {
    vs.iter().sum::<f32>() / vs.len() as f32
}

fn median(mut vs: Vec<f32>) -> f32 {
    vs.sort_by(|x, y| x.total_cmp(y));
    vs[vs.len() / 2]
}

impl RecordStorage {
    /// Creates a new empty record storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record in the storage.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            keys.extend(record.keys().cloned());
        }
        keys
    }

    fn latest(&self, key: &str) -> Option<&RecordValue> {
        self.data.iter().rev().find_map(|record| record.get(key))
    }

    fn scalars(&self, key: &str) -> Vec<f32> {
        self.data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.keys() {
            let vs = self.scalars(&key);
            match vs.len() {
                0 => {
                    if let Some(value) = self.latest(&key) {
                        record.insert(key.clone(), value.clone());
                    }
                }
                1 => record.insert(key, RecordValue::Scalar(vs[0])),
                _ => {
                    record.insert(format!("{}_min", key), RecordValue::Scalar(min(&vs)));
                    record.insert(format!("{}_max", key), RecordValue::Scalar(max(&vs)));
                    record.insert(format!("{}_mean", key), RecordValue::Scalar(mean(&vs)));
                    record.insert(format!("{}_median", key), RecordValue::Scalar(median(vs)));
                }
            }
        }

        self.data.clear();

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_scalars() {
        let mut storage = RecordStorage::new();
        for loss in [3.0, 1.0, 2.0, 4.0] {
            storage.store(Record::from_scalar("loss", loss));
        }
        storage.store(Record::from_scalar("episode_return", 21.0));

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("loss_min").unwrap(), 1.0);
        assert_eq!(record.get_scalar("loss_max").unwrap(), 4.0);
        assert_eq!(record.get_scalar("loss_mean").unwrap(), 2.5);
        assert_eq!(record.get_scalar("loss_median").unwrap(), 3.0);
        assert_eq!(record.get_scalar("episode_return").unwrap(), 21.0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_aggregate_keeps_latest_non_scalar() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_slice(&[("env", RecordValue::String("a".into()))]));
        storage.store(Record::from_slice(&[("env", RecordValue::String("b".into()))]));

        let record = storage.aggregate();
        assert_eq!(record.get_string("env").unwrap(), "b");
    }
}
