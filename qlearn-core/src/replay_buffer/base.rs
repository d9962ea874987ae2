//! Replay memory with FIFO eviction and uniform sampling.
use super::ReplayMemoryConfig;
use crate::{error::QlearnError, ExperienceBufferBase, ReplayBufferBase};
use log::trace;
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::collections::{vec_deque, VecDeque};

/// A bounded store of items, typically [`Transition`](super::Transition)s.
///
/// When full, pushing evicts the oldest item first. Sampling draws items
/// uniformly at random without replacement, using the random number
/// generator given at construction.
pub struct ReplayMemory<T> {
    capacity: usize,
    memory: VecDeque<T>,
    rng: StdRng,
}

impl<T> ReplayMemory<T> {
    /// Constructs a replay memory with the given capacity and random number generator.
    pub fn new(capacity: usize, rng: StdRng) -> Result<Self, QlearnError> {
        if capacity == 0 {
            return Err(QlearnError::InvalidConfig(
                "capacity of replay memory must be > 0".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            memory: VecDeque::with_capacity(capacity),
            rng,
        })
    }

    /// The maximum number of items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the items from the oldest to the newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.memory.iter()
    }
}

impl<T: Clone> ReplayMemory<T> {
    /// Returns `batch_size` distinct items drawn uniformly at random.
    ///
    /// The order of the returned items is unspecified.
    pub fn sample(&mut self, batch_size: usize) -> Result<Vec<T>, QlearnError> {
        let available = self.memory.len();
        if batch_size > available {
            return Err(QlearnError::InsufficientData {
                requested: batch_size,
                available,
            });
        }

        trace!("Sample {} items out of {}", batch_size, available);
        let ixs = index::sample(&mut self.rng, available, batch_size);
        Ok(ixs.iter().map(|ix| self.memory[ix].clone()).collect())
    }
}

impl<T> ExperienceBufferBase for ReplayMemory<T> {
    type Item = T;

    fn push(&mut self, tr: T) {
        if self.memory.len() == self.capacity {
            self.memory.pop_front();
        }
        self.memory.push_back(tr);
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}

impl<T: Clone> ReplayBufferBase for ReplayMemory<T> {
    type Config = ReplayMemoryConfig;
    type Batch = Vec<T>;

    fn build(config: &Self::Config) -> Result<Self, QlearnError> {
        Self::new(config.capacity, StdRng::seed_from_u64(config.seed))
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch, QlearnError> {
        self.sample(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay_buffer::Transition;
    use std::collections::HashSet;

    type Tr = Transition<Vec<f32>, usize>;

    /// A transition identified by its reward.
    fn tr(id: usize) -> Tr {
        let state = vec![id as f32; 4];
        let next_state = Some(vec![id as f32 + 1.0; 4]);
        Transition::new(state, id % 2, next_state, id as f32)
    }

    fn ids(trs: &[Tr]) -> Vec<usize> {
        trs.iter().map(|t| t.reward() as usize).collect()
    }

    fn memory(capacity: usize) -> ReplayMemory<Tr> {
        ReplayMemory::new(capacity, StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let res = ReplayMemory::<Tr>::new(0, StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(QlearnError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_memory() {
        let mut mem = memory(10);
        assert_eq!(mem.len(), 0);
        assert!(mem.is_empty());
        assert_eq!(
            mem.sample(1),
            Err(QlearnError::InsufficientData {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn test_fifo_eviction_keeps_most_recent() {
        let capacity = 7;
        let mut mem = memory(capacity);

        for n in 1..=30 {
            mem.push(tr(n));
            assert_eq!(mem.len(), n.min(capacity));

            // Exactly the most recent items, in push order
            let expected: Vec<usize> = (n.saturating_sub(capacity) + 1..=n).collect();
            let contents: Vec<usize> = mem.iter().map(|t| t.reward() as usize).collect();
            assert_eq!(contents, expected);
        }
    }

    #[test]
    fn test_capacity_three_scenario() {
        let mut mem = memory(3);
        for n in 1..=5 {
            mem.push(tr(n));
        }

        let contents: HashSet<usize> = mem.iter().map(|t| t.reward() as usize).collect();
        assert_eq!(contents, HashSet::from([3, 4, 5]));

        let batch = mem.sample(3).unwrap();
        let mut sampled = ids(&batch);
        sampled.sort();
        assert_eq!(sampled, vec![3, 4, 5]);

        assert_eq!(
            mem.sample(4),
            Err(QlearnError::InsufficientData {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_sample_returns_distinct_items() {
        let mut mem = memory(50);
        for n in 0..40 {
            mem.push(tr(n));
        }

        for k in 0..=40 {
            let batch = mem.sample(k).unwrap();
            assert_eq!(batch.len(), k);
            let unique: HashSet<usize> = ids(&batch).into_iter().collect();
            assert_eq!(unique.len(), k);
            assert!(unique.iter().all(|&id| id < 40));
        }
        assert!(mem.sample(41).is_err());
    }

    #[test]
    fn test_first_item_is_evicted() {
        let capacity = 16;
        let mut mem = memory(capacity);
        for n in 0..=capacity {
            mem.push(tr(n));
        }

        for _ in 0..100 {
            let batch = mem.sample(capacity).unwrap();
            assert!(!ids(&batch).contains(&0));
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let config = ReplayMemoryConfig::default().capacity(100).seed(3);
        let mut mem1 = ReplayMemory::<Tr>::build(&config).unwrap();
        let mut mem2 = ReplayMemory::<Tr>::build(&config).unwrap();
        for n in 0..100 {
            mem1.push(tr(n));
            mem2.push(tr(n));
        }

        for _ in 0..10 {
            assert_eq!(mem1.batch(32).unwrap(), mem2.batch(32).unwrap());
        }
    }
}
