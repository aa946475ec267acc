//! Simple replay buffer.
use super::{SimpleReplayBufferConfig, Transition, TransitionBatch};
use crate::{error::BitFlipError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A ring buffer of transitions.
///
/// Once `capacity` transitions are stored, every push overwrites the oldest
/// one. Batches are drawn uniformly at random without replacement.
pub struct SimpleReplayBuffer {
    capacity: usize,
    /// Slot written by the next push.
    i: usize,
    data: Vec<Transition>,
    rng: StdRng,
}

impl SimpleReplayBuffer {
    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the transition stored at slot `ix`.
    pub fn get(&self, ix: usize) -> Option<&Transition> {
        self.data.get(ix)
    }

    /// Iterates over the stored transitions from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        // Before the first wrap-around `i == len`, so `older` is empty.
        let (newer, older) = self.data.split_at(self.i);
        older.iter().chain(newer.iter())
    }
}

impl ExperienceBufferBase for SimpleReplayBuffer {
    type Item = Transition;

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.data.len() < self.capacity {
            self.data.push(tr);
        } else {
            self.data[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;
        Ok(())
    }
}

impl ReplayBufferBase for SimpleReplayBuffer {
    type Config = SimpleReplayBufferConfig;
    type Batch = TransitionBatch;

    fn build(config: &Self::Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            capacity: config.capacity,
            i: 0,
            data: Vec::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let available = self.data.len();
        if size > available {
            return Err(BitFlipError::InsufficientData {
                requested: size,
                available,
            }
            .into());
        }

        let mut batch = TransitionBatch::with_capacity(size);
        for ix in index::sample(&mut self.rng, available, size).into_iter() {
            batch.push(ix, &self.data[ix]);
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// A transition whose reward identifies it.
    fn marked(k: usize) -> Transition {
        Transition::new(
            vec![(k % 2) as u8, 0],
            k % 2,
            k as f32,
            vec![(k % 2) as u8, 1],
            k % 3 == 0,
            vec![1, (k % 2) as u8],
        )
    }

    fn buffer(capacity: usize) -> SimpleReplayBuffer {
        let config = SimpleReplayBufferConfig::default().capacity(capacity).seed(0);
        SimpleReplayBuffer::build(&config).unwrap()
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = SimpleReplayBufferConfig::default().capacity(0);
        let err = SimpleReplayBuffer::build(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<BitFlipError>(),
            Some(BitFlipError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_len_grows_until_capacity() {
        let mut buf = buffer(5);
        assert!(buf.is_empty());
        for k in 0..3 {
            buf.push(marked(k)).unwrap();
        }
        assert_eq!(buf.len(), 3);
        let rewards: Vec<f32> = buf.iter().map(|tr| tr.reward).collect();
        assert_eq!(rewards, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let capacity = 10;
        for k in 1..=13 {
            let mut buf = buffer(capacity);
            for j in 0..(capacity + k) {
                buf.push(marked(j)).unwrap();
            }
            assert_eq!(buf.len(), capacity);
            let rewards: Vec<f32> = buf.iter().map(|tr| tr.reward).collect();
            let expected: Vec<f32> = (k..capacity + k).map(|j| j as f32).collect();
            assert_eq!(rewards, expected);
        }
    }

    #[test]
    fn test_batch_fails_with_insufficient_data() {
        let mut buf = buffer(10);
        for k in 0..3 {
            buf.push(marked(k)).unwrap();
        }
        let err = buf.batch(4).err().unwrap();
        assert_eq!(
            err.downcast_ref::<BitFlipError>(),
            Some(&BitFlipError::InsufficientData {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_batch_is_distinct_and_aligned() {
        let mut buf = buffer(20);
        for k in 0..25 {
            buf.push(marked(k)).unwrap();
        }

        for _ in 0..50 {
            let batch = buf.batch(8).unwrap();
            assert_eq!(batch.len(), 8);

            let ixs: HashSet<usize> = batch.ix_sample.iter().copied().collect();
            assert_eq!(ixs.len(), 8);

            for i in 0..batch.len() {
                let k = batch.reward[i] as usize;
                assert!((5..25).contains(&k), "{} was evicted", k);
                let tr = marked(k);
                assert_eq!(buf.get(batch.ix_sample[i]), Some(&tr));
                assert_eq!(batch.state[i], tr.state);
                assert_eq!(batch.act[i], tr.act);
                assert_eq!(batch.next_state[i], tr.next_state);
                assert_eq!(batch.is_done[i], tr.is_done as i8);
                assert_eq!(batch.goal[i], tr.goal);
            }
        }
    }

    #[test]
    fn test_batch_of_whole_buffer_is_a_permutation() {
        let mut buf = buffer(6);
        for k in 0..6 {
            buf.push(marked(k)).unwrap();
        }
        let batch = buf.batch(6).unwrap();
        let mut rewards = batch.reward.clone();
        rewards.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(rewards, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
