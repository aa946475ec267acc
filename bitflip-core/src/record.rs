//! Types and traits for recording training metrics.
//!
//! The [`Trainer`](crate::Trainer) and agents report what happened in a training
//! run as [`Record`]s, key-value maps of [`RecordValue`]s. Records are handed to
//! a recorder:
//!
//! * [`BufferedRecorder`] keeps every record in memory, useful in tests.
//! * [`NullRecorder`] discards records.
//! * [`LogRecorder`] aggregates stored records with [`RecordStorage`] and writes
//!   the result through the [`log`] facade on every flush.
//!
//! # Basic Usage
//!
//! ```rust
//! use bitflip_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(1.0));
//! record.insert("episode_reward", RecordValue::Scalar(-13.0));
//! assert_eq!(record.get_scalar("episode_reward").unwrap(), -13.0);
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
pub use recorder::AggregateRecorder;
pub use storage::RecordStorage;
