//! Base implementation of records for logging.
use crate::error::BitFlipError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like loss.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use bitflip_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss", 0.5);
/// record.insert("episode", RecordValue::Scalar(10.0));
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

    /// Merges two records, consuming both.
    ///
    /// Values of `record` overwrite those of `self` with the same key.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        for (k, v) in record.0.into_iter() {
            self.0.insert(k, v);
        }
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, BitFlipError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(BitFlipError::RecordValueTypeError("Scalar".to_string())),
            None => Err(BitFlipError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_existing_keys() {
        let r1 = Record::from_slice(&[
            ("loss", RecordValue::Scalar(1.0)),
            ("episode", RecordValue::Scalar(3.0)),
        ]);
        let r2 = Record::from_scalar("loss", 0.25);
        let r = r1.merge(r2);

        assert_eq!(r.len(), 2);
        assert_eq!(r.get_scalar("loss").unwrap(), 0.25);
        assert_eq!(r.get_scalar("episode").unwrap(), 3.0);
    }

    #[test]
    fn test_get_scalar_reports_errors() {
        let mut r = Record::from_scalar("loss", 0.5);
        r.insert("datetime", RecordValue::DateTime(Local::now()));

        assert_eq!(
            r.get_scalar("datetime"),
            Err(BitFlipError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            r.get_scalar("missing"),
            Err(BitFlipError::RecordKeyError("missing".to_string()))
        );
        assert_eq!(r.get_scalar("loss").unwrap(), 0.5);
    }
}
