//! Stream metadata.
//!
//! Every stream describes itself through a small map of well known keys
//! (`eof`, `seekable`, `stream_type`, ...). Keys a stream does not know about
//! are simply absent, looking them up never fails.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

pub const EOF: &str = "eof";
pub const SEEKABLE: &str = "seekable";
pub const STREAM_TYPE: &str = "stream_type";
pub const MODE: &str = "mode";
pub const SIZE: &str = "size";

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Bool(bool),
    Int(u64),
    Str(Cow<'static, str>),
}

impl MetadataValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<u64> for MetadataValue {
    fn from(value: u64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<&'static str> for MetadataValue {
    fn from(value: &'static str) -> Self {
        MetadataValue::Str(Cow::Borrowed(value))
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Str(Cow::Owned(value))
    }
}

impl PartialEq<bool> for MetadataValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<&str> for MetadataValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Int(i) => write!(f, "{i}"),
            MetadataValue::Str(s) => f.write_str(s),
        }
    }
}

/// Ordered mapping from metadata key to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<&'static str, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder style.
    #[must_use]
    pub fn with<V: Into<MetadataValue>>(mut self, key: &'static str, value: V) -> Self {
        self.entries.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the value for `key`.
    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.entries.remove(key)
    }
}
