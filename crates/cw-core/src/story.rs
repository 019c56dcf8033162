use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The value stored under a story-progress key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// A plain yes/no fact.
    Bool(bool),
    /// A counter or numeric fact.
    Int(i64),
    /// An opaque text fact.
    Text(String),
}

impl FlagValue {
    /// Whether this value satisfies a condition check.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Int(i) => *i != 0,
            FlagValue::Text(s) => !s.is_empty(),
        }
    }
}

impl Default for FlagValue {
    fn default() -> Self {
        FlagValue::Bool(true)
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        FlagValue::Bool(b)
    }
}

impl From<i64> for FlagValue {
    fn from(i: i64) -> Self {
        FlagValue::Int(i)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        FlagValue::Text(s.to_string())
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Int(i) => write!(f, "{i}"),
            FlagValue::Text(s) => f.write_str(s),
        }
    }
}

/// Story-progress flags gathered during a session.
///
/// Keys are only ever added or overwritten; nothing is removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryProgress {
    flags: BTreeMap<String, FlagValue>,
}

impl StoryProgress {
    /// Create empty progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a flag.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) {
        self.flags.insert(key.into(), value.into());
    }

    /// Look up a flag.
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// True if the flag exists and is truthy.
    pub fn is_set(&self, key: &str) -> bool {
        self.flags.get(key).is_some_and(FlagValue::is_truthy)
    }

    /// Iterate flags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of recorded flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
