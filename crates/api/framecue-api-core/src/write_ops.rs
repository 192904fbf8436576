//! Write operations the sequencer produces to describe the property commits
//! of one tick, addressed by PropPath.
//!
//! WriteOp serializes to JSON as:
//!   { "path": "intro/title.opacity", "value": { "type": "Float", "data": 1.0 } }
//!
//! WriteBatch is a simple Vec<WriteOp> with helpers; hosts apply a batch to
//! their render objects after each tick.

use crate::{path::PropPath, value::Value};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct WriteOp {
    pub path: PropPath,
    pub value: Value,
}

impl WriteOp {
    pub fn new(path: PropPath, value: Value) -> Self {
        Self { path, value }
    }
}

impl Serialize for WriteOp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("WriteOp", 2)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for WriteOp {
    fn deserialize<D>(deserializer: D) -> Result<WriteOp, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            path: PropPath,
            value: Value,
        }
        let raw = Raw::deserialize(deserializer).map_err(de::Error::custom)?;
        Ok(WriteOp {
            path: raw.path,
            value: raw.value,
        })
    }
}

/// Ordered list of write operations for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteBatch(pub Vec<WriteOp>);

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: WriteOp) {
        self.0.push(op);
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Latest value written for `path`, if any.
    pub fn get(&self, path: &PropPath) -> Option<&Value> {
        self.0
            .iter()
            .rev()
            .find(|op| &op.path == path)
            .map(|op| &op.value)
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
