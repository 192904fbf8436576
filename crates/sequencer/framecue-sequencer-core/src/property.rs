//! PropertyBook: the registry of host-declared property targets.
//!
//! Hosts register the slots their render objects expose; the scheduler
//! commits interpolated values into them each tick. The book also carries
//! the per-tick write stamps that back the conflicting-write policy: a
//! commit made on a tween's terminal frame is a *closing* write and is not
//! stamped (a successor in program order may overwrite it); a second
//! stamped write to one property within a tick is a conflict.

use hashbrown::HashMap;

use framecue_api_core::{PropPath, Value};

use crate::error::SequencerError;
use crate::ids::{IdAllocator, PropId, TaskId};

/// A mutable, named slot on a render object.
#[derive(Clone, Debug)]
pub struct PropertyTarget {
    pub id: PropId,
    pub path: PropPath,
    pub value: Value,
}

#[derive(Default, Debug)]
pub struct PropertyBook {
    items: Vec<PropertyTarget>,
    index: HashMap<PropPath, PropId>,
    ids: IdAllocator,

    // Per-tick write tracking; cleared by begin_tick().
    stamped: HashMap<PropId, TaskId>,
    last_writer: HashMap<PropId, TaskId>,
    dirty: Vec<PropId>,
}

impl PropertyBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property target, returning its handle. Re-registering an
    /// existing path resets its value and returns the existing handle.
    pub fn register(&mut self, path: PropPath, initial: Value) -> PropId {
        if let Some(&id) = self.index.get(&path) {
            self.items[id.0 as usize].value = initial;
            return id;
        }
        let id = self.ids.alloc_prop();
        self.index.insert(path.clone(), id);
        self.items.push(PropertyTarget {
            id,
            path,
            value: initial,
        });
        id
    }

    /// Look up the handle for a registered path.
    pub fn resolve(&self, path: &PropPath) -> Option<PropId> {
        self.index.get(path).copied()
    }

    #[inline]
    pub fn get(&self, id: PropId) -> Option<&PropertyTarget> {
        self.items.get(id.0 as usize)
    }

    #[inline]
    pub fn value(&self, id: PropId) -> Option<&Value> {
        self.get(id).map(|t| &t.value)
    }

    pub fn value_by_path(&self, path: &PropPath) -> Option<&Value> {
        self.resolve(path).and_then(|id| self.value(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reset per-tick write tracking.
    pub fn begin_tick(&mut self) {
        self.stamped.clear();
        self.last_writer.clear();
        self.dirty.clear();
    }

    /// Commit a value. The write always lands (deterministic
    /// last-writer-wins in commit order); the returned error reports a
    /// stamped collision for the caller's conflict policy.
    pub fn commit(
        &mut self,
        id: PropId,
        value: Value,
        writer: TaskId,
        closing: bool,
        frame: u64,
    ) -> Result<(), SequencerError> {
        let conflict = if closing {
            None
        } else {
            match self.stamped.get(&id) {
                Some(_) => Some(()),
                None => {
                    self.stamped.insert(id, writer);
                    None
                }
            }
        };

        let target = &mut self.items[id.0 as usize];
        target.value = value;
        if !self.last_writer.contains_key(&id) {
            self.dirty.push(id);
        }
        self.last_writer.insert(id, writer);

        if conflict.is_some() {
            return Err(SequencerError::ConflictingWrite {
                path: target.path.to_string(),
                frame,
            });
        }
        Ok(())
    }

    /// Properties written this tick, in first-write order, with the task
    /// that wrote last.
    pub fn take_dirty(&mut self) -> Vec<(PropId, TaskId)> {
        let dirty = std::mem::take(&mut self.dirty);
        dirty
            .into_iter()
            .map(|id| (id, self.last_writer[&id]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> PropPath {
        PropPath::parse(s).unwrap()
    }

    #[test]
    fn register_and_resolve() {
        let mut book = PropertyBook::new();
        let id = book.register(path("intro/title.opacity"), Value::f(0.0));
        assert_eq!(book.resolve(&path("intro/title.opacity")), Some(id));
        assert_eq!(book.value(id), Some(&Value::f(0.0)));
        // Re-register resets, same handle.
        let id2 = book.register(path("intro/title.opacity"), Value::f(1.0));
        assert_eq!(id, id2);
        assert_eq!(book.value(id), Some(&Value::f(1.0)));
    }

    #[test]
    fn stamped_collision_is_a_conflict() {
        let mut book = PropertyBook::new();
        let id = book.register(path("a/b.c"), Value::f(0.0));
        book.begin_tick();
        book.commit(id, Value::f(1.0), TaskId(0), false, 3).unwrap();
        let err = book.commit(id, Value::f(2.0), TaskId(1), false, 3);
        assert!(matches!(
            err,
            Err(SequencerError::ConflictingWrite { .. })
        ));
        // Last writer still wins.
        assert_eq!(book.value(id), Some(&Value::f(2.0)));
    }

    #[test]
    fn closing_write_does_not_stamp() {
        let mut book = PropertyBook::new();
        let id = book.register(path("a/b.c"), Value::f(0.0));
        book.begin_tick();
        // Terminal commit of a finishing tween, then the successor opens.
        book.commit(id, Value::f(1.0), TaskId(0), true, 20).unwrap();
        book.commit(id, Value::f(1.0), TaskId(0), false, 20).unwrap();
        assert_eq!(book.take_dirty(), vec![(id, TaskId(0))]);
    }

    #[test]
    fn dirty_order_is_first_write_order() {
        let mut book = PropertyBook::new();
        let a = book.register(path("a/x.o"), Value::f(0.0));
        let b = book.register(path("a/y.o"), Value::f(0.0));
        book.begin_tick();
        book.commit(b, Value::f(1.0), TaskId(0), false, 0).unwrap();
        book.commit(a, Value::f(1.0), TaskId(1), false, 0).unwrap();
        assert_eq!(book.take_dirty(), vec![(b, TaskId(0)), (a, TaskId(1))]);
    }
}
