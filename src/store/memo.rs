//! Single-slot memo cells for derived views.

use std::cell::{Cell, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Hashes a value into a cache key.
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug)]
struct Slot<K, V> {
    hash: u64,
    key: K,
    value: Rc<V>,
}

/// Caches the last computed value together with the key it was computed for.
///
/// A hit needs both the fingerprint and the key itself to match, so two
/// keys that happen to hash alike never share a value.
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: RefCell<Option<Slot<K, V>>>,
    computations: Cell<usize>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
            computations: Cell::new(0),
        }
    }
}

impl<K: Hash + Eq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, computing it on a miss.
    pub fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> Rc<V> {
        let hash = fingerprint(&key);
        if let Some(slot) = self.slot.borrow().as_ref() {
            if slot.hash == hash && slot.key == key {
                return Rc::clone(&slot.value);
            }
        }

        let value = Rc::new(compute());
        self.computations.set(self.computations.get() + 1);
        *self.slot.borrow_mut() = Some(Slot {
            hash,
            key,
            value: Rc::clone(&value),
        });
        value
    }

    /// Number of times a value has been computed.
    pub fn computations(&self) -> usize {
        self.computations.get()
    }

    pub fn invalidate(&self) {
        self.slot.borrow_mut().take();
    }
}
