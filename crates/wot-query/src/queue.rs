use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// Heap entry. Field order gives the ordering: value first, then key, so
/// equal values pop in key order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Entry<K, V> {
    value: V,
    key: K,
}

/// A min-priority queue holding at most one live entry per key.
///
/// Replaced entries stay in the heap and are skipped when popped.
#[derive(Debug)]
pub struct PairPriorityQueue<K, V> {
    heap: BinaryHeap<Reverse<Entry<K, V>>>,
    best: HashMap<K, V>,
}

impl<K, V> PairPriorityQueue<K, V>
where
    K: Clone + Eq + Hash + Ord,
    V: Clone + Ord,
{
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            best: HashMap::new(),
        }
    }

    /// Insert `key` with `value`, unless it is already queued with a value
    /// that is less than or equal to `value`.
    pub fn insert_or_update(&mut self, key: K, value: V) {
        if let Some(existing) = self.best.get(&key) {
            if *existing <= value {
                return;
            }
        }
        self.best.insert(key.clone(), value.clone());
        self.heap.push(Reverse(Entry { value, key }));
    }

    /// Remove and return the cheapest pair.
    pub fn pop(&mut self) -> Option<(K, V)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            if self.best.get(&entry.key) == Some(&entry.value) {
                self.best.remove(&entry.key);
                return Some((entry.key, entry.value));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

impl<K, V> Default for PairPriorityQueue<K, V>
where
    K: Clone + Eq + Hash + Ord,
    V: Clone + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}
