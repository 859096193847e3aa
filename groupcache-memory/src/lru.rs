//  Copyright 2024 groupcache-rs Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

use std::collections::HashMap;
use std::ptr::NonNull;

use crate::value::Value;

/// One entry in the intrusive recency list. Owned by `Lru` through the
/// `map` index; never reachable any other way.
struct Node<V> {
    key: String,
    value: V,
    prev: Option<NonNull<Node<V>>>,
    next: Option<NonNull<Node<V>>>,
}

/// A bounded-size, recency-ordered `String -> V` map.
///
/// `head` is the most recently used entry, `tail` is the eviction victim.
/// `usedBytes` is the sum of `key.len() + value.len()` over all entries;
/// whenever `maxBytes > 0`, `Add` evicts from the tail until `usedBytes <=
/// maxBytes` (zero means unbounded).
///
/// The list is intrusive (raw pointers, manual drop) rather than built on
/// `VecDeque`/`LinkedList` so that `Get` and `Add` can both be O(1):
/// relinking a node costs four pointer writes, no matter where in the list
/// it sits.
pub struct Lru<V: Value> {
    map: HashMap<String, NonNull<Node<V>>>,
    head: Option<NonNull<Node<V>>>,
    tail: Option<NonNull<Node<V>>>,
    max_bytes: usize,
    used_bytes: usize,
    on_evicted: Option<Box<dyn FnMut(String, V) + Send>>,
}

// SAFETY: `Lru<V>` owns every `Node<V>` it points to exclusively (no
// aliasing across instances), so it is Send whenever V is.
unsafe impl<V: Value> Send for Lru<V> {}

impl<V: Value> Lru<V> {
    /// `max_bytes == 0` means unbounded.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            map: HashMap::new(),
            head: None,
            tail: None,
            max_bytes,
            used_bytes: 0,
            on_evicted: None,
        }
    }

    /// Install a callback invoked with each evicted `(key, value)` pair.
    pub fn with_evict_callback(mut self, cb: impl FnMut(String, V) + Send + 'static) -> Self {
        self.on_evicted = Some(Box::new(cb));
        self
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let ptr = *self.map.get(key)?;
        unsafe {
            self.detach(ptr);
            self.attach_front(ptr);
            Some(ptr.as_ref().value.clone())
        }
    }

    /// Insert or replace `key`, then evict from the tail until the byte
    /// budget is satisfied. A single `Add` may evict more than one entry.
    pub fn add(&mut self, key: String, value: V) {
        if let Some(&ptr) = self.map.get(&key) {
            unsafe {
                let mut ptr = ptr;
                let old_len = ptr.as_ref().value.len();
                let new_len = value.len();
                ptr.as_mut().value = value;
                self.adjust_used_bytes(old_len, new_len);
                self.detach(ptr);
                self.attach_front(ptr);
            }
        } else {
            let charge = key.len() + value.len();
            let node = Box::new(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            let ptr = unsafe { NonNull::new_unchecked(Box::into_raw(node)) };
            self.map.insert(key, ptr);
            unsafe { self.attach_front(ptr) };
            self.used_bytes += charge;
        }
        self.evict();
    }

    fn adjust_used_bytes(&mut self, old_len: usize, new_len: usize) {
        if new_len >= old_len {
            self.used_bytes += new_len - old_len;
        } else {
            self.used_bytes -= old_len - new_len;
        }
    }

    fn evict(&mut self) {
        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            let Some(tail) = self.tail else { break };
            unsafe {
                self.detach(tail);
                let node = Box::from_raw(tail.as_ptr());
                self.map.remove(&node.key);
                self.used_bytes -= node.key.len() + node.value.len();
                tracing::trace!(
                    key = %node.key,
                    used_bytes = self.used_bytes,
                    max_bytes = self.max_bytes,
                    "lru: evicting entry under byte-budget pressure"
                );
                if let Some(cb) = self.on_evicted.as_mut() {
                    cb(node.key, node.value);
                }
            }
        }
    }

    /// Unlink `node` from the recency list without freeing it.
    unsafe fn detach(&mut self, mut node: NonNull<Node<V>>) {
        unsafe {
            let n = node.as_mut();
            match n.prev {
                Some(mut prev) => prev.as_mut().next = n.next,
                None => self.head = n.next,
            }
            match n.next {
                Some(mut next) => next.as_mut().prev = n.prev,
                None => self.tail = n.prev,
            }
            n.prev = None;
            n.next = None;
        }
    }

    /// Link `node` in as the new head (most recently used).
    unsafe fn attach_front(&mut self, mut node: NonNull<Node<V>>) {
        unsafe {
            node.as_mut().next = self.head;
            node.as_mut().prev = None;
            match self.head {
                Some(mut head) => head.as_mut().prev = Some(node),
                None => self.tail = Some(node),
            }
        }
        self.head = Some(node);
    }
}

impl<V: Value> Drop for Lru<V> {
    fn drop(&mut self) {
        let mut cur = self.head;
        while let Some(ptr) = cur {
            unsafe {
                let boxed = Box::from_raw(ptr.as_ptr());
                cur = boxed.next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_lru_eviction() {
        let mut lru: Lru<&'static str> = Lru::new(10);
        lru.add("key1".to_string(), "1234"); // 4 + 4 = 8
        lru.add("k2".to_string(), "v2"); // 2 + 2 = 4, total 12 -> evicts key1
        assert_eq!(lru.get("key1"), None);
        assert_eq!(lru.get("k2"), Some("v2"));
    }

    #[test]
    fn get_moves_to_front_and_protects_from_eviction() {
        let mut lru: Lru<&'static str> = Lru::new(6);
        lru.add("a".to_string(), "11"); // 1+2=3
        lru.add("b".to_string(), "22"); // 1+2=3, total 6
        assert_eq!(lru.get("a"), Some("11")); // touch a, now b is LRU
        lru.add("c".to_string(), "33"); // 1+2=3, total 9 -> evicts b, not a
        assert_eq!(lru.get("b"), None);
        assert_eq!(lru.get("a"), Some("11"));
        assert_eq!(lru.get("c"), Some("33"));
    }

    #[test]
    fn replace_adjusts_used_bytes_without_duplicate_entry() {
        let mut lru: Lru<&'static str> = Lru::new(0);
        lru.add("a".to_string(), "11");
        assert_eq!(lru.used_bytes(), 3);
        lru.add("a".to_string(), "1");
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.used_bytes(), 2);
    }

    #[test]
    fn unbounded_when_max_bytes_is_zero() {
        let mut lru: Lru<&'static str> = Lru::new(0);
        for i in 0..1000 {
            lru.add(i.to_string(), "x");
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn evict_callback_observes_evicted_pairs() {
        let evicted = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let evicted2 = evicted.clone();
        let mut lru: Lru<&'static str> = Lru::new(4).with_evict_callback(move |k, v| {
            evicted2.lock().push((k, v));
        });
        lru.add("a".to_string(), "11"); // 3
        lru.add("b".to_string(), "22"); // 3, total 6 -> evicts a
        assert_eq!(evicted.lock().as_slice(), &[("a".to_string(), "11")]);
    }

    #[test]
    fn invariant_used_bytes_matches_sum_of_entries() {
        let mut lru: Lru<&'static str> = Lru::new(0);
        lru.add("alpha".to_string(), "beta");
        lru.add("gamma".to_string(), "delta");
        let expected: usize = [("alpha", "beta"), ("gamma", "delta")]
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum();
        assert_eq!(lru.used_bytes(), expected);
    }
}
