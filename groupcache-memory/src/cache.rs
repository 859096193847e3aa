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

use parking_lot::Mutex;

use crate::lru::Lru;
use crate::value::Value;

/// A mutex-guarded `Lru` with lazy construction.
///
/// The inner `Lru` is not allocated until the first `add`: a `get` against
/// an empty cache returns a miss without ever taking the allocation path.
/// The lock is held only for the duration of the LRU operation itself —
/// never across a loader call or a peer fetch, which is what lets many
/// concurrent `Group::get` calls share one `ConcurrentCache` without
/// blocking each other on I/O.
pub struct ConcurrentCache<V: Value> {
    max_bytes: usize,
    inner: Mutex<Option<Lru<V>>>,
}

impl<V: Value> ConcurrentCache<V> {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(None),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.lock();
        guard.as_mut()?.get(key)
    }

    pub fn add(&self, key: String, value: V) {
        let mut guard = self.inner.lock();
        guard
            .get_or_insert_with(|| Lru::new(self.max_bytes))
            .add(key, value);
    }

    /// Number of entries currently cached. Zero for an uninitialized cache.
    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, Lru::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn used_bytes(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, Lru::used_bytes)
    }
}
