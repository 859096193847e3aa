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

//! Consistent-hash ring with virtual replicas, the node-selection layer
//! `groupcache-transport`'s peer pool uses to pick which node owns a key.

use hashbrown::HashMap;

/// Default node hash: CRC32-IEEE, matching the upstream implementation bit
/// for bit. Passed `"{i}{node}"` for virtual replica `i` of `node`.
fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Maps keys to node names by consistent hashing over virtual replicas.
///
/// `Get` finds the smallest ring entry `>= hash(key)` by binary search and
/// wraps to index 0 when `hash(key)` exceeds every entry — the wraparound
/// that makes the ring circular.
pub struct HashRing {
    replicas: usize,
    hash_fn: Box<dyn Fn(&[u8]) -> u32 + Send + Sync>,
    /// Sorted virtual-replica hashes.
    ring: Vec<u32>,
    /// Virtual-replica hash -> owning real node name.
    hash_to_node: HashMap<u32, String>,
}

impl HashRing {
    /// `replicas` virtual points per real node. The default hash is
    /// CRC32-IEEE.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash_fn(replicas, crc32_ieee)
    }

    /// Same as [`HashRing::new`] but with a caller-supplied hash function,
    /// for deployments that want to avoid CRC32's known clustering on
    /// certain key distributions.
    pub fn with_hash_fn(replicas: usize, hash_fn: impl Fn(&[u8]) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            replicas,
            hash_fn: Box::new(hash_fn),
            ring: Vec::new(),
            hash_to_node: HashMap::new(),
        }
    }

    /// Add real nodes to the ring. For each node, `replicas` virtual
    /// points are placed at `hash("{i}{node}")` for `i` in `0..replicas`.
    /// The ring is re-sorted after every call.
    pub fn add<S: AsRef<str>>(&mut self, nodes: impl IntoIterator<Item = S>) {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let virtual_key = format!("{i}{node}");
                let hash = (self.hash_fn)(virtual_key.as_bytes());
                self.ring.push(hash);
                self.hash_to_node.insert(hash, node.to_string());
            }
        }
        self.ring.sort_unstable();
    }

    /// The node owning `key`, or `None` if the ring has no nodes.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.ring.is_empty() {
            return None;
        }
        let hash = (self.hash_fn)(key.as_bytes());
        let idx = self.ring.partition_point(|&h| h < hash);
        let idx = if idx == self.ring.len() { 0 } else { idx };
        self.hash_to_node.get(&self.ring[idx]).map(String::as_str)
    }

    /// Total number of virtual points on the ring (`replicas * nodes_added`,
    /// modulo duplicate node names).
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
