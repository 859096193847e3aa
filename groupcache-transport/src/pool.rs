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

use std::sync::Arc;

use groupcache::PeerGetter;
use groupcache_hashring::HashRing;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::client::HttpGetter;

/// Default virtual replicas per node, matching the upstream pool default.
pub const DEFAULT_REPLICAS: usize = 50;

struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// A [`groupcache::PeerPicker`] backed by a consistent-hash ring over peer
/// base URLs, with an HTTP getter per peer.
///
/// `set` replaces the ring and the getter map atomically under one write
/// lock; `pick_peer` reads both under the matching read lock, so a reader
/// never observes a ring entry without a corresponding getter.
pub struct HttpPool {
    self_url: String,
    base_path: String,
    replicas: usize,
    state: RwLock<PoolState>,
}

impl HttpPool {
    pub fn new(self_url: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self::with_replicas(self_url, base_path, DEFAULT_REPLICAS)
    }

    pub fn with_replicas(self_url: impl Into<String>, base_path: impl Into<String>, replicas: usize) -> Self {
        Self {
            self_url: self_url.into(),
            base_path: base_path.into(),
            replicas,
            state: RwLock::new(PoolState {
                ring: HashRing::new(replicas),
                getters: HashMap::new(),
            }),
        }
    }

    /// Replaces pool membership wholesale. `peers` are full base URLs;
    /// the local node's own URL may be included or omitted, since
    /// self-elision in [`PeerPicker::pick_peer`] handles either case.
    pub fn set(&self, peers: impl IntoIterator<Item = String>) {
        let peers: Vec<String> = peers.into_iter().collect();

        let mut ring = HashRing::new(self.replicas);
        ring.add(peers.iter());

        let getters = peers
            .into_iter()
            .map(|peer| {
                let getter = Arc::new(HttpGetter::new(peer.clone(), self.base_path.clone()));
                (peer, getter)
            })
            .collect();

        *self.state.write() = PoolState { ring, getters };
    }
}

impl groupcache::PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.read();
        let owner = state.ring.get(key)?;
        if owner == self.self_url {
            return None;
        }
        state
            .getters
            .get(owner)
            .cloned()
            .map(|getter| getter as Arc<dyn PeerGetter>)
    }
}
