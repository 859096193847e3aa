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

use groupcache_common::ByteView;
use groupcache_memory::ConcurrentCache;
use groupcache_singleflight::SingleFlight;
use parking_lot::RwLock;

use crate::error::Error;
use crate::getter::Getter;
use crate::peer::PeerPicker;

/// A named cache namespace: its own bounded LRU, loader, and (optionally)
/// a peer-picker for distributing ownership of keys across a cluster.
///
/// Construct via [`crate::new_group`], which registers the group in the
/// process-wide registry under its name.
pub struct Group {
    name: String,
    loader: Box<dyn Getter>,
    cache: ConcurrentCache<ByteView>,
    peer_picker: RwLock<Option<Arc<dyn PeerPicker>>>,
    flight: SingleFlight<ByteView, Error>,
}

impl Group {
    pub(crate) fn new(name: impl Into<String>, cache_bytes: usize, loader: Box<dyn Getter>) -> Self {
        Self {
            name: name.into(),
            loader,
            cache: ConcurrentCache::new(cache_bytes),
            peer_picker: RwLock::new(None),
            flight: SingleFlight::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installs the group's peer-picker. One-time: a second call is a
    /// programmer error and panics, matching the spec's treatment of
    /// double-registration as fatal.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        let mut guard = self.peer_picker.write();
        if guard.is_some() {
            panic!("register_peers called twice on group {:?}", self.name);
        }
        *guard = Some(picker);
    }

    /// Resolves `key` within this group: local cache hit, else a peer
    /// fetch (if a peer owns the key), else the loader — with single-flight
    /// collapsing concurrent misses on the same key into one resolution.
    pub async fn get(&self, key: &str) -> Result<ByteView, Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        if let Some(view) = self.cache.get(key) {
            tracing::trace!(group = %self.name, key, "cache hit");
            return Ok(view);
        }

        self.flight.do_call(key, || self.load(key)).await
    }

    async fn load(&self, key: &str) -> Result<ByteView, Error> {
        // Second check: another caller may have populated the cache while
        // we were waiting to acquire the single-flight slot.
        if let Some(view) = self.cache.get(key) {
            return Ok(view);
        }

        let picker = self.peer_picker.read().clone();
        if let Some(picker) = picker {
            if let Some(peer) = picker.pick_peer(key) {
                match peer.get(&self.name, key).await {
                    Ok(bytes) => {
                        tracing::trace!(group = %self.name, key, "peer fetch hit");
                        return Ok(ByteView::from_vec(bytes));
                    }
                    Err(err) => {
                        tracing::warn!(group = %self.name, key, error = %err, "peer fetch failed, falling through to local loader");
                    }
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView, Error> {
        let bytes = self
            .loader
            .get(key)
            .await
            .map_err(Error::from_boxed_loader)?;
        let view = ByteView::from_vec(bytes);
        self.cache.add(key.to_string(), view.clone());
        Ok(view)
    }
}
