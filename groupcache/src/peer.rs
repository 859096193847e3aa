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

use async_trait::async_trait;

use crate::error::BoxError;

/// Picks which peer, if any, owns a key.
///
/// `None` means "serve locally" — the required response both for a ring
/// with no remote members and for self-elision (the picker choosing the
/// local node for its own key).
pub trait PeerPicker: Send + Sync + 'static {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a key from a specific remote peer, scoped to one group.
#[async_trait]
pub trait PeerGetter: Send + Sync + 'static {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, BoxError>;
}
