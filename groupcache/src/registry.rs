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

use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::getter::Getter;
use crate::group::Group;

fn registry() -> &'static RwLock<HashMap<String, Arc<Group>>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<Group>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Creates and registers a new group under `name`.
///
/// Registration is atomic with respect to [`get_group`]: the write lock is
/// held for the whole insert. Calling this twice for the same name is a
/// programmer error and panics, matching `NewGroup`'s documented contract
/// upstream.
pub fn new_group(name: impl Into<String>, cache_bytes: usize, loader: impl Getter) -> Arc<Group> {
    let name = name.into();
    let group = Arc::new(Group::new(name.clone(), cache_bytes, Box::new(loader)));

    let mut guard = registry().write();
    if guard.contains_key(&name) {
        panic!("group {name:?} already registered");
    }
    guard.insert(name, group.clone());
    group
}

/// Looks up a previously-registered group by name.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    registry().read().get(name).cloned()
}
