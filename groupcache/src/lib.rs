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

//! A distributed in-memory cache: local bounded-size LRU, consistent-hash
//! peer routing, and single-flight loader deduplication, composed into a
//! named [`Group`].
//!
//! A `Group` is read-through only: entries are admitted on miss and evicted
//! strictly by LRU byte-budget pressure. There is no persistence,
//! replication, write propagation, or TTL-based expiry.

mod error;
mod getter;
mod group;
mod peer;
mod registry;

pub use error::{BoxError, Error, SharedError};
pub use getter::{getter_fn, Getter, GetterFn};
pub use group::Group;
pub use groupcache_common::ByteView;
pub use peer::{PeerGetter, PeerPicker};
pub use registry::{get_group, new_group};
