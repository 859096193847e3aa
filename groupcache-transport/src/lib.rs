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

//! The HTTP binding of groupcache's inter-node protocol: `GET
//! <basePath>/<group>/<key>`, served by [`server::router`] and consumed by
//! [`HttpPool`] through [`HttpGetter`].

mod client;
mod pool;
mod server;
mod wire;

pub use client::HttpGetter;
pub use pool::{HttpPool, DEFAULT_REPLICAS};
pub use server::router;
pub use wire::{decode, encode, DecodeError, CONTENT_TYPE};
