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

/// A value the LRU can size-account.
///
/// Mirrors the upstream `lru.Value` interface (`Len() int`): the cache
/// never needs to know anything else about `V` to charge it against the
/// byte budget.
pub trait Value: Clone + Send + 'static {
    /// Size in bytes this value contributes to `usedBytes`.
    fn len(&self) -> usize;

    /// Whether this value is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

impl Value for groupcache_common::ByteView {
    fn len(&self) -> usize {
        groupcache_common::ByteView::len(self)
    }
}

/// `&'static str` as a `Value`, for `lru`/`cache` tests that want a value
/// type cheaper to write than `ByteView`. Defined once here because a
/// trait impl is crate-global: two copies in separate `#[cfg(test)] mod
/// tests` blocks would conflict (`E0119`) as soon as both compile into the
/// same test binary.
#[cfg(test)]
impl Value for &'static str {
    fn len(&self) -> usize {
        str::len(self)
    }
}
