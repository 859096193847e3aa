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

use bytes::Bytes;

/// An immutable, length-aware handle to a byte payload.
///
/// `ByteView` never exposes its wrapped buffer by reference: constructors
/// clone their input and accessors clone their output, so a value handed
/// out of the cache can be mutated by the caller without corrupting what
/// is cached. The payload itself is backed by `bytes::Bytes`, so cloning a
/// `ByteView` (e.g. to hand the same cached value to multiple waiters) is
/// a refcount bump, not a copy.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Construct a `ByteView` from a byte slice, cloning it.
    pub fn new(bytes: &[u8]) -> Self {
        Self { bytes: Bytes::copy_from_slice(bytes) }
    }

    /// Construct a `ByteView` from an owned buffer without an extra copy.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes: Bytes::from(bytes) }
    }

    /// Length of the payload in bytes. This is also the cache's accounted
    /// size for the value half of an entry.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A fresh copy of the payload. Mutating the returned `Vec` never
    /// affects this `ByteView` or any other clone of it.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// The payload interpreted as UTF-8 text, replacing invalid sequences.
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        Self::from_vec(s.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_tracks_payload_size() {
        let view = ByteView::new(b"630");
        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
    }

    #[test]
    fn byte_slice_does_not_alias_storage() {
        let view = ByteView::new(b"630");
        let mut copy = view.byte_slice();
        copy[0] = b'9';
        assert_eq!(view.byte_slice(), b"630");
        assert_eq!(copy, b"930");
    }

    #[test]
    fn clone_is_cheap_and_shares_no_mutable_state() {
        let view = ByteView::new(b"hello");
        let clone = view.clone();
        assert_eq!(view, clone);
        drop(view);
        assert_eq!(clone.as_str_lossy(), "hello");
    }

    #[test]
    fn from_conversions() {
        let from_str: ByteView = "abc".into();
        let from_string: ByteView = String::from("abc").into();
        let from_vec: ByteView = vec![b'a', b'b', b'c'].into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str, from_vec);
    }
}
