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

use std::fmt;
use std::sync::Arc;

/// A type-erased, thread-safe error, the shape every `Getter` and
/// `PeerGetter` implementation returns on failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A `BoxError` made `Clone` by sharing ownership. `Group::get` is reached
/// through `SingleFlight<ByteView, Error>`, which broadcasts one error to
/// every waiter — that requires `Error: Clone`, which a bare `BoxError`
/// cannot give us.
#[derive(Debug, Clone)]
pub struct SharedError(Arc<dyn std::error::Error + Send + Sync>);

impl SharedError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }

    fn from_boxed(err: BoxError) -> Self {
        Self(Arc::from(err))
    }
}

impl fmt::Display for SharedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for SharedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Errors `Group::get` can return to its caller.
///
/// Per the error-handling design: only an empty key or a failed loader can
/// fail a `Get`. Peer transport failures and peer-side 404s are logged and
/// downgrade to local loading — they never reach this enum.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("require a key")]
    EmptyKey,

    #[error("loader failed: {0}")]
    Loader(#[source] SharedError),
}

impl Error {
    pub fn loader(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Loader(SharedError::new(err))
    }

    pub fn from_boxed_loader(err: BoxError) -> Self {
        Error::Loader(SharedError::from_boxed(err))
    }
}
