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

//! Collapses concurrent calls for the same key into one in-flight future,
//! broadcasting its result to every waiter.
//!
//! This is the primary thundering-herd defense in front of `Group`'s
//! loader and peer fetches: while a key's flight is outstanding, every
//! other caller for that key parks on the same [`Call`] instead of
//! starting its own loader invocation.

use std::future::Future;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use tokio::sync::Notify;

/// A record for an outstanding (or just-finished) call. Lives only for the
/// duration of the flight: it is removed from the tracking map immediately
/// after the leader's future resolves, before the result is handed back.
struct Call<T, E> {
    notify: Notify,
    result: Mutex<Option<Result<T, E>>>,
}

/// Per-key call deduplication tracker.
///
/// `T` and `E` must be `Clone` because every waiter — not just the call's
/// leader — receives its own copy of the one (value, error) outcome.
pub struct SingleFlight<T, E> {
    calls: Mutex<HashMap<String, Arc<Call<T, E>>>>,
}

impl<T, E> Default for SingleFlight<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` for `key`, unless a call for `key` is already in flight — in
    /// which case wait for that call's result instead of invoking `f`.
    ///
    /// Guarantees: for any key, concurrent `do_call` invocations that
    /// overlap in time produce exactly one execution of `f`, and every
    /// caller observes an identical `(value, error)` outcome. A caller that
    /// arrives after the previous flight for `key` has already been
    /// removed from the tracking map starts a fresh flight.
    pub async fn do_call<F, Fut>(&self, key: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let (call, is_leader) = {
            let mut calls = self.calls.lock();
            if let Some(existing) = calls.get(key) {
                (existing.clone(), false)
            } else {
                let call = Arc::new(Call {
                    notify: Notify::new(),
                    result: Mutex::new(None),
                });
                calls.insert(key.to_string(), call.clone());
                (call, true)
            }
        };

        if !is_leader {
            tracing::debug!(key, "single-flight: joining in-flight call");
            return self.wait_for(&call).await;
        }

        let result = f().await;

        *call.result.lock() = Some(result.clone());
        call.notify.notify_waiters();

        self.calls.lock().remove(key);

        result
    }

    async fn wait_for(&self, call: &Call<T, E>) -> Result<T, E> {
        loop {
            // Registering interest before re-checking the result closes the
            // race between "leader just finished" and "we start waiting":
            // `Notify` captures whether a `notify_waiters` happened between
            // this call and the `.await` below.
            let notified = call.notify.notified();
            if let Some(result) = call.result.lock().clone() {
                return result;
            }
            notified.await;
        }
    }
}
