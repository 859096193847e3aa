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

use std::future::Future;

use async_trait::async_trait;

use crate::error::BoxError;

/// The user-supplied authoritative data source for a [`crate::Group`]:
/// bytes in, keyed by a borrowed key, fallibly.
#[async_trait]
pub trait Getter: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Vec<u8>, BoxError>;
}

/// Lifts a plain async closure into a [`Getter`], for callers who would
/// rather not name a type for a one-off loader.
pub struct GetterFn<F>(F);

#[async_trait]
impl<F, Fut> Getter for GetterFn<F>
where
    F: Fn(&str) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send,
{
    async fn get(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        (self.0)(key).await
    }
}

/// Convenience constructor, mirroring `getter_fn(|key| async move { ... })`.
pub fn getter_fn<F, Fut>(f: F) -> GetterFn<F>
where
    F: Fn(&str) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send,
{
    GetterFn(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn getter_fn_adapts_a_closure() {
        let getter = getter_fn(|key: &str| {
            let key = key.to_string();
            async move { Ok(format!("v-{key}").into_bytes()) }
        });
        let got = getter.get("a").await.unwrap();
        assert_eq!(got, b"v-a");
    }
}
