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

use groupcache::{BoxError, PeerGetter};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// A [`PeerGetter`] that fetches a key from one remote node over HTTP.
///
/// Any non-200 response, transport failure, or body-read failure is
/// surfaced as an error; [`groupcache::Group`] treats all of these as
/// cause to fall through to local loading.
pub struct HttpGetter {
    base_url: String,
    base_path: String,
    client: reqwest::Client,
}

impl HttpGetter {
    /// `base_url` is the peer's full base URL (e.g. `http://10.0.0.2:8080`),
    /// `base_path` the fixed protocol prefix (e.g. `/_groupcache`).
    pub fn new(base_url: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            base_path: base_path.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.base_path,
            utf8_percent_encode(group, NON_ALPHANUMERIC),
            utf8_percent_encode(key, NON_ALPHANUMERIC),
        )
    }
}

#[async_trait::async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, BoxError> {
        let url = self.url_for(group, key);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| -> BoxError { Box::new(e) })?;

        if resp.status() != reqwest::StatusCode::OK {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("peer {url} returned {status}: {body}").into());
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| -> BoxError { Box::new(e) })?
            .to_vec();

        crate::wire::decode(body).map_err(|e| -> BoxError { Box::new(e) })
    }
}
