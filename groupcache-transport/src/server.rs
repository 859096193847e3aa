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

//! The inter-node peer server: `GET <basePath>/<group>/<key>`, resolved
//! against the process-wide group registry.

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the axum router serving groupcache's inter-node protocol under
/// `base_path` (e.g. `/_groupcache`). Nest or merge this into a larger
/// application router as needed.
pub fn router(base_path: &str) -> Router {
    let peer_routes = Router::new()
        .route("/{group}/{key}", get(handle_get))
        .fallback(malformed_path);

    Router::new()
        .nest(base_path, peer_routes)
        .layer(TraceLayer::new_for_http())
}

async fn handle_get(Path((group, key)): Path<(String, String)>) -> Response {
    let Some(group_handle) = groupcache::get_group(&group) else {
        tracing::warn!(group, "peer request for unknown group");
        return (StatusCode::NOT_FOUND, format!("no such group: {group}")).into_response();
    };

    match group_handle.get(&key).await {
        Ok(view) => {
            let body = crate::wire::encode(view.byte_slice());
            (StatusCode::OK, [(header::CONTENT_TYPE, crate::wire::CONTENT_TYPE)], body).into_response()
        }
        Err(err) => {
            tracing::error!(group, key, error = %err, "loader failed serving peer request");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn malformed_path() -> Response {
    (
        StatusCode::BAD_REQUEST,
        "malformed groupcache path, expected <basePath>/<group>/<key>",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    fn register_test_group(name: &str) {
        let _ = groupcache::new_group(name, 1024, groupcache::getter_fn(|key: &str| {
            let key = key.to_string();
            async move { Ok(format!("v-{key}").into_bytes()) }
        }));
    }

    #[tokio::test]
    async fn unknown_group_is_404() {
        let app = router("/_groupcache");
        let resp = app
            .oneshot(
                Request::get("/_groupcache/nonexistent-group/k")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_path_is_400() {
        let app = router("/_groupcache");
        let resp = app
            .oneshot(Request::get("/_groupcache/only-one-segment").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn known_group_serves_the_value() {
        register_test_group("server-test-group");
        let app = router("/_groupcache");
        let resp = app
            .oneshot(
                Request::get("/_groupcache/server-test-group/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(crate::wire::decode(body.to_vec()).unwrap(), b"v-abc");
    }
}
