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

//! A real node fronting its own `Group`, with a second real HTTP peer on
//! the same consistent-hash ring. Whichever of the two owns a key answers
//! it; the other forwards the request over the wire protocol and never
//! populates its own local cache with a peer-fetched result.
//!
//! The process-wide group registry (`groupcache::new_group`/`get_group`)
//! is a single map shared by the whole test binary, so two `Group`s
//! registered under the *same* name collide (`new_group` panics on a
//! duplicate), and — more subtly — a peer request that resolves back to
//! the *same* `Group` object it originated from would rejoin its own
//! still-in-flight single-flight call and deadlock forever. Both traps
//! are sidestepped here by giving the "remote peer" no `Group` at all: it
//! is a bare axum handler standing in for another node's process, with
//! its own independent load counter, so which side answers a given key is
//! observed from the response rather than assumed from the ring's hash.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::Path;
use axum::routing::get;
use axum::Router;
use groupcache_transport::HttpPool;

const BASE_PATH: &str = "/_groupcache";
const GROUP_NAME: &str = "peer-protocol-test-scores";

/// Stands in for a second node's process: answers any key with a value
/// that's unmistakably peer-sourced, and counts how many times it was
/// asked, independent of the real node's own loader counter.
async fn spawn_mock_peer(addr: &'static str, load_counts: Arc<AtomicUsize>) {
    let app = Router::new().route(
        "/{_group}/{key}",
        get(move |Path((_group, key)): Path<(String, String)>| {
            let load_counts = load_counts.clone();
            async move {
                load_counts.fetch_add(1, Ordering::SeqCst);
                groupcache_transport::encode(format!("FROM-PEER:{key}").into_bytes())
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
}

/// The one real node under test, with a pool that may route a key to
/// itself or to the mock peer.
async fn spawn_real_node(addr: &'static str, peers: &[&'static str], load_counts: Arc<AtomicUsize>) {
    let db = HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    let group = groupcache::new_group(
        GROUP_NAME,
        2048,
        groupcache::getter_fn(move |key: &str| {
            let db = db.clone();
            let load_counts = load_counts.clone();
            let key = key.to_string();
            async move {
                load_counts.fetch_add(1, Ordering::SeqCst);
                db.get(key.as_str())
                    .map(|v| v.as_bytes().to_vec())
                    .ok_or_else(|| -> groupcache::BoxError { format!("{key} not exist").into() })
            }
        }),
    );

    let self_url = format!("http://{addr}");
    let pool = Arc::new(HttpPool::new(self_url, BASE_PATH));
    pool.set(peers.iter().map(|p| format!("http://{p}")));
    group.register_peers(pool);

    let app = groupcache_transport::router(BASE_PATH);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
}

#[tokio::test]
async fn each_key_is_answered_by_exactly_one_side_and_peer_results_are_not_cached_locally() {
    let node_addr = "127.0.0.1:19981";
    let peer_addr = "127.0.0.1:19982";

    let local_loads = Arc::new(AtomicUsize::new(0));
    let peer_loads = Arc::new(AtomicUsize::new(0));
    spawn_mock_peer(peer_addr, peer_loads.clone()).await;
    spawn_real_node(node_addr, &[node_addr, peer_addr], local_loads.clone()).await;

    // Give both listeners a moment to come up.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::new();
    let url = format!("http://{node_addr}{BASE_PATH}/{GROUP_NAME}/Tom");

    let first = client.get(&url).send().await.unwrap();
    assert_eq!(first.status(), reqwest::StatusCode::OK);
    let first_body = groupcache_transport::decode(first.bytes().await.unwrap().to_vec()).unwrap();

    if first_body == b"FROM-PEER:Tom" {
        // The ring assigned "Tom" to the peer: the local loader must never
        // have run for it.
        assert_eq!(local_loads.load(Ordering::SeqCst), 0);
        assert_eq!(peer_loads.load(Ordering::SeqCst), 1);

        // A second request still forwards: a peer-fetched value is never
        // admitted to the local cache (spec's single-owner policy).
        let second = client.get(&url).send().await.unwrap();
        let second_body = groupcache_transport::decode(second.bytes().await.unwrap().to_vec()).unwrap();
        assert_eq!(second_body, b"FROM-PEER:Tom");
        assert_eq!(peer_loads.load(Ordering::SeqCst), 2);
        assert_eq!(local_loads.load(Ordering::SeqCst), 0);
    } else {
        // The ring assigned "Tom" to the node itself: its own loader ran,
        // and the peer was never asked.
        assert_eq!(first_body, b"630");
        assert_eq!(local_loads.load(Ordering::SeqCst), 1);
        assert_eq!(peer_loads.load(Ordering::SeqCst), 0);

        // A second request hits the now-populated local cache: no further
        // loader invocation.
        let second = client.get(&url).send().await.unwrap();
        let second_body = groupcache_transport::decode(second.bytes().await.unwrap().to_vec()).unwrap();
        assert_eq!(second_body, b"630");
        assert_eq!(local_loads.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn unknown_group_on_a_peer_is_reported_as_not_found() {
    let addr = "127.0.0.1:19983";
    let app = groupcache_transport::router(BASE_PATH);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}{BASE_PATH}/no-such-group/k"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}
