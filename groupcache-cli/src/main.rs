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

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use groupcache::getter_fn;
use groupcache_transport::HttpPool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Runs one groupcache node: a "scores" demo group backed by an in-memory
/// slow database, fronted by the HTTP peer protocol and an API endpoint.
#[derive(Parser, Debug)]
#[command(name = "groupcache", author, version, about)]
struct Args {
    /// Address this node listens on, e.g. 127.0.0.1:9999.
    #[arg(long, default_value = "127.0.0.1:9999", env = "GROUPCACHE_ADDR")]
    addr: String,

    /// This node's own base URL, as advertised to peers, e.g.
    /// http://127.0.0.1:9999. Defaults to http://<addr>.
    #[arg(long, env = "GROUPCACHE_SELF_URL")]
    self_url: Option<String>,

    /// Comma-separated peer base URLs, including this node's own.
    #[arg(long, value_delimiter = ',', env = "GROUPCACHE_PEERS")]
    peers: Vec<String>,

    /// Fixed prefix for the inter-node HTTP protocol.
    #[arg(long, default_value = "/_groupcache", env = "GROUPCACHE_BASE_PATH")]
    base_path: String,

    /// Byte budget for the "scores" group's local cache.
    #[arg(long, default_value_t = 2048, env = "GROUPCACHE_CACHE_BYTES")]
    cache_bytes: usize,

    /// Virtual replicas per node on the consistent-hash ring.
    #[arg(long, default_value_t = groupcache_transport::DEFAULT_REPLICAS, env = "GROUPCACHE_REPLICAS")]
    replicas: usize,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// The demo "slow database" the scores group's loader consults on miss.
fn slow_db() -> HashMap<&'static str, &'static str> {
    HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let self_url = args
        .self_url
        .clone()
        .unwrap_or_else(|| format!("http://{}", args.addr));

    let db = slow_db();
    let group = groupcache::new_group(
        "scores",
        args.cache_bytes,
        getter_fn(move |key: &str| {
            let db = db.clone();
            let key = key.to_string();
            async move {
                tracing::info!(key, "slow db lookup");
                db.get(key.as_str())
                    .map(|v| v.as_bytes().to_vec())
                    .ok_or_else(|| -> groupcache::BoxError { format!("{key} not exist").into() })
            }
        }),
    );

    let pool = Arc::new(HttpPool::with_replicas(
        self_url.clone(),
        args.base_path.clone(),
        args.replicas,
    ));
    if !args.peers.is_empty() {
        pool.set(args.peers.clone());
    }
    group.register_peers(pool);

    let app = groupcache_transport::router(&args.base_path);

    tracing::info!(addr = %args.addr, self_url, "groupcache node listening");
    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;

    axum::serve(listener, app)
        .await
        .context("groupcache server exited")?;

    Ok(())
}
