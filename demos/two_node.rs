//! Two nodes sharing the "scores" group over HTTP. Each node registers the
//! same consistent-hash ring; whichever node owns a key answers locally,
//! the other forwards the request to it over the wire protocol.

use std::collections::HashMap;
use std::sync::Arc;

use groupcache_transport::HttpPool;

const BASE_PATH: &str = "/_groupcache";

async fn spawn_node(addr: &'static str, peers: &[&'static str]) -> anyhow::Result<()> {
    let db = HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    let group = groupcache::new_group(
        format!("scores@{addr}"),
        2048,
        groupcache::getter_fn(move |key: &str| {
            let db = db.clone();
            let key = key.to_string();
            async move {
                tracing::info!(node = addr, key, "slow db lookup");
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
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let node_a = "127.0.0.1:19991";
    let node_b = "127.0.0.1:19992";

    spawn_node(node_a, &[node_a, node_b]).await?;
    spawn_node(node_b, &[node_a, node_b]).await?;

    // Give both listeners a moment to come up.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::new();
    for key in ["Tom", "Jack", "Sam"] {
        let url = format!("http://{node_a}{BASE_PATH}/scores@{node_a}/{key}");
        let resp = client.get(&url).send().await?;
        println!("node_a asked for {key} -> {}", resp.text().await?);
    }

    Ok(())
}
