//! A single group, no peers: every Get either hits the local LRU or falls
//! through to the loader. Demonstrates single-flight collapsing a repeat
//! lookup into one loader call.

use std::collections::HashMap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let db = HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    let group = groupcache::new_group(
        "scores",
        2048,
        groupcache::getter_fn(move |key: &str| {
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

    let first = group.get("Tom").await?;
    let second = group.get("Tom").await?;
    println!("Tom = {} (fetched once, served from cache the second time)", first.as_str_lossy());
    assert_eq!(first, second);

    match group.get("unknown").await {
        Ok(_) => unreachable!(),
        Err(err) => println!("unknown -> error as expected: {err}"),
    }

    Ok(())
}
