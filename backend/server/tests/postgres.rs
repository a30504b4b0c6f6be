use scoop::database::PgStore;
use stock::{Inventory, InventoryItem};

// Needs a reachable Postgres, e.g.
// DATABASE_URL=postgres://postgres@localhost/scoop?sslmode=disable cargo test -- --ignored
async fn connect() -> Option<PgStore> {
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(PgStore::connect(&url).await.unwrap())
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn whole_map_save_is_all_or_nothing() {
    let Some(store) = connect().await else {
        return;
    };
    let run = std::process::id();
    let good = format!("a-rollback-{run}");

    // Postgres rejects NUL in TEXT, so the second upsert fails after the first succeeded.
    let inventory: Inventory = [
        (good.clone(), InventoryItem::stocked(5)),
        (format!("z-rollback-{run}\0"), InventoryItem::stocked(5)),
    ]
    .into_iter()
    .collect();

    assert!(store.set(&inventory).await.is_err());
    assert!(!store.get().await.unwrap().contains_key(&good));
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn whole_map_save_commits_every_key() {
    let Some(store) = connect().await else {
        return;
    };
    let run = std::process::id();

    let inventory: Inventory = ["a", "b"]
        .into_iter()
        .map(|key| (format!("{key}-commit-{run}"), InventoryItem::stocked(3)))
        .collect();

    store.set(&inventory).await.unwrap();

    let stored = store.get().await.unwrap();
    for (name, item) in &inventory {
        assert_eq!(stored.get(name), Some(item));
    }
}
