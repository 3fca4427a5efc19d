//! Runs against a live MongoDB: `MONGODB_URI=... cargo test -p ideaforge-db -- --ignored`

use ideaforge_db::{IdeaDraft, IdeaRepository, MongoIdeaRepository, connect};

async fn repository() -> MongoIdeaRepository {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017/ideaforge_test".to_string());
    connect(&uri).await.expect("MongoDB reachable")
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn crud_round_trip() {
    let repo = repository().await;

    let created = repo
        .create(IdeaDraft::new("A").with_description("d").with_tags(["x", "$not-a-path"]))
        .await
        .unwrap();
    assert_eq!(created.created_at, created.updated_at);

    let listed = repo.list().await.unwrap();
    assert!(listed.iter().any(|idea| idea == &created));

    let updated = repo
        .update(&created.id, IdeaDraft::new("B").with_description("d").with_tags(["x", "$not-a-path"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "B");
    assert_eq!(updated.tags, vec!["x", "$not-a-path"]);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let listed = repo.list().await.unwrap();
    assert!(listed.windows(2).all(|pair| pair[0].updated_at >= pair[1].updated_at));

    assert!(repo.delete(&created.id).await.unwrap().is_some());
    assert!(repo.delete(&created.id).await.unwrap().is_none());
    assert!(repo.update(&created.id, IdeaDraft::new("C")).await.unwrap().is_none());
}
