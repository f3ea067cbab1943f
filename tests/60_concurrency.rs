mod common;

use anyhow::Result;
use serde_json::json;

use common::TestApp;
use nexguild_api::database::DatabaseError;
use nexguild_api::middleware::AuthUser;
use nexguild_api::services::posts;
use nexguild_api::types::RecordId;

#[tokio::test]
async fn stale_replace_is_refused() -> Result<()> {
    let app = TestApp::new();
    let user = app.signup("Writer").await?;
    let created = app.post("/api/posts", &user.token, json!({ "content": "v1" })).await?;
    let id: RecordId = created.body["id"].as_str().unwrap_or_default().parse()?;
    let store = &app.state.store;

    let mut first = store.posts.get_404(id).await?;
    let mut second = store.posts.get_404(id).await?;
    first.content = "first writer".to_string();
    store.posts.replace(first).await?;

    second.content = "second writer".to_string();
    assert!(matches!(store.posts.replace(second).await, Err(DatabaseError::VersionConflict)));
    assert_eq!(store.posts.get_404(id).await?.content, "first writer");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_likes_are_not_lost() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;
    let created = app.post("/api/posts", &owner.token, json!({ "content": "popular" })).await?;
    let id: RecordId = created.body["id"].as_str().unwrap_or_default().parse()?;

    let mut fans = Vec::new();
    for n in 0..16 {
        let fan = app.signup(&format!("Fan{}", n)).await?;
        fans.push(AuthUser {
            id: fan.id.parse()?,
            email: format!("fan{}@example.com", n),
            name: format!("Fan{}", n),
        });
    }

    for round in 0..10 {
        let tasks: Vec<_> = fans
            .iter()
            .cloned()
            .map(|fan| {
                let store = app.state.store.clone();
                tokio::spawn(async move { posts::toggle_like(&store, id, &fan).await })
            })
            .collect();
        for task in tasks {
            task.await??;
        }

        // Every fan toggled once this round: all liked after an even round, none after an odd one
        let post = app.state.store.posts.get_404(id).await?;
        if round % 2 == 0 {
            assert_eq!(post.likes.len(), fans.len());
            assert!(fans.iter().all(|fan| post.likes.contains(&fan.id)));
        } else {
            assert!(post.likes.is_empty());
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_comments_all_land() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;
    let created = app.post("/api/posts", &owner.token, json!({ "content": "discuss" })).await?;
    let id: RecordId = created.body["id"].as_str().unwrap_or_default().parse()?;
    let author = AuthUser {
        id: owner.id.parse()?,
        email: "owner@example.com".to_string(),
        name: "Owner".to_string(),
    };

    let tasks: Vec<_> = (0..24)
        .map(|n| {
            let store = app.state.store.clone();
            let author = author.clone();
            tokio::spawn(async move { posts::add_comment(&store, id, Some(format!("take {}", n)), &author).await })
        })
        .collect();
    for task in tasks {
        task.await??;
    }

    let post = app.state.store.posts.get_404(id).await?;
    assert_eq!(post.comments.len(), 24);
    Ok(())
}
