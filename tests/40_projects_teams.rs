mod common;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use serde_json::json;

use common::{ids, TestApp};
use nexguild_api::types::RecordId;

async fn stored_project(app: &TestApp, id: RecordId) -> Result<serde_json::Value> {
    let project = app.state.store.projects.get(id).await?.context("stored project")?;
    Ok(serde_json::to_value(&project)?)
}

async fn stored_team(app: &TestApp, id: RecordId) -> Result<serde_json::Value> {
    let team = app.state.store.teams.get(id).await?.context("stored team")?;
    Ok(serde_json::to_value(&team)?)
}

fn project_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "A collaborative build",
        "tags": ["rust", "axum"],
        "link": "https://example.com",
    })
}

#[tokio::test]
async fn create_project_owner_is_first_member() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;

    let res = app.post("/api/projects", &owner.token, project_body("Forge")).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["owner"]["id"], owner.id.as_str());
    assert_eq!(ids(&res.body["members"]), vec![owner.id.clone()]);
    assert_eq!(res.body["status"], "Building");

    let missing = app.post("/api/projects", &owner.token, json!({ "title": "No description" })).await?;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert!(missing.body["field_errors"]["description"].is_string());

    let bad_status = app
        .post(
            "/api/projects",
            &owner.token,
            json!({ "title": "X", "description": "Y", "status": "Abandoned" }),
        )
        .await?;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
    assert!(bad_status.body["field_errors"]["status"].is_string());
    Ok(())
}

#[tokio::test]
async fn refused_update_leaves_record_untouched() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;
    let intruder = app.signup("Intruder").await?;
    let created = app.post("/api/projects", &owner.token, project_body("Forge")).await?;
    let raw_id = created.body["id"].as_str().context("project id")?.to_string();
    let id: RecordId = raw_id.parse()?;
    let uri = format!("/api/projects/{}", raw_id);

    let before = app.state.store.projects.get(id).await?.context("stored project")?;
    let before = serde_json::to_value(&before)?;

    let res = app.put(&uri, &intruder.token, json!({ "title": "Pwned", "status": "Live" })).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["message"], "Not authorized to update this project");

    let res = app.delete(&uri, &intruder.token).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let after = app.state.store.projects.get(id).await?.context("project survives")?;
    assert_eq!(serde_json::to_value(&after)?, before);
    Ok(())
}

#[tokio::test]
async fn merge_update_overwrites_only_supplied_fields() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;
    let created = app.post("/api/projects", &owner.token, project_body("Forge")).await?;
    let uri = format!("/api/projects/{}", created.body["id"].as_str().unwrap_or_default());

    let res = app
        .put(&uri, &owner.token, json!({ "title": "", "description": "Now shipping", "status": "Live" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "Forge");
    assert_eq!(res.body["description"], "Now shipping");
    assert_eq!(res.body["status"], "Live");
    assert_eq!(res.body["tags"], json!(["rust", "axum"]));
    assert_eq!(res.body["link"], "https://example.com");

    // A bad status refuses the whole update
    let res = app
        .put(&uri, &owner.token, json!({ "title": "Renamed", "status": "Dormant" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let listed = app.get("/api/projects", &owner.token).await?;
    assert_eq!(listed.body[0]["title"], "Forge");
    Ok(())
}

#[tokio::test]
async fn not_found_takes_precedence_over_forbidden() -> Result<()> {
    let app = TestApp::new();
    let user = app.signup("Someone").await?;
    let ghost = RecordId::new();

    for uri in [
        format!("/api/projects/{}", ghost),
        format!("/api/teams/{}", ghost),
        format!("/api/opportunities/{}", ghost),
    ] {
        let res = app.put(&uri, &user.token, json!({ "title": "x", "name": "x" })).await?;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "PUT {}", uri);
        let res = app.delete(&uri, &user.token).await?;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "DELETE {}", uri);
    }

    let res = app
        .post(&format!("/api/teams/{}/members", ghost), &user.token, json!({ "userId": user.id }))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Team not found");
    Ok(())
}

#[tokio::test]
async fn add_member_is_idempotent_and_owner_only() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;
    let dev = app.signup("Dev").await?;
    let created = app.post("/api/projects", &owner.token, project_body("Forge")).await?;
    let id: RecordId = created.body["id"].as_str().context("project id")?.parse()?;
    let members = format!("/api/projects/{}/members", id);

    let before = stored_project(&app, id).await?;
    let refused = app.post(&members, &dev.token, json!({ "userId": dev.id })).await?;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(refused.body["message"], "Not authorized to add members");
    assert_eq!(stored_project(&app, id).await?, before);

    let once = app.post(&members, &owner.token, json!({ "userId": dev.id })).await?;
    assert_eq!(once.status, StatusCode::OK);
    let twice = app.post(&members, &owner.token, json!({ "userId": dev.id })).await?;
    assert_eq!(ids(&twice.body["members"]), vec![owner.id.clone(), dev.id.clone()]);
    assert_eq!(once.body["members"], twice.body["members"]);

    let invalid = app.post(&members, &owner.token, json!({ "userId": "nope" })).await?;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    let absent = app.post(&members, &owner.token, json!({})).await?;
    assert_eq!(absent.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn remove_member_tolerates_non_members() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;
    let dev = app.signup("Dev").await?;
    let created = app.post("/api/projects", &owner.token, project_body("Forge")).await?;
    let id: RecordId = created.body["id"].as_str().context("project id")?.parse()?;
    let members = format!("/api/projects/{}/members", id);
    app.post(&members, &owner.token, json!({ "userId": dev.id })).await?;

    let before = stored_project(&app, id).await?;
    let refused = app.delete(&format!("{}/{}", members, owner.id), &dev.token).await?;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    let refused = app.delete(&format!("{}/{}", members, dev.id), &dev.token).await?;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(stored_project(&app, id).await?, before);

    let removed = app.delete(&format!("{}/{}", members, dev.id), &owner.token).await?;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(ids(&removed.body["members"]), vec![owner.id.clone()]);

    let again = app.delete(&format!("{}/{}", members, dev.id), &owner.token).await?;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(ids(&again.body["members"]), vec![owner.id.clone()]);

    let junk = app.delete(&format!("{}/not-a-user", members), &owner.token).await?;
    assert_eq!(junk.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn project_search_is_case_insensitive() -> Result<()> {
    let app = TestApp::new();
    let owner = app.signup("Owner").await?;
    app.post("/api/projects", &owner.token, json!({ "title": "Rust Forge", "description": "compiler tools" }))
        .await?;
    app.post(
        "/api/projects",
        &owner.token,
        json!({ "title": "Garden", "description": "plants", "tags": ["IoT"] }),
    )
    .await?;

    let res = app.get("/api/projects?search=forge", &owner.token).await?;
    assert_eq!(res.body.as_array().map(Vec::len), Some(1));
    assert_eq!(res.body[0]["title"], "Rust Forge");

    let res = app.get("/api/projects?search=iot", &owner.token).await?;
    assert_eq!(res.body[0]["title"], "Garden");

    let res = app.get("/api/projects", &owner.token).await?;
    assert_eq!(res.body.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn teams_follow_the_same_ownership_rules() -> Result<()> {
    let app = TestApp::new();
    let leader = app.signup("Leader").await?;
    let recruit = app.signup("Recruit").await?;

    let created = app
        .post("/api/teams", &leader.token, json!({ "name": "Night Owls", "lookingFor": ["Designer"] }))
        .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["leader"]["id"], leader.id.as_str());
    assert_eq!(created.body["rank"], "Unranked");
    assert_eq!(created.body["lookingFor"], json!(["Designer"]));
    let id: RecordId = created.body["id"].as_str().context("team id")?.parse()?;
    let uri = format!("/api/teams/{}", id);

    let before = stored_team(&app, id).await?;
    let refused = app.put(&uri, &recruit.token, json!({ "name": "Mine now" })).await?;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    let refused = app
        .post(&format!("{}/members", uri), &recruit.token, json!({ "userId": recruit.id }))
        .await?;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    let refused = app.delete(&format!("{}/members/{}", uri, leader.id), &recruit.token).await?;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(stored_team(&app, id).await?, before);

    let joined = app
        .post(&format!("{}/members", uri), &leader.token, json!({ "userId": recruit.id }))
        .await?;
    assert!(ids(&joined.body["members"]).contains(&recruit.id));

    let found = app.get("/api/teams?search=owls", &recruit.token).await?;
    assert_eq!(found.body.as_array().map(Vec::len), Some(1));

    let deleted = app.delete(&uri, &leader.token).await?;
    assert_eq!(deleted.body["message"], "Team deleted successfully");
    Ok(())
}
