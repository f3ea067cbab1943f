mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

fn opportunity(title: &str, kind: &str) -> serde_json::Value {
    json!({
        "title": title,
        "company": "Acme",
        "type": kind,
        "description": "Ship things",
    })
}

#[tokio::test]
async fn create_defaults_location_and_expands_poster() -> Result<()> {
    let app = TestApp::new();
    let poster = app.signup("Recruiter").await?;

    let res = app.post("/api/opportunities", &poster.token, opportunity("Backend Dev", "Job")).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["type"], "Job");
    assert_eq!(res.body["location"], "Remote");
    assert_eq!(res.body["poster"]["name"], "Recruiter");
    Ok(())
}

#[tokio::test]
async fn unknown_type_is_a_validation_error() -> Result<()> {
    let app = TestApp::new();
    let poster = app.signup("Recruiter").await?;

    let res = app.post("/api/opportunities", &poster.token, opportunity("Helper", "Volunteer")).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["field_errors"]["type"].is_string());

    let listed = app.get("/api/opportunities", &poster.token).await?;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(0));

    let created = app.post("/api/opportunities", &poster.token, opportunity("Intern", "Internship")).await?;
    let uri = format!("/api/opportunities/{}", created.body["id"].as_str().unwrap_or_default());
    let res = app.put(&uri, &poster.token, json!({ "type": "Volunteer" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_filters_by_exact_type() -> Result<()> {
    let app = TestApp::new();
    let poster = app.signup("Recruiter").await?;
    app.post("/api/opportunities", &poster.token, opportunity("A", "Job")).await?;
    app.post("/api/opportunities", &poster.token, opportunity("B", "Hackathon")).await?;
    app.post("/api/opportunities", &poster.token, opportunity("C", "Job")).await?;

    let jobs = app.get("/api/opportunities?type=Job", &poster.token).await?;
    assert_eq!(jobs.body.as_array().map(Vec::len), Some(2));
    assert_eq!(jobs.body[0]["title"], "C");

    let none = app.get("/api/opportunities?type=Volunteer", &poster.token).await?;
    assert_eq!(none.body.as_array().map(Vec::len), Some(0));

    let all = app.get("/api/opportunities", &poster.token).await?;
    assert_eq!(all.body.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn only_the_poster_may_change_an_opportunity() -> Result<()> {
    let app = TestApp::new();
    let poster = app.signup("Recruiter").await?;
    let other = app.signup("Other").await?;
    let created = app.post("/api/opportunities", &poster.token, opportunity("Gig", "Freelance")).await?;
    let uri = format!("/api/opportunities/{}", created.body["id"].as_str().unwrap_or_default());

    let refused = app.put(&uri, &other.token, json!({ "title": "Mine" })).await?;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(refused.body["message"], "Not authorized to update this opportunity");

    let updated = app.put(&uri, &poster.token, json!({ "location": "Berlin", "title": "" })).await?;
    assert_eq!(updated.body["location"], "Berlin");
    assert_eq!(updated.body["title"], "Gig");

    let deleted = app.delete(&uri, &poster.token).await?;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["id"], created.body["id"]);
    Ok(())
}
