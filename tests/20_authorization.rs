mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{organization_row, spawn_server, token, ScriptedExecutor};

fn new_org() -> Value {
    json!({"handle": "acme", "name": "Acme", "description": "Anvils"})
}

#[tokio::test]
async fn anonymous_write_is_unauthenticated() -> Result<()> {
    let db = ScriptedExecutor::new();
    let server = spawn_server(db.clone()).await?;

    let res = server.client.post(server.url("/organizations")).json(&new_org()).send().await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(db.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn bad_token_counts_as_anonymous() -> Result<()> {
    let server = spawn_server(ScriptedExecutor::new()).await?;

    let res = server
        .client
        .get(server.url("/users"))
        .bearer_auth("not-a-token")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn regular_user_cannot_create_organization() -> Result<()> {
    let db = ScriptedExecutor::new();
    let server = spawn_server(db.clone()).await?;

    let res = server
        .client
        .post(server.url("/organizations"))
        .bearer_auth(token("jane", false))
        .json(&new_org())
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(db.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn admin_creates_organization() -> Result<()> {
    let db = ScriptedExecutor::new();
    db.respond(vec![]).respond(vec![organization_row("acme", "Acme")]);
    let server = spawn_server(db.clone()).await?;

    let res = server
        .client
        .post(server.url("/organizations"))
        .bearer_auth(token("root", true))
        .json(&new_org())
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["handle"], "acme");
    assert_eq!(db.calls().len(), 2);
    Ok(())
}

#[tokio::test]
async fn public_reads_need_no_token() -> Result<()> {
    let db = ScriptedExecutor::new();
    db.respond(vec![organization_row("acme", "Acme")]);
    let server = spawn_server(db).await?;

    let res = server.client.get(server.url("/organizations")).send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn applications_are_self_scoped() -> Result<()> {
    let db = ScriptedExecutor::new();
    db.respond(vec![json!({
        "username": "jane",
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@example.com",
        "isAdmin": false
    })])
    .respond(vec![json!({"postingId": 7})]);
    let server = spawn_server(db).await?;

    let own = server
        .client
        .get(server.url("/applications/jane"))
        .bearer_auth(token("jane", false))
        .send()
        .await?;
    assert_eq!(own.status(), StatusCode::OK);
    assert_eq!(own.json::<Value>().await?["data"], json!([7]));

    let other = server
        .client
        .get(server.url("/applications/jane"))
        .bearer_auth(token("bob", false))
        .send()
        .await?;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn posting_writes_are_forbidden_to_regular_users() -> Result<()> {
    let server = spawn_server(ScriptedExecutor::new()).await?;

    let res = server
        .client
        .delete(server.url("/postings/3"))
        .bearer_auth(token("jane", false))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn user_routes_are_admin_only_even_for_self() -> Result<()> {
    let server = spawn_server(ScriptedExecutor::new()).await?;

    let res = server
        .client
        .get(server.url("/users/jane"))
        .bearer_auth(token("jane", false))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_cannot_read_another_users_applications() -> Result<()> {
    let db = ScriptedExecutor::new();
    let server = spawn_server(db.clone()).await?;

    let res = server
        .client
        .get(server.url("/applications/jane"))
        .bearer_auth(token("root", true))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(db.calls().is_empty());
    Ok(())
}
