mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{posting_row, spawn_server, token, ScriptedExecutor};

#[tokio::test]
async fn has_equity_adds_predicate_without_binding() -> Result<()> {
    let db = ScriptedExecutor::new();
    db.respond(vec![posting_row(1, "Engineer")]);
    let server = spawn_server(db.clone()).await?;

    let res = server
        .client
        .get(server.url("/postings?hasEquity=true&minSalary=50000"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"][0]["equity"], json!(0.1));
    let (sql, params) = &db.calls()[0];
    assert!(sql.contains("WHERE \"salary\" >= $1 AND \"equity\" > 0 ORDER BY title"), "{}", sql);
    assert_eq!(params, &vec![json!(50000)]);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() -> Result<()> {
    let db = ScriptedExecutor::new();
    let server = spawn_server(db.clone()).await?;

    let res = server.client.get(server.url("/postings/abc")).send().await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(db.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn get_returns_posting() -> Result<()> {
    let db = ScriptedExecutor::new();
    db.respond(vec![posting_row(4, "Engineer")]);
    let server = spawn_server(db.clone()).await?;

    let res = server.client.get(server.url("/postings/4")).send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["organizationHandle"], "acme");
    assert_eq!(db.calls()[0].1, vec![json!(4)]);
    Ok(())
}

#[tokio::test]
async fn mutations_have_no_username_segment_so_even_admins_are_forbidden() -> Result<()> {
    let db = ScriptedExecutor::new();
    let server = spawn_server(db.clone()).await?;
    let admin = token("root", true);

    let create = server
        .client
        .post(server.url("/postings"))
        .bearer_auth(&admin)
        .json(&json!({"title": "Engineer", "organizationHandle": "acme"}))
        .send()
        .await?;
    let update = server
        .client
        .patch(server.url("/postings/4"))
        .bearer_auth(&admin)
        .json(&json!({"title": "Updated Job"}))
        .send()
        .await?;
    let delete = server
        .client
        .delete(server.url("/postings/4"))
        .bearer_auth(&admin)
        .send()
        .await?;

    for res in [create, update, delete] {
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.json::<Value>().await?["code"], "FORBIDDEN");
    }
    assert!(db.calls().is_empty());
    Ok(())
}
