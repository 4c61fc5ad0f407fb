//! Identities and request bodies shared by the tests

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::{assert_json, TestServer};

pub const ALICE: &str = "alice@example.com";
pub const BOB: &str = "bob@example.com";
pub const ADMIN: &str = discover_common::DEFAULT_ADMIN_EMAIL;

pub fn block_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": format!("About {title}"),
        "link": "https://example.com/",
    })
}

/// Create a block as `token`'s owner and return its id
pub async fn create_block(server: &TestServer, token: &str, title: &str) -> Result<String> {
    let response = server
        .post("/api/v1/blocks", Some(token), &block_body(title))
        .await?;
    let block: Value = assert_json(response, StatusCode::CREATED).await?;
    block["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("block id missing: {block}"))
}
