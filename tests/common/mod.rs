#![allow(dead_code)]

use httpmock::Mock;
use httpmock::prelude::*;
use mailgw_client::{Account, Client, ClientBuilder, Session};
use serde_json::{Value, json};
use std::time::Duration;

pub const TOKEN: &str = "test-token";

pub fn builder(server: &MockServer) -> ClientBuilder {
    Client::builder()
        .base_url(server.base_url())
        .rate_limit_retry_interval(Duration::from_millis(50))
        .rate_limit_ceiling(Duration::from_secs(2))
}

pub fn client(server: &MockServer) -> Client {
    builder(server).build().unwrap()
}

pub fn account() -> Account {
    Account {
        address: "abcdefghijklmnopqrst@mail.gw".into(),
        password: "AbCdEfGhIjKlMnOpQrSt".into(),
    }
}

/// Session for [`account`] authenticated against `server`.
pub async fn authenticated(server: &MockServer, client: Client) -> Session {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200).json_body(json!({ "id": "acc-1", "token": TOKEN }));
        })
        .await;

    let mut session = Session::from_account(client, account());
    session.refresh_auth().await.unwrap();
    session
}

pub fn summary(id: &str) -> Value {
    json!({
        "@id": format!("/messages/{id}"),
        "@type": "Message",
        "id": id,
        "accountId": "/accounts/acc-1",
        "msgid": format!("<{id}@example.com>"),
        "from": { "address": "noreply@example.com", "name": "Example" },
        "to": [{ "address": "abcdefghijklmnopqrst@mail.gw", "name": "" }],
        "subject": format!("Subject {id}"),
        "intro": "Your code is 123456",
        "seen": false,
        "isDeleted": false,
        "hasAttachments": false,
        "size": 1024,
        "downloadUrl": format!("/messages/{id}/download"),
        "createdAt": "2024-01-01T00:00:00+00:00",
        "updatedAt": "2024-01-01T00:00:00+00:00"
    })
}

pub fn message_list(total: u64, ids: &[&str]) -> Value {
    let members: Vec<Value> = ids.iter().map(|id| summary(id)).collect();
    json!({
        "@context": "/contexts/Message",
        "@id": "/messages",
        "@type": "hydra:Collection",
        "hydra:totalItems": total,
        "hydra:member": members
    })
}

pub fn detail(id: &str, attachments: &[(&str, &str)]) -> Value {
    let has_attachments = !attachments.is_empty();
    let attachments: Vec<Value> = attachments
        .iter()
        .map(|(att_id, url)| {
            json!({
                "id": att_id,
                "filename": format!("{att_id}.bin"),
                "contentType": "application/octet-stream",
                "disposition": "attachment",
                "transferEncoding": "base64",
                "related": false,
                "size": 3,
                "downloadUrl": url
            })
        })
        .collect();

    json!({
        "@context": "/contexts/Message",
        "@id": format!("/messages/{id}"),
        "@type": "Message",
        "id": id,
        "accountId": "/accounts/acc-1",
        "msgid": format!("<{id}@example.com>"),
        "from": { "address": "noreply@example.com", "name": "Example" },
        "to": [{ "address": "abcdefghijklmnopqrst@mail.gw", "name": "" }],
        "cc": [],
        "bcc": [],
        "subject": format!("Subject {id}"),
        "seen": false,
        "flagged": false,
        "isDeleted": false,
        "verifications": [],
        "retention": true,
        "retentionDate": "2024-01-08T00:00:00+00:00",
        "text": "Your code is 123456",
        "html": ["<p>Your code is 123456</p>"],
        "hasAttachments": has_attachments,
        "attachments": attachments,
        "size": 2048,
        "downloadUrl": format!("/messages/{id}/download"),
        "createdAt": "2024-01-01T00:00:00+00:00",
        "updatedAt": "2024-01-01T00:00:00+00:00"
    })
}

/// Wait until `mock` has served `hits` requests, then remove it so later
/// requests fall through to mocks registered after it.
pub async fn delete_after_hits(mock: &Mock<'_>, hits: usize) {
    while mock.hits_async().await < hits {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    mock.delete_async().await;
}
