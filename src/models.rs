//! Data models for the mail.gw API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope used by the API for listable resources.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct HydraCollection<T> {
    /// Items on the returned page. A missing key reads as no items.
    #[serde(rename = "hydra:member", default)]
    pub member: Vec<T>,
    /// Total number of items the server knows about.
    #[serde(rename = "hydra:totalItems", default)]
    pub total_items: u64,
}

/// Result of listing the inbox.
pub type MessageList = HydraCollection<MessageSummary>;

/// A mail domain accounts can be registered under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub domain: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_private: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Credentials of a registered mailbox.
///
/// Serializes to the `{ address, password }` body expected by `/accounts` and `/token`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Full address, `local@domain`.
    pub address: String,
    pub password: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Sender or recipient of a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Participant {
    pub address: String,
    #[serde(default)]
    pub name: String,
}

/// Message metadata as returned by the inbox listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    /// Resource IRI, e.g. `/messages/{id}`.
    #[serde(rename = "@id", default)]
    pub iri: String,
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub msgid: String,
    pub from: Participant,
    #[serde(default)]
    pub to: Vec<Participant>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub seen: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub has_attachments: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Full message as returned by `GET /messages/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDetail {
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub msgid: String,
    pub from: Participant,
    #[serde(default)]
    pub to: Vec<Participant>,
    #[serde(default)]
    pub cc: Vec<Participant>,
    #[serde(default)]
    pub bcc: Vec<Participant>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub seen: bool,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub verifications: Vec<String>,
    #[serde(default)]
    pub retention: bool,
    #[serde(default)]
    pub retention_date: Option<String>,
    /// Plain text body.
    #[serde(default)]
    pub text: String,
    /// HTML body parts.
    #[serde(default)]
    pub html: Vec<String>,
    #[serde(default)]
    pub has_attachments: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Reference to an attachment stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub disposition: String,
    #[serde(default)]
    pub transfer_encoding: String,
    #[serde(default)]
    pub related: bool,
    #[serde(default)]
    pub size: u64,
    /// Path relative to the API base URL, starting with `/`.
    pub download_url: String,
}

/// A message detected by [`Session::await_new_message`](crate::Session::await_new_message).
#[derive(Debug, Clone)]
pub enum NewMessage {
    /// The listing entry, returned when no detail was requested.
    Summary(MessageSummary),
    /// The full message.
    Detail(MessageDetail),
}

impl NewMessage {
    /// Id of the message, whichever form was returned.
    pub fn id(&self) -> &str {
        match self {
            NewMessage::Summary(summary) => &summary.id,
            NewMessage::Detail(detail) => &detail.id,
        }
    }

    /// Subject of the message.
    pub fn subject(&self) -> &str {
        match self {
            NewMessage::Summary(summary) => &summary.subject,
            NewMessage::Detail(detail) => &detail.subject,
        }
    }

    /// Returns the full message if it was fetched.
    pub fn into_detail(self) -> Option<MessageDetail> {
        match self {
            NewMessage::Detail(detail) => Some(detail),
            NewMessage::Summary(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_list_reads_hydra_envelope() {
        let list: MessageList = serde_json::from_value(json!({
            "hydra:totalItems": 1,
            "hydra:member": [{
                "@id": "/messages/abc",
                "id": "abc",
                "from": { "address": "noreply@example.com", "name": "Example" },
                "to": [{ "address": "me@mail.gw", "name": "" }],
                "subject": "Verify your account",
                "hasAttachments": false
            }]
        }))
        .unwrap();

        assert_eq!(list.total_items, 1);
        assert_eq!(list.member[0].iri, "/messages/abc");
        assert_eq!(list.member[0].from.name, "Example");
        assert!(!list.member[0].seen);
    }

    #[test]
    fn missing_member_key_reads_as_empty() {
        let list: HydraCollection<Domain> =
            serde_json::from_value(json!({ "hydra:totalItems": 0 })).unwrap();
        assert!(list.member.is_empty());
    }

    #[test]
    fn account_debug_hides_password() {
        let account = Account {
            address: "someone@mail.gw".into(),
            password: "hunter2".into(),
        };
        let debug = format!("{account:?}");
        assert!(debug.contains("someone@mail.gw"));
        assert!(!debug.contains("hunter2"));
    }
}
