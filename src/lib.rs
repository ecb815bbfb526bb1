//! # mail.gw Client
//! Asynchronous wrapper around the mail.gw disposable email HTTP API: provision a throwaway
//! account, authenticate, and wait for inbound mail using [`Client`] and [`Session`].
//!
//! ## Audience and uses
//! For Rust developers who need a throwaway mailbox in integration tests or automation
//! (e.g. account verification flows): configure with [`ClientBuilder`], call
//! [`Session::init`], then block on [`Session::await_new_message`] until mail arrives.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`.
//!
//! ## Rate limiting
//! Every request is retried while the service answers `429 Too Many Requests`, once per
//! second by default, for up to 30 seconds before failing with [`Error::RateLimitExceeded`].
//! Any other failure is returned immediately.
//!
//! ## Out of scope
//! Not a general-purpose mail client. Accounts live only as long as the process keeps
//! them, there is no mailbox management, and attachments are returned as bytes only.
//!
//! ## Logging
//! Operations emit `tracing` spans and events. Install a subscriber to see them.
//!
//! ## Example
//! ```no_run
//! use mailgw_client::{Client, NewMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailgw_client::Error> {
//!     let client = Client::new()?;
//!     let mut session = client.session();
//!     session.init().await?;
//!     println!("Created: {}", session.address().unwrap_or_default());
//!
//!     if let NewMessage::Detail(message) = session.await_new_message(true).await? {
//!         println!("From: {}, Subject: {}", message.from.address, message.subject);
//!         println!("{}", message.text);
//!     }
//!     Ok(())
//! }
//! ```

mod attachments;
mod client;
mod error;
mod executor;
mod models;
mod provision;
mod session;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::{
    Account, Attachment, Domain, HydraCollection, MessageDetail, MessageList, MessageSummary,
    NewMessage, Participant,
};
pub use session::Session;

/// Result type alias for mail.gw operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
