//! Mailbox session: credentials, token, inbox listing and new-message polling.

use crate::executor::ApiRequest;
use crate::models::{Account, MessageDetail, MessageList, NewMessage, TokenResponse};
use crate::provision::choose_domain;
use crate::{Client, Error, Result};
use std::fmt;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, instrument, warn};

/// Where a session is in its lifecycle.
#[derive(Clone)]
enum State {
    Uninitialized,
    Provisioned(Account),
    Authenticated { account: Account, token: String },
}

/// A disposable mailbox on mail.gw.
///
/// # Lifecycle
///
/// 1. Create with [`Client::session`] or [`Session::new`] (uninitialized)
/// 2. Call [`init`](Self::init) to register an account and obtain a token
/// 3. Use [`await_new_message`](Self::await_new_message), [`list_messages`](Self::list_messages),
///    [`get_message_detail`](Self::get_message_detail) and the attachment helpers
///
/// Operations that need a token fail with [`Error::AuthenticationMissing`] before
/// sending anything if the session is not authenticated yet.
///
/// # Example
///
/// ```no_run
/// use mailgw_client::Client;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), mailgw_client::Error> {
/// let client = Client::new()?;
/// let mut session = client.session();
/// session.init().await?;
/// println!("Send something to {}", session.address().unwrap_or_default());
///
/// let message = session.await_new_message(true).await?;
/// println!("Got: {}", message.subject());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    client: Client,
    state: State,
}

impl Session {
    /// Create an uninitialized session.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: State::Uninitialized,
        }
    }

    /// Create a session for an account registered earlier.
    ///
    /// The session still needs [`refresh_auth`](Self::refresh_auth) before use.
    pub fn from_account(client: Client, account: Account) -> Self {
        Self {
            client,
            state: State::Provisioned(account),
        }
    }

    /// Register a fresh account on a random domain and authenticate it.
    ///
    /// On success the address, password and token are all set.
    #[instrument(name = "Session::init", skip(self))]
    pub async fn init(&mut self) -> Result<&mut Self> {
        let domains = self.client.list_domains().await?;
        let domain = choose_domain(&domains)?;
        let account = self.client.create_account(domain).await?;

        debug!(address = %account.address, "Session provisioned");
        self.state = State::Provisioned(account);

        self.refresh_auth().await?;
        Ok(self)
    }

    /// Exchange the account credentials for a new token, replacing any previous one.
    ///
    /// # Errors
    /// - [`Error::CredentialsMissing`] if the session has no account
    /// - [`Error::AuthenticationFailed`] if the token request fails
    #[instrument(name = "Session::refresh_auth", skip(self))]
    pub async fn refresh_auth(&mut self) -> Result<()> {
        let account = self
            .account()
            .cloned()
            .ok_or(Error::CredentialsMissing {
                operation: "refresh_auth",
            })?;

        let response: TokenResponse = self
            .client
            .execute_json(&ApiRequest::post("/token", &account))
            .await
            .map_err(|source| Error::AuthenticationFailed {
                address: account.address.clone(),
                source: Box::new(source),
            })?;

        debug!(address = %account.address, "Authenticated");
        self.state = State::Authenticated {
            account,
            token: response.token,
        };
        Ok(())
    }

    /// List the inbox.
    ///
    /// # Errors
    /// - [`Error::AuthenticationMissing`] if the session is not authenticated
    /// - [`Error::MessageListFailed`] if the request fails
    pub async fn list_messages(&self) -> Result<MessageList> {
        let token = self.require_token("list_messages")?;

        self.client
            .execute_json(&ApiRequest::get("/messages").bearer(token))
            .await
            .map_err(|source| Error::MessageListFailed {
                source: Box::new(source),
            })
    }

    /// Fetch a single message with its body and attachment list.
    ///
    /// # Errors
    /// - [`Error::AuthenticationMissing`] if the session is not authenticated
    /// - [`Error::MessageFetchFailed`] if the request fails
    pub async fn get_message_detail(&self, id: &str) -> Result<MessageDetail> {
        let token = self.require_token("get_message_detail")?;
        let path = format!("/messages/{id}");

        self.client
            .execute_json(&ApiRequest::get(&path).bearer(token))
            .await
            .map_err(|source| Error::MessageFetchFailed {
                id: id.to_string(),
                source: Box::new(source),
            })
    }

    /// Wait until the inbox count grows, then return the newest message.
    ///
    /// The inbox is re-listed every poll interval until its total exceeds the count
    /// seen on entry. The first entry of that listing is returned as is, or resolved
    /// to the full message when `want_detail` is `true`. If several messages arrive
    /// between two polls only the first listed one is returned.
    ///
    /// Note that `want_detail = true` is the path that sends `GET /messages/{id}`;
    /// `false` never fetches the message body.
    ///
    /// Each poll is cut off at the deadline, so a stalled listing request ends the
    /// wait with [`Error::NewMessageTimeout`] instead of blocking past it.
    ///
    /// # Errors
    /// - [`Error::AuthenticationMissing`] if the session is not authenticated
    /// - [`Error::NewMessageTimeout`] if nothing arrives before the poll timeout
    /// - any listing or fetch failure, unchanged
    #[instrument(name = "Session::await_new_message", skip(self))]
    pub async fn await_new_message(&self, want_detail: bool) -> Result<NewMessage> {
        self.require_token("await_new_message")?;

        let initial = self.list_messages().await?.total_items;
        let interval = self.client.poll_interval;
        let timeout = self.client.poll_timeout;
        let started = Instant::now();
        let deadline = started + timeout;

        debug!(initial, ?interval, ?timeout, "Waiting for new message");

        while Instant::now() < deadline {
            tokio::time::sleep(interval).await;

            let Ok(list) = timeout_at(deadline, self.list_messages()).await else {
                debug!("Poll cut off at deadline");
                break;
            };
            let list = list?;
            if list.total_items <= initial {
                continue;
            }

            let Some(newest) = list.member.into_iter().next() else {
                warn!(
                    total_items = list.total_items,
                    "Inbox count grew but listing was empty"
                );
                continue;
            };

            debug!(id = %newest.id, elapsed = ?started.elapsed(), "New message arrived");
            return if want_detail {
                self.get_message_detail(&newest.id)
                    .await
                    .map(NewMessage::Detail)
            } else {
                Ok(NewMessage::Summary(newest))
            };
        }

        Err(Error::NewMessageTimeout { timeout })
    }

    /// The client this session sends requests through.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Credentials, once provisioned.
    pub fn account(&self) -> Option<&Account> {
        match &self.state {
            State::Uninitialized => None,
            State::Provisioned(account) | State::Authenticated { account, .. } => Some(account),
        }
    }

    /// Mailbox address, once provisioned.
    pub fn address(&self) -> Option<&str> {
        self.account().map(|account| account.address.as_str())
    }

    /// Mailbox password, once provisioned.
    pub fn password(&self) -> Option<&str> {
        self.account().map(|account| account.password.as_str())
    }

    /// Bearer token, once authenticated.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            State::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Whether a token has been obtained.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub(crate) fn require_token(&self, operation: &'static str) -> Result<&str> {
        self.token()
            .ok_or(Error::AuthenticationMissing { operation })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Uninitialized => "uninitialized",
            State::Provisioned(_) => "provisioned",
            State::Authenticated { .. } => "authenticated",
        };
        f.debug_struct("Session")
            .field("base_url", &self.client.base_url())
            .field("address", &self.address())
            .field("state", &state)
            .finish_non_exhaustive()
    }
}
