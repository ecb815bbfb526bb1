//! Error types for mail.gw operations.

use reqwest::Method;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the mail.gw API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying HTTP client could not be constructed (bad proxy URL, TLS backend, ...).
    #[error("failed to build HTTP client")]
    Client(#[from] reqwest::Error),

    /// The service kept answering `429 Too Many Requests` past the retry ceiling.
    #[error("rate limited for {elapsed:?} across {attempts} attempts, giving up")]
    RateLimitExceeded {
        /// Time spent since the first attempt.
        elapsed: Duration,
        /// Number of requests sent.
        attempts: u32,
    },

    /// Any non-2xx status other than 429, or a transport failure.
    #[error("unexpected response for {method} {url}")]
    UnexpectedResponse {
        /// HTTP method of the failing request.
        method: Method,
        /// Absolute URL of the failing request.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not have the expected JSON shape.
    #[error("failed to parse response from {url}")]
    ResponseParse {
        /// Absolute URL of the request.
        url: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The domain listing came back empty.
    #[error("no domains available")]
    NoDomainsAvailable,

    /// An entry of the domain listing is not a valid domain object.
    #[error("domain entry {index} is malformed")]
    MalformedDomain {
        /// Position of the entry within `hydra:member`.
        index: usize,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Registering the account failed.
    #[error("failed to create account {address}")]
    AccountCreationFailed {
        /// The address that was being registered.
        address: String,
        #[source]
        source: Box<Error>,
    },

    /// Exchanging credentials for a token failed.
    #[error("failed to authenticate {address}")]
    AuthenticationFailed {
        /// The address that was being authenticated.
        address: String,
        #[source]
        source: Box<Error>,
    },

    /// An authenticated operation was called before the session obtained a token.
    #[error("{operation} requires an authenticated session, call init() or refresh_auth() first")]
    AuthenticationMissing {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// An operation needing credentials was called before the session had an account.
    #[error("{operation} requires account credentials, call init() first")]
    CredentialsMissing {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// Listing messages failed.
    #[error("failed to list messages")]
    MessageListFailed {
        #[source]
        source: Box<Error>,
    },

    /// Fetching a single message failed.
    #[error("failed to fetch message {id}")]
    MessageFetchFailed {
        /// The requested message id.
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Downloading an attachment failed.
    #[error("failed to download attachment {download_url}")]
    AttachmentFetchFailed {
        /// The attachment's download path.
        download_url: String,
        #[source]
        source: Box<Error>,
    },

    /// No new message arrived before the poll deadline.
    #[error("no new message received within {timeout:?}")]
    NewMessageTimeout {
        /// The poll deadline that elapsed.
        timeout: Duration,
    },
}

impl Error {
    /// Returns `true` if this error, or any error it wraps, is a rate limit give-up.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Error::RateLimitExceeded { .. } => true,
            Error::AccountCreationFailed { source, .. }
            | Error::AuthenticationFailed { source, .. }
            | Error::MessageListFailed { source }
            | Error::MessageFetchFailed { source, .. }
            | Error::AttachmentFetchFailed { source, .. } => source.is_rate_limited(),
            _ => false,
        }
    }

    /// The HTTP status of the failing response, if the failure carries one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::UnexpectedResponse { source, .. } => source.status(),
            Error::AccountCreationFailed { source, .. }
            | Error::AuthenticationFailed { source, .. }
            | Error::MessageListFailed { source }
            | Error::MessageFetchFailed { source, .. }
            | Error::AttachmentFetchFailed { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_seen_through_wrappers() {
        let err = Error::MessageListFailed {
            source: Box::new(Error::RateLimitExceeded {
                elapsed: Duration::from_secs(31),
                attempts: 31,
            }),
        };
        assert!(err.is_rate_limited());
        assert!(!Error::NoDomainsAvailable.is_rate_limited());
    }

    #[test]
    fn precondition_errors_name_the_operation() {
        let err = Error::AuthenticationMissing {
            operation: "list_messages",
        };
        assert!(err.to_string().starts_with("list_messages requires"));
        assert_eq!(err.status(), None);
    }
}
