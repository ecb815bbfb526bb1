//! Attachment downloads.
//!
//! Only the bytes are returned; where they end up is up to the caller.

use crate::executor::ApiRequest;
use crate::{Error, Result, Session};
use futures::future::try_join_all;
use tracing::{debug, instrument};

impl Session {
    /// Download one attachment given its `downloadUrl` (a path relative to the API base URL).
    ///
    /// # Errors
    /// - [`Error::AuthenticationMissing`] if the session is not authenticated
    /// - [`Error::AttachmentFetchFailed`] if the download fails
    pub async fn fetch_attachment_bytes(&self, download_url: &str) -> Result<Vec<u8>> {
        let token = self.require_token("fetch_attachment_bytes")?;

        self.client()
            .execute(&ApiRequest::get(download_url).bearer(token).binary())
            .await
            .map_err(|source| Error::AttachmentFetchFailed {
                download_url: download_url.to_string(),
                source: Box::new(source),
            })
    }

    /// Download every attachment of a message.
    ///
    /// Downloads run concurrently. The result has one buffer per attachment, in the
    /// order the message lists them.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgw_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgw_client::Error> {
    /// let mut session = Client::new()?.session();
    /// session.init().await?;
    /// let message = session.await_new_message(false).await?;
    /// for bytes in session.download_attachments_for_message(message.id()).await? {
    ///     println!("{} bytes", bytes.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "Session::download_attachments_for_message", skip(self))]
    pub async fn download_attachments_for_message(&self, message_id: &str) -> Result<Vec<Vec<u8>>> {
        self.require_token("download_attachments_for_message")?;

        let message = self.get_message_detail(message_id).await?;
        debug!(count = message.attachments.len(), "Downloading attachments");

        try_join_all(
            message
                .attachments
                .iter()
                .map(|attachment| self.fetch_attachment_bytes(&attachment.download_url)),
        )
        .await
    }
}
