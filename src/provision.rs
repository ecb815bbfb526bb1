//! Domain listing and account registration.

use crate::executor::ApiRequest;
use crate::models::{Account, Domain, HydraCollection};
use crate::{Client, Error, Result};
use rand::Rng;
use rand::distr::Alphabetic;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

const LOCAL_PART_LEN: usize = 20;
const PASSWORD_LEN: usize = 20;

impl Client {
    /// List the domains accounts can currently be created under.
    ///
    /// The service exposes a single page of domains, so no pagination is done.
    ///
    /// # Errors
    /// - [`Error::NoDomainsAvailable`] if the listing is empty
    /// - [`Error::MalformedDomain`] if any entry is not a valid domain object
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgw_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgw_client::Error> {
    /// let client = Client::new()?;
    /// for domain in client.list_domains().await? {
    ///     println!("{}", domain.domain);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "Client::list_domains", skip(self))]
    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        let listing: HydraCollection<serde_json::Value> =
            self.execute_json(&ApiRequest::get("/domains")).await?;

        if listing.member.is_empty() {
            return Err(Error::NoDomainsAvailable);
        }

        let domains = listing
            .member
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Domain>(item)
                    .map_err(|source| Error::MalformedDomain { index, source })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = domains.len(), "Fetched domains");
        Ok(domains)
    }

    /// Register a new account with random credentials under `domain`.
    ///
    /// # Errors
    /// Any failure is returned as [`Error::AccountCreationFailed`] wrapping the cause.
    #[instrument(name = "Client::create_account", skip(self), fields(domain = %domain.domain))]
    pub async fn create_account(&self, domain: &Domain) -> Result<Account> {
        let account = random_account(&domain.domain);

        self.execute(&ApiRequest::post("/accounts", &account))
            .await
            .map_err(|source| Error::AccountCreationFailed {
                address: account.address.clone(),
                source: Box::new(source),
            })?;

        debug!(address = %account.address, "Account created");
        Ok(account)
    }

    /// List domains, pick one uniformly at random and register an account under it.
    pub async fn create_random_account(&self) -> Result<Account> {
        let domains = self.list_domains().await?;
        let domain = choose_domain(&domains)?;
        self.create_account(domain).await
    }
}

/// Pick a domain uniformly at random.
pub(crate) fn choose_domain(domains: &[Domain]) -> Result<&Domain> {
    domains
        .choose(&mut rand::rng())
        .ok_or(Error::NoDomainsAvailable)
}

fn random_account(domain: &str) -> Account {
    let local_part = random_letters(LOCAL_PART_LEN).to_ascii_lowercase();
    Account {
        address: format!("{local_part}@{domain}"),
        password: random_letters(PASSWORD_LEN),
    }
}

/// `len` random ASCII letters, mixed case.
fn random_letters(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphabetic)
        .take(len)
        .map(char::from)
        .collect()
}
