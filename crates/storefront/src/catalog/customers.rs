//! Customer lookups.

use tracing::instrument;

use super::{Catalog, queries};
use crate::sanity::types::Customer;
use crate::sanity::{ContentStore, SanityError};

impl<S: ContentStore> Catalog<S> {
    /// Find the customer with this email.
    ///
    /// Matching is exact, so the address is bound as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self, email))]
    pub async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, SanityError> {
        self.fetch_one(&queries::customer_by_email(email)).await
    }

    /// Find the customer linked to a Stripe customer id.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self))]
    pub async fn customer_by_stripe_id(
        &self,
        stripe_customer_id: &str,
    ) -> Result<Option<Customer>, SanityError> {
        self.fetch_one(&queries::customer_by_stripe_id(stripe_customer_id))
            .await
    }
}
