//! Contact CRUD endpoints.
//!
//! Every call goes through the authenticated request path; no client-side
//! validation happens here.

use tracing::{debug, instrument};

use rolodex_core::Result;
use rolodex_core::contact::Contact;

use crate::client::ApiClient;
use crate::endpoints::{
    BulkDeleteRequest, BulkDeleteResponse, CONTACTS, CONTACTS_BULK_DELETE, CONTACTS_FAVORITES,
    ContactEnvelope, ContactListEnvelope, FavoritesEnvelope, contact_path, favorite_path,
};

impl ApiClient {
    /// Fetch all contacts for the logged-in user.
    #[instrument(skip(self))]
    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        debug!("listing contacts");
        let envelope: ContactListEnvelope = self.get_json(CONTACTS).await?;
        Ok(envelope.contacts)
    }

    /// Fetch a single contact by id.
    #[instrument(skip(self))]
    pub async fn get_contact(&self, id: i64) -> Result<Contact> {
        debug!("getting contact");
        let envelope: ContactEnvelope = self.get_json(&contact_path(id)).await?;
        Ok(envelope.contact)
    }

    /// Create a contact.
    #[instrument(skip_all)]
    pub async fn create_contact(&self, contact: &Contact) -> Result<Contact> {
        debug!("creating contact");
        let envelope: ContactEnvelope = self.post_json(CONTACTS, contact).await?;
        Ok(envelope.contact)
    }

    /// Update a contact, replacing all fields including the multi-value
    /// records (emails, phones, addresses, links, categories).
    #[instrument(skip(self, contact))]
    pub async fn update_contact(&self, id: i64, contact: &Contact) -> Result<Contact> {
        debug!("updating contact");
        let envelope: ContactEnvelope = self.put_json(&contact_path(id), contact).await?;
        Ok(envelope.contact)
    }

    /// Delete a contact by id.
    #[instrument(skip(self))]
    pub async fn delete_contact(&self, id: i64) -> Result<()> {
        debug!("deleting contact");
        self.delete(&contact_path(id)).await
    }

    /// Delete several contacts in one call, returning how many were removed.
    ///
    /// Ids that do not belong to the user are skipped, not errors, so the
    /// count may be lower than the number of ids sent.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn delete_contacts(&self, ids: &[i64]) -> Result<u64> {
        debug!("bulk deleting contacts");
        let request = BulkDeleteRequest { contact_ids: ids };
        let response: BulkDeleteResponse =
            self.delete_json(CONTACTS_BULK_DELETE, &request).await?;
        Ok(response.deleted_count)
    }

    /// Fetch the contacts marked as favorites.
    #[instrument(skip(self))]
    pub async fn list_favorites(&self) -> Result<Vec<Contact>> {
        debug!("listing favorites");
        let envelope: FavoritesEnvelope = self.get_json(CONTACTS_FAVORITES).await?;
        Ok(envelope.favorites)
    }

    /// Flip a contact's favorite flag, returning the updated contact.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: i64) -> Result<Contact> {
        debug!("toggling favorite");
        let envelope: ContactEnvelope = self.post_empty_json(&favorite_path(id)).await?;
        Ok(envelope.contact)
    }
}
