//! Category endpoints, including contact-category associations.

use tracing::{debug, instrument};

use rolodex_core::Result;
use rolodex_core::contact::{Category, Contact};

use crate::client::ApiClient;
use crate::endpoints::{
    CATEGORIES, CategoryEnvelope, CategoryIdsRequest, CategoryListEnvelope, CategoryRequest,
    ContactEnvelope, ContactListEnvelope, category_contacts_path, category_path,
    contact_categories_path, contact_category_path,
};

impl ApiClient {
    /// Fetch all categories for the logged-in user.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        debug!("listing categories");
        let envelope: CategoryListEnvelope = self.get_json(CATEGORIES).await?;
        Ok(envelope.categories)
    }

    /// Create a category.
    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        debug!("creating category");
        let request = CategoryRequest { name };
        let envelope: CategoryEnvelope = self.post_json(CATEGORIES, &request).await?;
        Ok(envelope.category)
    }

    /// Rename a category.
    #[instrument(skip(self, name))]
    pub async fn update_category(&self, id: i64, name: &str) -> Result<Category> {
        debug!("updating category");
        let request = CategoryRequest { name };
        let envelope: CategoryEnvelope = self.put_json(&category_path(id), &request).await?;
        Ok(envelope.category)
    }

    /// Delete a category. Its contact associations go with it; the contacts
    /// themselves are untouched.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        debug!("deleting category");
        self.delete(&category_path(id)).await
    }

    /// Fetch the categories associated with a contact.
    #[instrument(skip(self))]
    pub async fn contact_categories(&self, contact_id: i64) -> Result<Vec<Category>> {
        debug!("listing contact categories");
        let envelope: CategoryListEnvelope =
            self.get_json(&contact_categories_path(contact_id)).await?;
        Ok(envelope.categories)
    }

    /// Replace a contact's categories with the given set, returning the
    /// updated contact.
    #[instrument(skip(self, category_ids))]
    pub async fn set_contact_categories(
        &self,
        contact_id: i64,
        category_ids: &[i64],
    ) -> Result<Contact> {
        debug!("replacing contact categories");
        let request = CategoryIdsRequest { category_ids };
        let envelope: ContactEnvelope = self
            .put_json(&contact_categories_path(contact_id), &request)
            .await?;
        Ok(envelope.contact)
    }

    /// Add categories to a contact, keeping its existing ones. Already
    /// associated categories are skipped, not errors.
    #[instrument(skip(self, category_ids))]
    pub async fn add_contact_categories(
        &self,
        contact_id: i64,
        category_ids: &[i64],
    ) -> Result<Contact> {
        debug!("adding contact categories");
        let request = CategoryIdsRequest { category_ids };
        let envelope: ContactEnvelope = self
            .post_json(&contact_categories_path(contact_id), &request)
            .await?;
        Ok(envelope.contact)
    }

    /// Remove one category from a contact.
    #[instrument(skip(self))]
    pub async fn remove_contact_category(&self, contact_id: i64, category_id: i64) -> Result<()> {
        debug!("removing contact category");
        self.delete(&contact_category_path(contact_id, category_id))
            .await
    }

    /// Fetch the contacts associated with a category.
    #[instrument(skip(self))]
    pub async fn contacts_in_category(&self, category_id: i64) -> Result<Vec<Contact>> {
        debug!("listing contacts in category");
        let envelope: ContactListEnvelope =
            self.get_json(&category_contacts_path(category_id)).await?;
        Ok(envelope.contacts)
    }
}
