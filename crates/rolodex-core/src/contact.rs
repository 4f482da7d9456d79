//! Contact record types.
//!
//! These mirror the backend's contact representation. Dates travel as
//! opaque strings; formatting and validation are the UI's concern.

use serde::{Deserialize, Serialize};

/// A contact as returned by the backend.
///
/// The same shape is used for create and update payloads; `id` is absent
/// for a contact that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_contact_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_contact_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<ContactEmail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<ContactPhone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<ContactAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ContactLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
}

impl Contact {
    /// Create a contact with just a first name.
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..Self::default()
        }
    }

    /// Returns the name to display for this contact.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// A labelled email address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactEmail {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A labelled phone number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPhone {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A labelled postal address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_and_nr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A labelled web link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A contact category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_contact() {
        let contact: Contact = serde_json::from_str(r#"{"id":7,"first_name":"Mara"}"#).unwrap();
        assert_eq!(contact.id, Some(7));
        assert_eq!(contact.display_name(), "Mara");
        assert!(contact.emails.is_empty());
        assert!(!contact.is_favorite);
    }

    #[test]
    fn create_payload_omits_unset_fields() {
        let contact = Contact::new("Mara");
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["first_name"], "Mara");
        assert!(json.get("id").is_none());
        assert!(json.get("emails").is_none());
    }

    #[test]
    fn round_trips_multi_field_records() {
        let contact: Contact = serde_json::from_str(
            r#"{
                "first_name": "Mara",
                "last_name": "Ilic",
                "is_favorite": true,
                "emails": [{"email": "mara@example.com", "title": "work"}],
                "phones": [{"phone": "+4915112345678"}],
                "categories": [{"id": 2, "name": "friends"}]
            }"#,
        )
        .unwrap();
        assert_eq!(contact.display_name(), "Mara Ilic");
        assert_eq!(contact.emails[0].email, "mara@example.com");
        assert_eq!(contact.categories[0].name, "friends");
    }
}
