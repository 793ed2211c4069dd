//! Contact record model.
//!
//! # Invariants
//! - `id` is generated once (UUID v4) and never reassigned.
//! - Updates replace every other field wholesale.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable key of a contact record, stored as its hyphenated string form.
pub type ContactId = Uuid;

/// One persisted contact. No field carries format validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    /// Creates a contact with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, email, phone)
    }

    /// Creates a contact under a caller-provided id.
    ///
    /// Used by the update path, where identity was captured at edit start.
    pub fn with_id(
        id: ContactId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// Input state of the contact form, shared by add and edit modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Copies a contact's fields into the form for editing.
    pub fn from_contact(contact: &Contact) -> Self {
        Self::new(
            contact.name.as_str(),
            contact.email.as_str(),
            contact.phone.as_str(),
        )
    }

    /// Builds a full record from the current inputs under `id`.
    pub fn to_contact(&self, id: ContactId) -> Contact {
        Contact::with_id(
            id,
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
        )
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.phone.clear();
    }
}
