//! Contact manager component.
//!
//! # Responsibility
//! - Load all stored contacts and keep the shared add/edit form state.
//! - Write adds, updates and deletes through to the `contacts` store before
//!   updating memory.
//!
//! # Invariants
//! - Edit mode is entered only through `begin_edit`, which captures the id
//!   that `update_contact` later writes under.
//! - An update replaces the record under its id; the list never holds two
//!   records with the same id.

use crate::model::contact::{Contact, ContactForm, ContactId};
use crate::repo::contact_repo::ContactRepository;
use crate::repo::RepoError;
use crate::service::{diff_records, Reconciliation};
use crate::view::{render_contacts, ContactListView};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors from contact manager operations.
#[derive(Debug)]
pub enum ContactManagerError {
    /// No in-memory contact carries this id.
    ContactNotFound(ContactId),
    /// `update_contact` was called outside edit mode.
    NotEditing,
    /// Record-store failure; memory and form were left unchanged.
    Repo(RepoError),
}

impl Display for ContactManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::NotEditing => write!(f, "no contact is being edited"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContactManagerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Contact widget state over a `contacts` repository.
pub struct ContactManager<R: ContactRepository> {
    repo: R,
    contacts: Vec<Contact>,
    form: ContactForm,
    editing: Option<ContactId>,
    last_error: Option<String>,
}

impl<R: ContactRepository> ContactManager<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            contacts: Vec::new(),
            form: ContactForm::default(),
            editing: None,
            last_error: None,
        }
    }

    /// Replaces the in-memory list with every stored contact.
    pub fn load(&mut self) -> Result<usize, ContactManagerError> {
        let started_at = Instant::now();
        match self.repo.get_all_contacts() {
            Ok(contacts) => {
                self.contacts = contacts;
                self.last_error = None;
                info!(
                    "event=contact_load module=contact_manager status=ok count={} duration_ms={}",
                    self.contacts.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(self.contacts.len())
            }
            Err(err) => Err(self.fail("contact_load", err.into())),
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Id captured by the active edit, if any.
    pub fn editing_id(&self) -> Option<ContactId> {
        self.editing
    }

    /// Adds a contact from the form under a freshly generated id.
    pub fn add_contact(&mut self) -> Result<Contact, ContactManagerError> {
        let contact = self.form.to_contact(ContactId::new_v4());
        match self.repo.add_contact(&contact) {
            Ok(()) => {
                info!(
                    "event=contact_add module=contact_manager status=ok contact_id={}",
                    contact.id
                );
                self.contacts.push(contact.clone());
                self.form.clear();
                self.last_error = None;
                Ok(contact)
            }
            Err(err) => Err(self.fail("contact_add", err.into())),
        }
    }

    /// Copies one contact into the form and enters edit mode.
    pub fn begin_edit(&mut self, id: ContactId) -> Result<(), ContactManagerError> {
        let Some(contact) = self.contacts.iter().find(|contact| contact.id == id) else {
            return Err(self.fail("contact_begin_edit", ContactManagerError::ContactNotFound(id)));
        };

        self.form = ContactForm::from_contact(contact);
        self.editing = Some(id);
        Ok(())
    }

    /// Leaves edit mode and clears the form.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.clear();
    }

    /// Overwrites the edited contact with the form contents.
    ///
    /// On success the in-memory record is replaced, edit mode ends and the
    /// form is cleared.
    pub fn update_contact(&mut self) -> Result<Contact, ContactManagerError> {
        let Some(id) = self.editing else {
            return Err(self.fail("contact_update", ContactManagerError::NotEditing));
        };

        let updated = self.form.to_contact(id);
        if let Err(err) = self.repo.put_contact(&updated) {
            return Err(self.fail("contact_update", err.into()));
        }

        match self.contacts.iter().position(|contact| contact.id == id) {
            Some(index) => self.contacts[index] = updated.clone(),
            None => {
                // put recreated a record deleted while the edit was open
                warn!(
                    "event=contact_update module=contact_manager status=ok contact_id={id} in_memory=false"
                );
                self.contacts.push(updated.clone());
            }
        }
        self.editing = None;
        self.form.clear();
        self.last_error = None;
        info!("event=contact_update module=contact_manager status=ok contact_id={id}");
        Ok(updated)
    }

    /// Updates when editing, adds otherwise.
    pub fn submit(&mut self) -> Result<Contact, ContactManagerError> {
        if self.is_editing() {
            self.update_contact()
        } else {
            self.add_contact()
        }
    }

    /// Deletes a contact from the store, then from memory.
    pub fn delete_contact(&mut self, id: ContactId) -> Result<(), ContactManagerError> {
        match self.repo.delete_contact(id) {
            Ok(existed) => {
                if !existed {
                    warn!(
                        "event=contact_delete module=contact_manager status=ok contact_id={id} stored=false"
                    );
                }
                self.contacts.retain(|contact| contact.id != id);
                self.last_error = None;
                info!("event=contact_delete module=contact_manager status=ok contact_id={id}");
                Ok(())
            }
            Err(err) => Err(self.fail("contact_delete", err.into())),
        }
    }

    pub fn view(&self) -> ContactListView {
        render_contacts(&self.contacts, &self.form, self.is_editing())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Compares memory against the store, then reloads memory from the store.
    pub fn reconcile(&mut self) -> Result<Reconciliation<ContactId>, ContactManagerError> {
        let stored = match self.repo.get_all_contacts() {
            Ok(stored) => stored,
            Err(err) => return Err(self.fail("contact_reconcile", err.into())),
        };

        let report = diff_records(&self.contacts, &stored, |contact| contact.id);
        if !report.is_consistent() {
            warn!(
                "event=contact_reconcile module=contact_manager status=diverged memory_only={} store_only={} diverged={}",
                report.memory_only.len(),
                report.store_only.len(),
                report.diverged.len()
            );
        }
        self.contacts = stored;
        self.last_error = None;
        Ok(report)
    }

    fn fail(&mut self, event: &'static str, err: ContactManagerError) -> ContactManagerError {
        error!("event={event} module=contact_manager status=error error={err}");
        self.last_error = Some(err.to_string());
        err
    }
}
