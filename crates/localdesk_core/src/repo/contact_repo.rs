//! `contacts` record-store contract and SQLite implementation.
//!
//! # Invariants
//! - Keys are supplied by the caller and stored as hyphenated UUID text.
//! - Reads return records in ascending key order.

use crate::db::CONTACT_DB;
use crate::model::contact::{Contact, ContactId};
use crate::repo::{ensure_store_ready, map_insert_error, RecordKey, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT id, name, email, phone FROM contacts";

/// Storage primitives over the `contacts` record store.
pub trait ContactRepository {
    fn get_all_contacts(&self) -> RepoResult<Vec<Contact>>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Inserts a new record; fails with `DuplicateKey` if the id exists.
    fn add_contact(&self, contact: &Contact) -> RepoResult<()>;
    /// Inserts or fully replaces the record under `contact.id`.
    fn put_contact(&self, contact: &Contact) -> RepoResult<()>;
    /// Removes the record; returns whether one existed.
    fn delete_contact(&self, id: ContactId) -> RepoResult<bool>;
}

/// SQLite-backed `contacts` store.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a connection opened with `CONTACT_DB`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_store_ready(conn, &CONTACT_DB)?;
        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn get_all_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn add_contact(&self, contact: &Contact) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO contacts (id, name, email, phone) VALUES (?1, ?2, ?3, ?4);",
                params![
                    contact.id.to_string(),
                    contact.name.as_str(),
                    contact.email.as_str(),
                    contact.phone.as_str(),
                ],
            )
            .map_err(|err| map_insert_error(err, RecordKey::Contact(contact.id)))?;
        Ok(())
    }

    fn put_contact(&self, contact: &Contact) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO contacts (id, name, email, phone) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                phone = excluded.phone;",
            params![
                contact.id.to_string(),
                contact.name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
            ],
        )?;
        Ok(())
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in contacts.id"))
    })?;

    Ok(Contact {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
    })
}
