//! Record and form-state types for the two local widgets.
//!
//! # Responsibility
//! - Define the persisted record shapes (`Task`, `Contact`).
//! - Define the mutable form state each widget binds its inputs to.
//!
//! # Invariants
//! - Record field names match the stored key path and columns.
//! - Forms are plain data; clearing a form never touches storage.

pub mod contact;
pub mod task;
