//! Host-UI bindings for the local task and contact widgets.

pub mod api;
