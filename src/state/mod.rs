//! Session state: the persisted record, its storage, and the workflows that
//! change it.
//!
//! ARCHITECTURE
//! ============
//! `session` is the data, `vault` owns memory + storage consistency, `store`
//! runs login/logout/hydrate, `auth` is the reactive projection the UI reads.

pub mod auth;
pub mod session;
pub mod store;
pub mod token;
pub mod vault;
