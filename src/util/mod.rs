//! Utility helpers shared across the client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and
//! component logic so the session and request code can be tested natively.

pub mod auth;
pub mod navigation;
pub mod storage;
pub mod task;
