//! Reusable UI components.

pub mod auth_image;
