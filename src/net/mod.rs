//! Network layer: transport seam, authorized gateway, endpoint wrappers and
//! wire types.
//!
//! ARCHITECTURE
//! ============
//! `transport` sends raw requests, `gateway` attaches the bearer credential
//! and handles 401, `api` names the endpoints, `resource` turns protected
//! files into object URLs, `claims` reads identity out of a JWT.

pub mod api;
pub mod claims;
pub mod gateway;
pub mod resource;
pub mod transport;
pub mod types;
