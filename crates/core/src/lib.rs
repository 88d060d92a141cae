//! Domain logic for the instrument catalog.
//!
//! Everything here is pure (no I/O, no database) so it can be shared by the
//! repository layer, the HTTP layer and the admin tooling alike.

pub mod access;
pub mod error;
pub mod media;
pub mod query;
pub mod roles;
pub mod slug;
pub mod tuner;
pub mod types;
