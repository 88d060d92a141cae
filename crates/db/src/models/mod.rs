//! Row structs and request DTOs, one module per table.

pub mod category;
pub mod contact;
pub mod expert;
pub mod instrument;
pub mod learning;
pub mod media;
pub mod session;
pub mod tuner;
pub mod tutorial;
pub mod user;
