//! HTTP handlers for contact CRUD.

pub mod contacts;
pub use contacts::*;
