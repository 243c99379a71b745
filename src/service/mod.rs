//! ContactService and the payload validator it relies on.

mod contacts;
pub mod validation;
pub use contacts::ContactService;
pub use validation::ContactValidator;
