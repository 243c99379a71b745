pub mod common;
pub mod contacts;

pub use common::{common_routes, common_routes_with_ready};
pub use contacts::contact_routes;
