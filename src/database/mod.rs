pub mod catalog;
pub mod manager;
pub mod models;
pub mod users;

pub use catalog::{CatalogStore, PgCatalogStore, ProductPage, ProductQuery};
pub use manager::{DatabaseError, DatabaseManager};
pub use users::{PgUserStore, UserStore};
