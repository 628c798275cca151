pub mod models;
pub mod photoshoots;
pub mod products;

// Re-export handler functions for use in routing
pub use models::list as models_list;
pub use photoshoots::get as photoshoot_get;
pub use photoshoots::list as photoshoots_list;
pub use products::list as products_list;
